//! Ledger command - a party's invoices and payments, newest first.

use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

use bizledger_core::ledger::{summarize, with_running_balance, LedgerSummary};
use bizledger_core::models::ledger::LedgerEntry;
use bizledger_core::render::format_money;
use bizledger_core::store::repository::load_party_ledger;

use super::Context;

/// Arguments for the ledger command.
#[derive(Args)]
pub struct LedgerArgs {
    /// Party id
    #[arg(required = true)]
    party: String,

    /// Business id (default: from session config)
    #[arg(short, long)]
    business: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: LedgerFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LedgerFormat {
    /// Aligned table with totals
    Text,
    /// One row per entry
    Csv,
    /// Entries, balances and summary
    Json,
}

#[derive(Serialize)]
struct JsonLedger<'a> {
    party: &'a str,
    entries: Vec<JsonEntry<'a>>,
    summary: LedgerSummary,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    #[serde(flatten)]
    entry: &'a LedgerEntry,
    balance: Decimal,
}

pub fn run(args: LedgerArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let business = ctx.business(&store, args.business.as_deref())?;
    let ledger = load_party_ledger(&store, &business.id, &args.party)?;

    let rows = with_running_balance(&ledger.entries)?;
    let summary = summarize(&ledger.entries)?;

    match args.format {
        LedgerFormat::Json => {
            let json = JsonLedger {
                party: &ledger.party.name,
                entries: rows
                    .iter()
                    .map(|(entry, balance)| JsonEntry {
                        entry,
                        balance: *balance,
                    })
                    .collect(),
                summary,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        LedgerFormat::Csv => print!("{}", format_ledger_csv(&rows)?),
        LedgerFormat::Text => {
            let symbol = business.currency_symbol();
            let group = ctx.config.render.group_thousands;
            let text = format_ledger_text(&ledger.party.name, &rows, &summary, symbol, group);
            print!("{}", text);
        }
    }

    Ok(())
}

fn format_ledger_csv(rows: &[(LedgerEntry, Decimal)]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["date", "description", "effect", "amount", "balance"])?;
    for (entry, balance) in rows {
        wtr.write_record([
            entry.date().format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.describe(),
            entry.effect().as_str().to_string(),
            entry.amount().to_string(),
            balance.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_ledger_text(
    party: &str,
    rows: &[(LedgerEntry, Decimal)],
    summary: &LedgerSummary,
    symbol: &str,
    group: bool,
) -> String {
    let money = |v| format_money(symbol, v, group);
    let mut output = String::new();

    output.push_str(&format!("Ledger: {}\n\n", party));
    output.push_str(&format!(
        "{:<12}{:<32}{:<8}{:>14}{:>14}\n",
        "Date", "Description", "Effect", "Amount", "Balance"
    ));
    for (entry, balance) in rows {
        output.push_str(&format!(
            "{:<12}{:<32}{:<8}{:>14}{:>14}\n",
            entry.date().format("%Y-%m-%d").to_string(),
            entry.describe(),
            entry.effect().as_str(),
            money(entry.amount()),
            money(*balance)
        ));
    }

    output.push('\n');
    output.push_str(&format!("Total debit:  {}\n", money(summary.total_debit)));
    output.push_str(&format!("Total credit: {}\n", money(summary.total_credit)));
    output.push_str(&format!("Balance:      {}\n", money(summary.balance)));

    output
}
