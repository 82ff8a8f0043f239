//! Totals command - run the line-item calculator on a JSON file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use rust_decimal::Decimal;
use tracing::info;

use bizledger_core::calc::{compute_invoice, Adjustments, Computation, LineInput};
use bizledger_core::render::{format_money, format_number};

use super::invoice::OutputFormat;
use super::Context;

/// Arguments for the totals command.
#[derive(Args)]
pub struct TotalsArgs {
    /// JSON array of line items ({ name, quantity, rate, tax: { amount | percent } })
    #[arg(required = true)]
    input: PathBuf,

    /// Invoice-level discount
    #[arg(long, default_value = "0")]
    discount: Decimal,

    /// Amount already paid
    #[arg(long, default_value = "0")]
    paid: Decimal,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: TotalsArgs, ctx: &Context) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let content = fs::read_to_string(&args.input)?;
    let lines: Vec<LineInput> = serde_json::from_str(&content)?;
    info!("Computing {} line items from {}", lines.len(), args.input.display());

    let computed = compute_invoice(
        &lines,
        Adjustments {
            discount: args.discount,
            paid: args.paid,
        },
    )?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&computed)?),
        OutputFormat::Text => {
            let group = ctx.config.render.group_thousands;
            print!("{}", format_computation(&computed, group));
        }
    }

    Ok(())
}

fn format_computation(computed: &Computation, group: bool) -> String {
    let money = |v: Decimal| format_money("", v, group);
    let mut output = String::new();

    output.push_str(&format!(
        "{:<4}{:<28}{:>10}{:>12}{:>8}{:>12}{:>14}\n",
        "#", "Description", "Qty", "Rate", "Tax %", "Tax", "Amount"
    ));
    for (i, item) in computed.items.iter().enumerate() {
        output.push_str(&format!(
            "{:<4}{:<28}{:>10}{:>12}{:>8}{:>12}{:>14}\n",
            i + 1,
            item.name,
            format_number(item.quantity),
            money(item.rate),
            format_number(item.tax_percent),
            money(item.tax_amount),
            money(item.amount),
        ));
    }

    let t = &computed.totals;
    output.push('\n');
    output.push_str(&format!("Subtotal: {}\n", money(t.subtotal)));
    output.push_str(&format!("Tax:      {}\n", money(t.tax_amount)));
    if !t.discount_amount.is_zero() {
        output.push_str(&format!("Discount: {}\n", money(t.discount_amount)));
    }
    output.push_str(&format!("Total:    {}\n", money(t.total_amount)));
    output.push_str(&format!("Paid:     {}\n", money(t.paid_amount)));
    output.push_str(&format!("Balance:  {}\n", money(t.balance_amount)));
    output.push_str(&format!("Status:   {}\n", computed.status));

    output
}
