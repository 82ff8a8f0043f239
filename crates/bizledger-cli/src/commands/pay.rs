//! Pay command - record a payment against an invoice.

use chrono::{Local, NaiveDateTime};
use clap::Args;
use console::style;
use rust_decimal::Decimal;

use bizledger_core::models::ledger::TransactionType;
use bizledger_core::models::rows::parse_timestamp;
use bizledger_core::store::repository::{list_invoices, record_transaction, NewTransaction};

use super::Context;

/// Arguments for the pay command.
#[derive(Args)]
pub struct PayArgs {
    /// Invoice id or number
    #[arg(required = true)]
    invoice: String,

    /// Amount paid
    #[arg(required = true)]
    amount: Decimal,

    /// Payment mode (cash, bank, upi, ...)
    #[arg(short, long, default_value = "cash")]
    mode: String,

    /// Payment date (YYYY-MM-DD or ISO date-time; default: now)
    #[arg(long)]
    date: Option<String>,

    /// Note stored with the transaction
    #[arg(long)]
    notes: Option<String>,

    /// Business id (default: from session config)
    #[arg(short, long)]
    business: Option<String>,
}

pub fn run(args: PayArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let business = ctx.business(&store, args.business.as_deref())?;

    let invoice = list_invoices(&store, &business.id, None)?
        .into_iter()
        .find(|row| row.id == args.invoice || row.invoice_number == args.invoice)
        .ok_or_else(|| anyhow::anyhow!("Invoice not found: {}", args.invoice))?;

    let date: NaiveDateTime = match &args.date {
        Some(value) => parse_timestamp("date", value)?,
        None => Local::now().naive_local(),
    };

    let entry = NewTransaction {
        party_id: invoice.party_id.clone(),
        invoice_id: Some(invoice.id.clone()),
        date,
        transaction_type: TransactionType::settling(invoice.invoice_type),
        amount: args.amount,
        mode: args.mode,
        notes: args.notes,
    };
    record_transaction(&mut store, &business.id, &entry)?;
    ctx.save_store(&store)?;

    let updated = list_invoices(&store, &business.id, Some(&invoice.party_id))?
        .into_iter()
        .find(|row| row.id == invoice.id)
        .ok_or_else(|| anyhow::anyhow!("Invoice disappeared: {}", invoice.id))?;

    println!(
        "{} Recorded {} {} on {}: paid {}, balance {} ({})",
        style("✓").green(),
        entry.transaction_type.as_str(),
        args.amount,
        updated.invoice_number,
        updated.paid_amount,
        updated.balance_amount,
        updated.status
    );

    Ok(())
}
