//! Invoice command - show a stored invoice with its integrity check.

use clap::Args;
use console::style;

use bizledger_core::models::invoice::Invoice;
use bizledger_core::render::{format_date, format_money, format_number};
use bizledger_core::store::repository::load_invoice;

use super::Context;

/// Arguments for the invoice command.
#[derive(Args)]
pub struct InvoiceArgs {
    /// Invoice id or number
    #[arg(required = true)]
    invoice: String,

    /// Business id (default: from session config)
    #[arg(short, long)]
    business: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub fn run(args: InvoiceArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let business = ctx.business(&store, args.business.as_deref())?;
    let loaded = load_invoice(&store, &business, &args.invoice)?;

    if !loaded.warnings.is_empty() {
        eprintln!("{}", style("Stored totals disagree with line items:").yellow());
        for warning in &loaded.warnings {
            eprintln!("  - {}", warning);
        }
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&loaded)?),
        OutputFormat::Text => print!("{}", format_invoice_text(&loaded.invoice, ctx)),
    }

    Ok(())
}

fn format_invoice_text(invoice: &Invoice, ctx: &Context) -> String {
    let header = &invoice.header;
    let render = &ctx.config.render;
    let money = |v| format_money(&header.currency_symbol, v, render.group_thousands);
    let mut output = String::new();

    output.push_str(&format!(
        "Invoice: {} ({})\n",
        header.invoice_number,
        header.invoice_type.as_str()
    ));
    output.push_str(&format!("Date: {}\n", format_date(header.date, &render.date_format)));
    if let Some(due_date) = header.due_date {
        output.push_str(&format!("Due: {}\n", format_date(due_date, &render.date_format)));
    }
    output.push_str(&format!("Status: {}\n", header.status));
    output.push('\n');

    output.push_str(&format!("Business: {}\n", header.business_name));
    output.push_str(&format!("Party:    {}\n", header.party_name));
    output.push('\n');

    output.push_str("Items:\n");
    for item in &invoice.items {
        output.push_str(&format!(
            "  {} x {} @ {} (tax {}%) = {}\n",
            format_number(item.quantity),
            item.name,
            money(item.rate),
            format_number(item.tax_percent),
            money(item.amount)
        ));
    }
    output.push('\n');

    let t = &invoice.totals;
    output.push_str("Summary:\n");
    output.push_str(&format!("  Subtotal: {}\n", money(t.subtotal)));
    output.push_str(&format!("  Tax:      {}\n", money(t.tax_amount)));
    if !t.discount_amount.is_zero() {
        output.push_str(&format!("  Discount: {}\n", money(t.discount_amount)));
    }
    output.push_str(&format!("  Total:    {}\n", money(t.total_amount)));
    output.push_str(&format!("  Paid:     {}\n", money(t.paid_amount)));
    output.push_str(&format!("  Balance:  {}\n", money(t.balance_amount)));

    if let Some(notes) = &header.notes {
        output.push_str(&format!("\nNotes: {}\n", notes));
    }

    output
}
