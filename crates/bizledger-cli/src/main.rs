//! CLI application for invoice totals, party ledgers and invoice export.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, invoice, ledger, pay, render, totals};

/// bizledger - Small-business invoices and party ledgers
#[derive(Parser)]
#[command(name = "bizledger")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Data snapshot (JSON object of table name to rows)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute line items and totals from a JSON file
    Totals(totals::TotalsArgs),

    /// Show a stored invoice and check its totals
    Invoice(invoice::InvoiceArgs),

    /// Export an invoice as HTML or PDF
    Render(render::RenderArgs),

    /// Show a party's ledger
    Ledger(ledger::LedgerArgs),

    /// Export many invoices at once
    Batch(batch::BatchArgs),

    /// Record a payment against an invoice
    Pay(pay::PayArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Config commands must work before a config file exists.
    let context = || commands::Context::new(cli.config.as_deref(), cli.data.clone());

    match cli.command {
        Commands::Totals(args) => totals::run(args, &context()?),
        Commands::Invoice(args) => invoice::run(args, &context()?),
        Commands::Render(args) => render::run(args, &context()?).await,
        Commands::Ledger(args) => ledger::run(args, &context()?),
        Commands::Batch(args) => batch::run(args, &context()?).await,
        Commands::Pay(args) => pay::run(args, &context()?),
        Commands::Config(args) => config::run(args, cli.config.as_deref()),
    }
}
