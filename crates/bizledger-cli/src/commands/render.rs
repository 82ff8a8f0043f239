//! Render command - export a stored invoice as HTML or PDF.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use console::style;
use tracing::info;

use bizledger_core::models::invoice::Invoice;
use bizledger_core::render::{
    resolve_assets, suggested_filename, DocumentRenderer, HtmlRenderer, PdfRenderer, RenderOptions,
};
use bizledger_core::store::repository::load_invoice;

use super::assets::HttpAssetSource;
use super::Context;

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Invoice id or number
    #[arg(required = true)]
    invoice: String,

    /// Document format
    #[arg(short, long, value_enum, default_value = "pdf")]
    format: DocumentFormat,

    /// Output file (default: named after the invoice number)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Business id (default: from session config)
    #[arg(short, long)]
    business: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum DocumentFormat {
    /// Self-contained HTML
    Html,
    /// Vector PDF
    Pdf,
}

impl DocumentFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Html => HtmlRenderer.extension(),
            DocumentFormat::Pdf => PdfRenderer.extension(),
        }
    }
}

/// Load images and render `invoice` in `format`.
pub async fn export(
    invoice: &Invoice,
    format: DocumentFormat,
    source: &HttpAssetSource,
    ctx: &Context,
) -> anyhow::Result<Vec<u8>> {
    let assets = resolve_assets(source, invoice, &ctx.config.assets).await;
    let options = RenderOptions::new(ctx.config.render.clone(), Local::now().naive_local())
        .with_assets(assets);

    let bytes = match format {
        DocumentFormat::Html => HtmlRenderer::new().render(invoice, &options)?.into_bytes(),
        DocumentFormat::Pdf => PdfRenderer::new().render(invoice, &options)?,
    };
    Ok(bytes)
}

pub async fn run(args: RenderArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let business = ctx.business(&store, args.business.as_deref())?;
    let loaded = load_invoice(&store, &business, &args.invoice)?;

    if !loaded.warnings.is_empty() {
        eprintln!(
            "{} Stored totals disagree with line items ({}). Rendering stored values.",
            style("⚠").yellow(),
            loaded.warnings.len()
        );
    }

    let source = HttpAssetSource::new(&ctx.config.assets, ctx.asset_base_dir())?;
    let bytes = export(&loaded.invoice, args.format, &source, ctx).await?;

    let output_path = args
        .output
        .unwrap_or_else(|| {
            PathBuf::from(suggested_filename(&loaded.invoice, args.format.extension()))
        });
    fs::write(&output_path, &bytes)?;
    info!("Wrote {} bytes", bytes.len());

    println!(
        "{} Invoice {} written to {}",
        style("✓").green(),
        loaded.invoice.header.invoice_number,
        output_path.display()
    );

    Ok(())
}
