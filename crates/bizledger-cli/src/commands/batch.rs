//! Batch export of every invoice of a business.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use bizledger_core::render::suggested_filename;
use bizledger_core::store::repository::{list_invoices, load_invoice};

use super::assets::HttpAssetSource;
use super::render::{export, DocumentFormat};
use super::Context;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Output directory
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Document format
    #[arg(short, long, value_enum, default_value = "pdf")]
    format: DocumentFormat,

    /// Only invoices whose number matches this glob (e.g. "INV-2024-*")
    #[arg(short, long)]
    pattern: Option<String>,

    /// Only invoices of this party
    #[arg(long)]
    party: Option<String>,

    /// Business id (default: from session config)
    #[arg(short, long)]
    business: Option<String>,

    /// Also write a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome of exporting one invoice.
struct ExportResult {
    invoice_number: String,
    path: Option<PathBuf>,
    warnings: usize,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();

    let store = ctx.open_store()?;
    let business = ctx.business(&store, args.business.as_deref())?;

    let pattern = args.pattern.as_deref().map(Pattern::new).transpose()?;
    let invoices: Vec<_> = list_invoices(&store, &business.id, args.party.as_deref())?
        .into_iter()
        .filter(|row| pattern.as_ref().is_none_or(|p| p.matches(&row.invoice_number)))
        .collect();

    if invoices.is_empty() {
        anyhow::bail!("No matching invoices found for {}", business.name);
    }

    println!(
        "{} Found {} invoices to export",
        style("ℹ").blue(),
        invoices.len()
    );

    fs::create_dir_all(&args.output_dir)?;
    let source = HttpAssetSource::new(&ctx.config.assets, ctx.asset_base_dir())?;

    let pb = ProgressBar::new(invoices.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} invoices",
            )?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(invoices.len());
    let mut taken = HashSet::new();
    for row in &invoices {
        let outcome = async {
            let loaded = load_invoice(&store, &business, &row.id)?;
            let bytes = export(&loaded.invoice, args.format, &source, ctx).await?;
            let filename = suggested_filename(&loaded.invoice, args.format.extension());
            let path = claim_path(&args.output_dir, &filename, &row.id, &mut taken);
            fs::write(&path, bytes)?;
            debug!("Wrote {}", path.display());
            anyhow::Ok((path, loaded.warnings.len()))
        }
        .await;

        match outcome {
            Ok((path, warnings)) => results.push(ExportResult {
                invoice_number: row.invoice_number.clone(),
                path: Some(path),
                warnings,
                error: None,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to export {}: {}", row.invoice_number, error_msg);
                    results.push(ExportResult {
                        invoice_number: row.invoice_number.clone(),
                        path: None,
                        warnings: 0,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to export {}: {}", row.invoice_number, error_msg);
                    pb.abandon();
                    anyhow::bail!("Export failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args.output_dir.join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let flagged = results.iter().filter(|r| r.warnings > 0).count();

    println!();
    println!(
        "{} Exported {} invoices in {:?}",
        style("✓").green(),
        results.len() - failed.len(),
        start.elapsed()
    );
    if flagged > 0 {
        println!(
            "   {} with stored totals that disagree with their line items",
            style(flagged).yellow()
        );
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed invoices:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.invoice_number,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Reserve a file name in `dir` for this run.
///
/// Invoice numbers that differ only in characters replaced by
/// `suggested_filename` (or only in case) map to the same name; later ones
/// get the invoice id appended.
fn claim_path(dir: &Path, filename: &str, id: &str, taken: &mut HashSet<String>) -> PathBuf {
    let (stem, extension) = filename.rsplit_once('.').unwrap_or((filename, ""));
    let id: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();

    let mut name = filename.to_string();
    let mut attempt = 1;
    while !taken.insert(name.to_lowercase()) {
        let suffix = if attempt == 1 {
            id.clone()
        } else {
            format!("{}-{}", id, attempt)
        };
        name = format!("{}-{}.{}", stem, suffix, extension);
        attempt += 1;
    }

    if name != filename {
        warn!("{} is already used in this export; writing {}", filename, name);
    }
    dir.join(name)
}

fn write_summary(path: &PathBuf, results: &[ExportResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["invoice_number", "status", "file", "integrity_warnings", "error"])?;
    for result in results {
        let file = result
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let status = if result.error.is_some() { "error" } else { "success" };

        wtr.write_record([
            result.invoice_number.as_str(),
            status,
            file,
            &result.warnings.to_string(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
