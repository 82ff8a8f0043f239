//! Invoice document rendering.
//!
//! Both renderers shape the invoice through [`InvoiceDocument`] and never
//! recompute totals: the document is a projection of what is stored.

pub mod assets;
mod document;
mod font;
mod format;
mod html;
mod pdf;

pub use assets::{AssetError, AssetRef, RenderAssets};
#[cfg(feature = "native")]
pub use assets::{resolve_assets, AssetSource, FsAssetSource};
pub use document::{DocumentRow, InvoiceDocument, MetaField, PartyBlock, TotalLine};
pub use format::{format_date, format_money, format_number};
pub use html::HtmlRenderer;
pub use pdf::PdfRenderer;

use chrono::NaiveDateTime;

use crate::error::RenderError;
use crate::models::config::RenderConfig;
use crate::models::invoice::Invoice;

/// Result type for rendering.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Inputs to a render besides the invoice itself.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub config: RenderConfig,
    /// Stamped into the footer; passing it in keeps renders reproducible.
    pub generated_at: NaiveDateTime,
    pub assets: RenderAssets,
}

impl RenderOptions {
    pub fn new(config: RenderConfig, generated_at: NaiveDateTime) -> Self {
        Self {
            config,
            generated_at,
            assets: RenderAssets::default(),
        }
    }

    pub fn with_assets(mut self, assets: RenderAssets) -> Self {
        self.assets = assets;
        self
    }
}

/// Trait for invoice document renderers.
pub trait DocumentRenderer {
    /// Rendered artifact.
    type Output;

    /// Render the invoice.
    fn render(&self, invoice: &Invoice, options: &RenderOptions) -> Result<Self::Output>;

    /// File extension for exported artifacts.
    fn extension(&self) -> &'static str;
}

/// File name for an exported invoice, keyed by its number.
pub fn suggested_filename(invoice: &Invoice, extension: &str) -> String {
    let stem: String = invoice
        .header
        .invoice_number
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches(|c| c == '.' || c == '_');

    if stem.is_empty() {
        format!("invoice.{}", extension)
    } else {
        format!("{}.{}", stem, extension)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;

    use crate::calc::{compute_invoice, Adjustments, LineInput, TaxInput};
    use crate::models::invoice::{Invoice, InvoiceHeader, InvoiceStatus, InvoiceType};

    pub fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    pub fn invoice(lines: usize) -> Invoice {
        let inputs: Vec<LineInput> = (0..lines)
            .map(|i| LineInput {
                item_id: format!("sku-{}", i),
                name: format!("Item {}", i + 1),
                unit: "pcs".to_string(),
                quantity: Decimal::from(2),
                rate: Decimal::new(5000, 2),
                tax: TaxInput::Amount(Decimal::from(5)),
            })
            .collect();
        let computed = compute_invoice(&inputs, Adjustments::default()).unwrap();

        Invoice {
            header: InvoiceHeader {
                invoice_number: "INV/2024/001".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                due_date: None,
                invoice_type: InvoiceType::Sale,
                party_name: "Acme Traders".to_string(),
                party_address: None,
                party_phone: Some("+91 98000 00000".to_string()),
                business_name: "Corner Store".to_string(),
                business_address: Some("12 Market Road".to_string()),
                business_phone: None,
                status: InvoiceStatus::Unpaid,
                currency_code: "USD".to_string(),
                currency_symbol: "$".to_string(),
                notes: None,
            },
            items: computed.items,
            totals: computed.totals,
            signature: None,
            attachments: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_filename() {
        let mut invoice = fixtures::invoice(0);
        assert_eq!(suggested_filename(&invoice, "pdf"), "INV_2024_001.pdf");

        invoice.header.invoice_number = "  ".to_string();
        assert_eq!(suggested_filename(&invoice, "html"), "invoice.html");

        invoice.header.invoice_number = "S-17".to_string();
        assert_eq!(suggested_filename(&invoice, "html"), "S-17.html");
    }
}
