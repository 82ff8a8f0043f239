//! WASM bindings for invoice totals, party ledgers and invoice documents.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Amounts cross the boundary as decimal strings.

use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use bizledger_core::ledger::{merge, summarize, with_running_balance, LedgerSummary};
use bizledger_core::models::config::RenderConfig;
use bizledger_core::models::invoice::Invoice;
use bizledger_core::models::ledger::{LedgerEntry, PartyInvoice, Transaction};
use bizledger_core::models::rows::parse_timestamp;
use bizledger_core::render::{
    format_money, DocumentRenderer, HtmlRenderer, PdfRenderer, RenderAssets, RenderOptions,
};
use bizledger_core::{compute_invoice, Adjustments, LineInput};

/// Images larger than this are not embedded.
const MAX_INLINE_BYTES: usize = 5 * 1024 * 1024;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Compute line items and totals.
///
/// `lines` is an array of `{name, quantity, rate, tax: {amount} | {percent}}`;
/// `adjustments` is `{discount, paid}` or undefined.
#[wasm_bindgen(js_name = computeTotals)]
pub fn compute_totals(lines: JsValue, adjustments: JsValue) -> Result<JsValue, JsValue> {
    let lines: Vec<LineInput> = from_js(lines)?;
    let adjustments: Adjustments = if adjustments.is_undefined() || adjustments.is_null() {
        Adjustments::default()
    } else {
        from_js(adjustments)?
    };

    let computation = compute_invoice(&lines, adjustments).map_err(js_error)?;
    to_js(&computation)
}

/// A ledger entry with the party balance right after it.
#[derive(Debug, Serialize)]
struct BalancedEntry {
    #[serde(flatten)]
    entry: LedgerEntry,
    description: String,
    balance: Decimal,
}

#[derive(Debug, Serialize)]
struct LedgerView {
    entries: Vec<BalancedEntry>,
    summary: LedgerSummary,
}

fn ledger_view(
    invoices: Vec<PartyInvoice>,
    transactions: Vec<Transaction>,
) -> Result<LedgerView, JsValue> {
    let entries = merge(invoices, transactions);
    let summary = summarize(&entries).map_err(js_error)?;
    let entries = with_running_balance(&entries)
        .map_err(js_error)?
        .into_iter()
        .map(|(entry, balance)| BalancedEntry {
            description: entry.describe(),
            entry,
            balance,
        })
        .collect();

    Ok(LedgerView { entries, summary })
}

/// Merge a party's invoices and transactions, most recent first.
#[wasm_bindgen(js_name = mergeLedger)]
pub fn merge_ledger(invoices: JsValue, transactions: JsValue) -> Result<JsValue, JsValue> {
    let invoices: Vec<PartyInvoice> = from_js(invoices)?;
    let transactions: Vec<Transaction> = from_js(transactions)?;

    to_js(&ledger_view(invoices, transactions)?)
}

/// Format an amount the way documents print it.
#[wasm_bindgen(js_name = formatMoney)]
pub fn format_amount(symbol: &str, amount: &str, group_thousands: bool) -> Result<String, JsValue> {
    let value: Decimal = amount.trim().parse().map_err(js_error)?;
    Ok(format_money(symbol, value, group_thousands))
}

/// Renders invoice documents with a fixed configuration.
#[wasm_bindgen]
pub struct InvoiceRenderer {
    config: RenderConfig,
}

#[wasm_bindgen]
impl InvoiceRenderer {
    /// Create a renderer; `config` may be undefined for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<InvoiceRenderer, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            RenderConfig::default()
        } else {
            from_js(config)?
        };
        Ok(Self { config })
    }

    /// Render self-contained HTML.
    ///
    /// `generated_at` is an ISO date-time; the current time is used when omitted.
    #[wasm_bindgen(js_name = renderHtml)]
    pub fn render_html(
        &self,
        invoice: JsValue,
        generated_at: Option<String>,
    ) -> Result<String, JsValue> {
        let invoice: Invoice = from_js(invoice)?;
        let options = self.options(&invoice, generated_at.as_deref())?;
        HtmlRenderer::new().render(&invoice, &options).map_err(js_error)
    }

    /// Render a PDF, returned as a `Uint8Array`.
    #[wasm_bindgen(js_name = renderPdf)]
    pub fn render_pdf(
        &self,
        invoice: JsValue,
        generated_at: Option<String>,
    ) -> Result<Vec<u8>, JsValue> {
        let invoice: Invoice = from_js(invoice)?;
        let options = self.options(&invoice, generated_at.as_deref())?;
        PdfRenderer::new().render(&invoice, &options).map_err(js_error)
    }
}

impl InvoiceRenderer {
    fn options(
        &self,
        invoice: &Invoice,
        generated_at: Option<&str>,
    ) -> Result<RenderOptions, JsValue> {
        let generated_at = match generated_at {
            Some(value) => parse_timestamp("generated_at", value).map_err(js_error)?,
            None => now(),
        };

        // No network or filesystem here: only data: URIs are embedded.
        Ok(RenderOptions::new(self.config.clone(), generated_at)
            .with_assets(RenderAssets::inline(invoice, MAX_INLINE_BYTES)))
    }
}

fn now() -> NaiveDateTime {
    let millis = js_sys::Date::now() as i64;
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default()
}

/// Render an invoice to HTML with default settings.
#[wasm_bindgen(js_name = renderHtml)]
pub fn render_html(invoice: JsValue, generated_at: Option<String>) -> Result<String, JsValue> {
    InvoiceRenderer::new(JsValue::UNDEFINED)?.render_html(invoice, generated_at)
}

/// Render an invoice to PDF with default settings.
#[wasm_bindgen(js_name = renderPdf)]
pub fn render_pdf(invoice: JsValue, generated_at: Option<String>) -> Result<Vec<u8>, JsValue> {
    InvoiceRenderer::new(JsValue::UNDEFINED)?.render_pdf(invoice, generated_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizledger_core::models::invoice::InvoiceType;
    use bizledger_core::models::ledger::TransactionType;
    use chrono::NaiveDate;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn at(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_ledger_view_balances() {
        let view = ledger_view(
            vec![PartyInvoice {
                invoice_number: "INV-1".to_string(),
                date: at(10),
                invoice_type: InvoiceType::Sale,
                total_amount: Decimal::from(100),
            }],
            vec![Transaction {
                date: at(15),
                transaction_type: TransactionType::Receipt,
                amount: Decimal::from(60),
                mode: "cash".to_string(),
            }],
        )
        .unwrap();

        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.entries[0].balance, Decimal::from(40));
        assert_eq!(view.entries[1].balance, Decimal::from(100));
        assert_eq!(view.summary.balance, Decimal::from(40));
    }

    #[wasm_bindgen_test]
    fn test_format_amount() {
        assert_eq!(format_amount("$", "1234.5", true).unwrap(), "$1,234.50");
    }
}
