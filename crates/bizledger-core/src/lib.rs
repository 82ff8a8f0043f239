//! Core library for small-business invoicing.
//!
//! This crate provides:
//! - Line-item and invoice total computation with two-decimal currency rounding
//! - Party ledgers merging invoices and payment transactions
//! - Invoice documents rendered to self-contained HTML and vector PDF
//! - Narrow data-store and auth contracts plus typed row schemas

pub mod calc;
pub mod error;
pub mod ledger;
pub mod models;
pub mod render;
pub mod store;

pub use calc::{
    compute_invoice, compute_line, reconcile, round2, Adjustments, Computation, IntegrityMismatch,
    LineInput, TaxInput,
};
pub use error::{CoreError, InputError, RenderError, Result, StoreError};
pub use ledger::{merge, merge_rows, summarize, LedgerSummary};
pub use models::invoice::{
    Invoice, InvoiceHeader, InvoiceStatus, InvoiceTotals, InvoiceType, LineItem,
};
pub use models::ledger::{Effect, LedgerEntry, PartyInvoice, Transaction, TransactionType};
pub use render::{DocumentRenderer, HtmlRenderer, InvoiceDocument, PdfRenderer, RenderOptions};
pub use store::{AuthProvider, DataStore, InMemoryStore, StaticAuth};
