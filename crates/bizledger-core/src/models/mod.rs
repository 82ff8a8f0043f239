//! Data models: invoices, ledger entries, persisted rows and configuration.

pub mod config;
pub mod invoice;
pub mod ledger;
pub mod rows;
