//! Party ledger: invoices and payment transactions merged into one history.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::InputError;
use crate::models::ledger::{Effect, LedgerEntry, PartyInvoice, Transaction};
use crate::models::rows::{InvoiceRow, TransactionRow};

/// Merge a party's invoices and transactions, most recent first.
///
/// Entries with equal dates keep their input order, invoices ahead of
/// transactions.
pub fn merge(invoices: Vec<PartyInvoice>, transactions: Vec<Transaction>) -> Vec<LedgerEntry> {
    let mut entries: Vec<LedgerEntry> = invoices
        .into_iter()
        .map(LedgerEntry::from)
        .chain(transactions.into_iter().map(LedgerEntry::from))
        .collect();

    // Vec::sort_by is stable.
    entries.sort_by(|a, b| b.date().cmp(&a.date()));

    debug!("Merged ledger with {} entries", entries.len());
    entries
}

/// Merge persisted rows, rejecting any record whose date cannot be parsed.
pub fn merge_rows(
    invoices: &[InvoiceRow],
    transactions: &[TransactionRow],
) -> Result<Vec<LedgerEntry>, InputError> {
    let invoices = invoices
        .iter()
        .map(InvoiceRow::to_party_invoice)
        .collect::<Result<Vec<_>, _>>()?;
    let transactions = transactions
        .iter()
        .map(TransactionRow::to_transaction)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(merge(invoices, transactions))
}

/// Debit/credit totals for a party.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    /// `total_debit - total_credit`; positive when the party owes the business.
    pub balance: Decimal,
}

fn out_of_range(field: &str) -> InputError {
    InputError::invalid(field, "ledger total is out of range")
}

pub fn summarize(entries: &[LedgerEntry]) -> Result<LedgerSummary, InputError> {
    let mut summary = LedgerSummary::default();
    for entry in entries {
        let (total, field) = match entry.effect() {
            Effect::Debit => (&mut summary.total_debit, "total_debit"),
            Effect::Credit => (&mut summary.total_credit, "total_credit"),
        };
        *total = total
            .checked_add(entry.amount())
            .ok_or_else(|| out_of_range(field))?;
    }
    summary.balance = summary
        .total_debit
        .checked_sub(summary.total_credit)
        .ok_or_else(|| out_of_range("balance"))?;
    Ok(summary)
}

/// Pair every entry with the party balance right after it.
///
/// Balances accumulate oldest first; the result keeps the display order of
/// `entries`.
pub fn with_running_balance(
    entries: &[LedgerEntry],
) -> Result<Vec<(LedgerEntry, Decimal)>, InputError> {
    let mut balance = Decimal::ZERO;
    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries.iter().rev() {
        balance = balance
            .checked_add(entry.effect().signed(entry.amount()))
            .ok_or_else(|| out_of_range("balance"))?;
        rows.push((entry.clone(), balance));
    }
    rows.reverse();
    Ok(rows)
}
