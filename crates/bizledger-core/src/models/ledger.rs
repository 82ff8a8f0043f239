//! Party ledger models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::invoice::InvoiceType;

/// Sign convention for a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Increases what the party owes the business.
    Debit,
    /// Decreases what the party owes the business.
    Credit,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Debit => "debit",
            Effect::Credit => "credit",
        }
    }

    /// Signed amount: positive for debit, negative for credit.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            Effect::Debit => amount,
            Effect::Credit => -amount,
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a payment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received from the party.
    #[serde(alias = "RECEIPT", alias = "Receipt")]
    Receipt,
    /// Money paid to the party.
    #[serde(alias = "PAYMENT", alias = "Payment")]
    Payment,
}

impl TransactionType {
    /// The transaction that settles an invoice of `invoice_type`.
    pub fn settling(invoice_type: InvoiceType) -> Self {
        match invoice_type {
            InvoiceType::Sale => TransactionType::Receipt,
            InvoiceType::Purchase => TransactionType::Payment,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Receipt => "receipt",
            TransactionType::Payment => "payment",
        }
    }
}

/// An invoice as it appears in a party's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyInvoice {
    pub invoice_number: String,
    pub date: NaiveDateTime,
    pub invoice_type: InvoiceType,
    pub total_amount: Decimal,
}

impl PartyInvoice {
    pub fn effect(&self) -> Effect {
        match self.invoice_type {
            InvoiceType::Sale => Effect::Debit,
            InvoiceType::Purchase => Effect::Credit,
        }
    }
}

/// A payment transaction with a party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDateTime,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    /// Payment mode (cash, bank transfer, UPI, ...).
    #[serde(default)]
    pub mode: String,
}

impl Transaction {
    pub fn effect(&self) -> Effect {
        match self.transaction_type {
            TransactionType::Receipt => Effect::Credit,
            TransactionType::Payment => Effect::Debit,
        }
    }
}

/// One line of a party ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEntry {
    Invoice {
        date: NaiveDateTime,
        invoice_number: String,
        total_amount: Decimal,
        effect: Effect,
    },
    Transaction {
        date: NaiveDateTime,
        amount: Decimal,
        mode: String,
        effect: Effect,
    },
}

impl LedgerEntry {
    pub fn date(&self) -> NaiveDateTime {
        match self {
            LedgerEntry::Invoice { date, .. } | LedgerEntry::Transaction { date, .. } => *date,
        }
    }

    pub fn effect(&self) -> Effect {
        match self {
            LedgerEntry::Invoice { effect, .. } | LedgerEntry::Transaction { effect, .. } => {
                *effect
            }
        }
    }

    /// Unsigned amount of the entry.
    pub fn amount(&self) -> Decimal {
        match self {
            LedgerEntry::Invoice { total_amount, .. } => *total_amount,
            LedgerEntry::Transaction { amount, .. } => *amount,
        }
    }

    /// Short description for statements.
    pub fn describe(&self) -> String {
        match self {
            LedgerEntry::Invoice { invoice_number, .. } => format!("Invoice {}", invoice_number),
            LedgerEntry::Transaction { mode, .. } if mode.is_empty() => "Transaction".to_string(),
            LedgerEntry::Transaction { mode, .. } => format!("Transaction ({})", mode),
        }
    }
}

impl From<PartyInvoice> for LedgerEntry {
    fn from(invoice: PartyInvoice) -> Self {
        let effect = invoice.effect();
        LedgerEntry::Invoice {
            date: invoice.date,
            invoice_number: invoice.invoice_number,
            total_amount: invoice.total_amount,
            effect,
        }
    }
}

impl From<Transaction> for LedgerEntry {
    fn from(transaction: Transaction) -> Self {
        let effect = transaction.effect();
        LedgerEntry::Transaction {
            date: transaction.date,
            amount: transaction.amount,
            mode: transaction.mode,
            effect,
        }
    }
}
