//! Invoice data models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A finalized invoice, projected from persisted rows right before
/// preview, print or export. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice header information.
    pub header: InvoiceHeader,

    /// Line items on the invoice.
    pub items: Vec<LineItem>,

    /// Stored totals.
    pub totals: InvoiceTotals,

    /// Signature image URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    /// Attachment image URIs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

/// Invoice header with party, business and currency details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Invoice number/identifier.
    pub invoice_number: String,

    /// Invoice date.
    pub date: NaiveDate,

    /// Payment due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Sale or purchase.
    pub invoice_type: InvoiceType,

    /// Counterparty name.
    pub party_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_phone: Option<String>,

    /// Issuing business name.
    pub business_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_phone: Option<String>,

    /// Payment status.
    pub status: InvoiceStatus,

    /// ISO 4217 currency code.
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Symbol printed in front of every amount.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Currency used when a business does not name one.
pub const DEFAULT_CURRENCY_CODE: &str = "INR";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

fn default_currency_code() -> String {
    DEFAULT_CURRENCY_CODE.to_string()
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

/// Direction of an invoice from the business's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    /// Goods or services sold to a customer.
    #[serde(alias = "SALE", alias = "Sale")]
    Sale,
    /// Goods or services bought from a supplier.
    #[serde(alias = "PURCHASE", alias = "Purchase")]
    Purchase,
}

impl InvoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceType::Sale => "sale",
            InvoiceType::Purchase => "purchase",
        }
    }
}

/// Invoice payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[serde(alias = "PAID", alias = "Paid")]
    Paid,
    #[serde(alias = "PARTIAL", alias = "Partial")]
    Partial,
    #[serde(alias = "UNPAID", alias = "Unpaid")]
    Unpaid,
    /// Stored only; never derived from totals.
    #[serde(alias = "PENDING", alias = "Pending")]
    Pending,
}

impl InvoiceStatus {
    /// Derive the status implied by a set of totals.
    pub fn from_totals(totals: &InvoiceTotals) -> Self {
        if totals.paid_amount.is_zero() {
            if totals.total_amount.is_zero() {
                InvoiceStatus::Paid
            } else {
                InvoiceStatus::Unpaid
            }
        } else if totals.balance_amount <= Decimal::ZERO {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::Partial
        }
    }

    /// Upper-case label used on documents.
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Partial => "PARTIAL",
            InvoiceStatus::Unpaid => "UNPAID",
            InvoiceStatus::Pending => "PENDING",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single line item on the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalogue item identifier.
    #[serde(default)]
    pub item_id: String,

    /// Product/service description.
    pub name: String,

    /// Unit of measure.
    #[serde(default)]
    pub unit: String,

    pub quantity: Decimal,

    /// Unit price.
    pub rate: Decimal,

    /// Tax as a percentage of `quantity * rate`, unrounded.
    pub tax_percent: Decimal,

    /// Absolute tax for this line.
    pub tax_amount: Decimal,

    /// `round2(quantity * rate)`.
    pub amount: Decimal,
}

impl LineItem {
    /// Untaxed base for this line, before rounding.
    pub fn base(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.rate)
    }
}

/// Invoice totals with two-decimal currency semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    #[serde(default)]
    pub paid_amount: Decimal,
    pub balance_amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn totals(total: i64, paid: i64) -> InvoiceTotals {
        InvoiceTotals {
            subtotal: Decimal::from(total),
            tax_amount: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            total_amount: Decimal::from(total),
            paid_amount: Decimal::from(paid),
            balance_amount: Decimal::from(total - paid),
        }
    }

    #[test]
    fn test_status_from_totals() {
        assert_eq!(InvoiceStatus::from_totals(&totals(100, 0)), InvoiceStatus::Unpaid);
        assert_eq!(InvoiceStatus::from_totals(&totals(100, 40)), InvoiceStatus::Partial);
        assert_eq!(InvoiceStatus::from_totals(&totals(100, 100)), InvoiceStatus::Paid);
        assert_eq!(InvoiceStatus::from_totals(&totals(0, 0)), InvoiceStatus::Paid);
    }

    #[test]
    fn test_type_and_status_accept_upper_case() {
        let t: InvoiceType = serde_json::from_str("\"SALE\"").unwrap();
        assert_eq!(t, InvoiceType::Sale);
        let t: InvoiceType = serde_json::from_str("\"purchase\"").unwrap();
        assert_eq!(t, InvoiceType::Purchase);
        let s: InvoiceStatus = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(s, InvoiceStatus::Pending);
        assert_eq!(serde_json::to_string(&InvoiceStatus::Partial).unwrap(), "\"partial\"");
    }
}
