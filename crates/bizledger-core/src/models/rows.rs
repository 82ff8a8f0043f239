//! Typed schemas for rows read from and written to the data store.
//!
//! Rows arrive as loosely typed JSON objects. They are parsed here, at the
//! boundary, so that a missing numeric field or an unparseable date rejects
//! the record instead of flowing into arithmetic or ordering.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::invoice::{
    InvoiceStatus, InvoiceTotals, InvoiceType, DEFAULT_CURRENCY_CODE, DEFAULT_CURRENCY_SYMBOL,
};
use super::ledger::{PartyInvoice, Transaction, TransactionType};
use crate::calc::{LineInput, TaxInput};
use crate::error::InputError;
use crate::store::Row;

/// Table names used by the repository.
pub mod tables {
    pub const BUSINESSES: &str = "businesses";
    pub const PARTIES: &str = "parties";
    pub const INVOICES: &str = "invoices";
    pub const INVOICE_ITEMS: &str = "invoice_items";
    pub const TRANSACTIONS: &str = "transactions";
}

/// Accept identifiers stored either as strings (UUIDs) or integers (serials).
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "id_string")] String);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|w| w.0))
}

/// Parse a row into its typed schema.
pub fn parse_row<T: DeserializeOwned>(table: &str, row: &Row) -> Result<T, InputError> {
    serde_json::from_value(serde_json::Value::Object(row.clone())).map_err(|e| InputError::Row {
        table: table.to_string(),
        reason: e.to_string(),
    })
}

/// Serialize a typed row back into a store row.
pub fn to_row<T: Serialize>(table: &str, value: &T) -> Result<Row, InputError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(InputError::Row {
            table: table.to_string(),
            reason: "row must serialize to an object".to_string(),
        }),
        Err(e) => Err(InputError::Row {
            table: table.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Parse a stored timestamp or date.
///
/// Accepts RFC 3339, Postgres text timestamps, ISO date-times without offset
/// and plain `YYYY-MM-DD` dates (taken as midnight). Offsets are normalized
/// to UTC.
pub fn parse_timestamp(field: &str, value: &str) -> Result<NaiveDateTime, InputError> {
    let v = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(v, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(v, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(v, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(InputError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Parse a stored date, dropping any time component.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, InputError> {
    parse_timestamp(field, value).map(|t| t.date())
}

/// A tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub owner_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub currency_symbol: Option<String>,
}

/// A customer or supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub business_id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub party_type: Option<String>,
}

/// A persisted invoice header with stored totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub business_id: String,
    #[serde(deserialize_with = "id_string")]
    pub party_id: String,
    pub invoice_number: String,
    pub invoice_date: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    pub status: InvoiceStatus,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    #[serde(default)]
    pub paid_amount: Decimal,
    pub balance_amount: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub signature_url: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

impl BusinessRow {
    pub fn currency_code(&self) -> &str {
        self.currency_code.as_deref().unwrap_or(DEFAULT_CURRENCY_CODE)
    }

    pub fn currency_symbol(&self) -> &str {
        self.currency_symbol.as_deref().unwrap_or(DEFAULT_CURRENCY_SYMBOL)
    }
}

impl InvoiceRow {
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals {
            subtotal: self.subtotal,
            tax_amount: self.tax_amount,
            discount_amount: self.discount_amount,
            total_amount: self.total_amount,
            paid_amount: self.paid_amount,
            balance_amount: self.balance_amount,
        }
    }

    pub fn set_totals(&mut self, totals: &InvoiceTotals) {
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax_amount;
        self.discount_amount = totals.discount_amount;
        self.total_amount = totals.total_amount;
        self.paid_amount = totals.paid_amount;
        self.balance_amount = totals.balance_amount;
    }

    pub fn to_party_invoice(&self) -> Result<PartyInvoice, InputError> {
        Ok(PartyInvoice {
            invoice_number: self.invoice_number.clone(),
            date: parse_timestamp("invoice_date", &self.invoice_date)?,
            invoice_type: self.invoice_type,
            total_amount: self.total_amount,
        })
    }
}

/// A persisted invoice line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItemRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub invoice_id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub item_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    #[serde(default)]
    pub tax_amount: Option<Decimal>,
    #[serde(default)]
    pub tax_percent: Option<Decimal>,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

impl InvoiceItemRow {
    /// The stored absolute tax amount wins over a stored percent.
    pub fn to_line_input(&self) -> Result<LineInput, InputError> {
        let tax = match (self.tax_amount, self.tax_percent) {
            (Some(amount), _) => TaxInput::Amount(amount),
            (None, Some(percent)) => TaxInput::Percent(percent),
            (None, None) => {
                return Err(InputError::MissingField(
                    "invoice_items.tax_amount".to_string(),
                ));
            }
        };

        Ok(LineInput {
            item_id: self.item_id.clone().unwrap_or_default(),
            name: self.name.clone(),
            unit: self.unit.clone(),
            quantity: self.quantity,
            rate: self.rate,
            tax,
        })
    }
}

/// A persisted payment transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub business_id: String,
    #[serde(deserialize_with = "id_string")]
    pub party_id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub invoice_id: Option<String>,
    pub date: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TransactionRow {
    pub fn to_transaction(&self) -> Result<Transaction, InputError> {
        Ok(Transaction {
            date: parse_timestamp("date", &self.date)?,
            transaction_type: self.transaction_type,
            amount: self.amount,
            mode: self.mode.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_business_currency_defaults() {
        let business: BusinessRow =
            serde_json::from_value(json!({"id": 7, "name": "Acme"})).unwrap();
        assert_eq!(business.currency_code(), "INR");
        assert_eq!(business.currency_symbol(), "₹");

        let business: BusinessRow = serde_json::from_value(json!({
            "id": "b1",
            "name": "Acme",
            "currency_code": "USD",
            "currency_symbol": "$"
        }))
        .unwrap();
        assert_eq!(business.currency_symbol(), "$");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let midnight = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("d", "2024-01-10").unwrap(), midnight);
        assert_eq!(parse_timestamp("d", "2024-01-10T00:00:00").unwrap(), midnight);
        assert_eq!(parse_timestamp("d", "2024-01-10T05:30:00+05:30").unwrap(), midnight);
        assert_eq!(parse_timestamp("d", "2024-01-10 00:00:00.000+00").unwrap(), midnight);

        let err = parse_timestamp("date", "10/01/2024").unwrap_err();
        assert_eq!(
            err,
            InputError::InvalidDate {
                field: "date".to_string(),
                value: "10/01/2024".to_string()
            }
        );
    }

    #[test]
    fn test_item_row_accepts_numbers_and_strings() {
        let item: InvoiceItemRow = parse_row(
            tables::INVOICE_ITEMS,
            &row(json!({
                "id": 7, "invoice_id": "inv-1", "name": "Soap", "unit": "pcs",
                "quantity": 2, "rate": "50.00", "tax_amount": 5
            })),
        )
        .unwrap();

        assert_eq!(item.id, "7");
        let input = item.to_line_input().unwrap();
        assert_eq!(input.tax, TaxInput::Amount(Decimal::from(5)));
        assert_eq!(input.rate, Decimal::from(50));
    }

    #[test]
    fn test_item_row_missing_numeric_field_is_rejected() {
        let err = parse_row::<InvoiceItemRow>(
            tables::INVOICE_ITEMS,
            &row(json!({ "id": 1, "invoice_id": 1, "name": "Soap", "rate": 5, "tax_amount": 0 })),
        )
        .unwrap_err();
        assert!(matches!(err, InputError::Row { ref reason, .. } if reason.contains("quantity")));

        let item: InvoiceItemRow = parse_row(
            tables::INVOICE_ITEMS,
            &row(json!({ "id": 1, "invoice_id": 1, "name": "Soap", "quantity": 1, "rate": 5 })),
        )
        .unwrap();
        assert!(matches!(item.to_line_input(), Err(InputError::MissingField(_))));
    }

    #[test]
    fn test_transaction_row_with_bad_date() {
        let txn: TransactionRow = parse_row(
            tables::TRANSACTIONS,
            &row(json!({
                "id": 1, "business_id": 1, "party_id": 2, "date": "yesterday",
                "type": "RECEIPT", "amount": 60, "mode": "cash"
            })),
        )
        .unwrap();
        assert_eq!(txn.transaction_type, TransactionType::Receipt);
        assert!(matches!(txn.to_transaction(), Err(InputError::InvalidDate { .. })));
    }

    #[test]
    fn test_to_row_round_trips_invoice_row() {
        let invoice = InvoiceRow {
            id: "inv-1".to_string(),
            business_id: "biz-1".to_string(),
            party_id: "p-1".to_string(),
            invoice_number: "INV-001".to_string(),
            invoice_date: "2024-01-10".to_string(),
            due_date: None,
            invoice_type: InvoiceType::Sale,
            status: InvoiceStatus::Unpaid,
            subtotal: Decimal::from(100),
            tax_amount: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            total_amount: Decimal::from(100),
            paid_amount: Decimal::ZERO,
            balance_amount: Decimal::from(100),
            notes: None,
            signature_url: None,
            attachments: vec![],
        };

        let stored = to_row(tables::INVOICES, &invoice).unwrap();
        assert_eq!(stored["type"], "sale");
        let back: InvoiceRow = parse_row(tables::INVOICES, &stored).unwrap();
        assert_eq!(back, invoice);
    }
}
