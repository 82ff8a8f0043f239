//! Tenant-scoped reads and writes over a [`DataStore`].
//!
//! Every function takes the business explicitly; nothing here reads a
//! "currently selected" business from ambient state.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{AuthProvider, DataStore, Filter, Order};
use crate::calc::{
    apply_payment, compute_invoice, compute_line, reconcile, round2, Adjustments, IntegrityMismatch,
    LineInput,
};
use crate::error::{InputError, Result, StoreError};
use crate::ledger::merge_rows;
use crate::models::invoice::{Invoice, InvoiceHeader, InvoiceStatus, InvoiceType, LineItem};
use crate::models::ledger::{LedgerEntry, TransactionType};
use crate::models::rows::{
    parse_date, parse_row, tables, to_row, BusinessRow, InvoiceItemRow, InvoiceRow, PartyRow,
    TransactionRow,
};

fn query_typed<T: DeserializeOwned, S: DataStore>(
    store: &S,
    table: &str,
    filters: &[Filter],
    order: Option<&Order>,
) -> Result<Vec<T>> {
    let rows = store.query(table, filters, order)?;
    let parsed = rows
        .iter()
        .map(|row| parse_row(table, row))
        .collect::<std::result::Result<Vec<T>, InputError>>()?;
    Ok(parsed)
}

fn insert_typed<T: Serialize + DeserializeOwned, S: DataStore>(
    store: &mut S,
    table: &str,
    value: &T,
) -> Result<T> {
    let mut row = to_row(table, value)?;
    if row.get("id").and_then(|v| v.as_str()) == Some("") {
        row.remove("id");
    }
    let stored = store.insert(table, row)?;
    Ok(parse_row(table, &stored)?)
}

fn not_found(table: &str, key: &str) -> StoreError {
    StoreError::NotFound {
        table: table.to_string(),
        key: key.to_string(),
    }
}

/// Pick the business to work in.
///
/// A signed-in user only sees the businesses they own; without a user every
/// business in the store is visible. `preferred` selects one by id, otherwise
/// the first by name is used.
pub fn resolve_business<S: DataStore, A: AuthProvider>(
    store: &S,
    auth: &A,
    preferred: Option<&str>,
) -> Result<BusinessRow> {
    let user = auth.current_user();
    let filters: Vec<Filter> = user
        .iter()
        .map(|u| Filter::eq("owner_id", u.id.as_str()))
        .collect();
    let businesses: Vec<BusinessRow> =
        query_typed(store, tables::BUSINESSES, &filters, Some(&Order::asc("name")))?;

    let found = match preferred {
        Some(id) => businesses.into_iter().find(|b| b.id == id),
        None => businesses.into_iter().next(),
    };
    let key = preferred
        .map(str::to_string)
        .or_else(|| user.map(|u| format!("owner {}", u.id)))
        .unwrap_or_else(|| "*".to_string());
    let business = found.ok_or_else(|| not_found(tables::BUSINESSES, &key))?;

    debug!("Resolved business {} ({})", business.name, business.id);
    Ok(business)
}

/// An invoice projection plus disagreements between its stored and
/// recomputed totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedInvoice {
    pub id: String,
    pub invoice: Invoice,
    pub warnings: Vec<IntegrityMismatch>,
}

fn find_invoice_row<S: DataStore>(store: &S, business_id: &str, key: &str) -> Result<InvoiceRow> {
    let tenant = Filter::eq("business_id", business_id);
    for column in ["id", "invoice_number"] {
        let mut rows: Vec<InvoiceRow> =
            query_typed(store, tables::INVOICES, &[tenant.clone(), Filter::eq(column, key)], None)?;
        if !rows.is_empty() {
            return Ok(rows.remove(0));
        }
    }
    Err(not_found(tables::INVOICES, key).into())
}

fn find_party<S: DataStore>(store: &S, business_id: &str, party_id: &str) -> Result<PartyRow> {
    let mut rows: Vec<PartyRow> = query_typed(
        store,
        tables::PARTIES,
        &[Filter::eq("id", party_id), Filter::eq("business_id", business_id)],
        None,
    )?;
    if rows.is_empty() {
        return Err(not_found(tables::PARTIES, party_id).into());
    }
    Ok(rows.remove(0))
}

/// Rebuild a line item from its row. A stored amount is shown as stored,
/// even when it disagrees with `quantity * rate`.
fn line_from_row(row: &InvoiceItemRow) -> Result<LineItem> {
    let mut item = compute_line(&row.to_line_input()?)?;
    if let Some(amount) = row.amount {
        item.amount = amount;
    }
    Ok(item)
}

/// Load an invoice by id or number, with party and business details.
pub fn load_invoice<S: DataStore>(
    store: &S,
    business: &BusinessRow,
    key: &str,
) -> Result<LoadedInvoice> {
    let row = find_invoice_row(store, &business.id, key)?;
    let party = find_party(store, &business.id, &row.party_id)?;
    let item_rows: Vec<InvoiceItemRow> = query_typed(
        store,
        tables::INVOICE_ITEMS,
        &[Filter::eq("invoice_id", row.id.as_str())],
        None,
    )?;
    let items = item_rows.iter().map(line_from_row).collect::<Result<Vec<_>>>()?;

    let totals = row.totals();
    let warnings = reconcile(&totals, &items);

    let header = InvoiceHeader {
        invoice_number: row.invoice_number.clone(),
        date: parse_date("invoice_date", &row.invoice_date)?,
        due_date: row
            .due_date
            .as_deref()
            .map(|d| parse_date("due_date", d))
            .transpose()?,
        invoice_type: row.invoice_type,
        party_name: party.name,
        party_address: party.address,
        party_phone: party.phone,
        business_name: business.name.clone(),
        business_address: business.address.clone(),
        business_phone: business.phone.clone(),
        status: row.status,
        currency_code: business.currency_code().to_string(),
        currency_symbol: business.currency_symbol().to_string(),
        notes: row.notes.clone(),
    };

    debug!(
        "Loaded invoice {} with {} items and {} warnings",
        header.invoice_number,
        items.len(),
        warnings.len()
    );

    Ok(LoadedInvoice {
        id: row.id,
        invoice: Invoice {
            header,
            items,
            totals,
            signature: row.signature_url,
            attachments: row.attachments,
        },
        warnings,
    })
}

/// Invoices of a business, newest first, optionally for one party.
pub fn list_invoices<S: DataStore>(
    store: &S,
    business_id: &str,
    party_id: Option<&str>,
) -> Result<Vec<InvoiceRow>> {
    let mut filters = vec![Filter::eq("business_id", business_id)];
    if let Some(party_id) = party_id {
        filters.push(Filter::eq("party_id", party_id));
    }
    query_typed(store, tables::INVOICES, &filters, Some(&Order::desc("invoice_date")))
}

/// A party together with its merged ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyLedger {
    pub party: PartyRow,
    pub entries: Vec<LedgerEntry>,
}

/// Merge a party's invoices and transactions into its ledger.
pub fn load_party_ledger<S: DataStore>(
    store: &S,
    business_id: &str,
    party_id: &str,
) -> Result<PartyLedger> {
    let party = find_party(store, business_id, party_id)?;
    let scope = [
        Filter::eq("business_id", business_id),
        Filter::eq("party_id", party_id),
    ];
    let invoices: Vec<InvoiceRow> = query_typed(store, tables::INVOICES, &scope, None)?;
    let transactions: Vec<TransactionRow> = query_typed(store, tables::TRANSACTIONS, &scope, None)?;

    let entries = merge_rows(&invoices, &transactions)?;
    Ok(PartyLedger { party, entries })
}

/// A new invoice as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub party_id: String,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub invoice_type: InvoiceType,
    pub lines: Vec<LineInput>,
    #[serde(default)]
    pub adjustments: Adjustments,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Compute and persist an invoice with its line items.
///
/// Stock levels are left untouched.
pub fn create_invoice<S: DataStore>(
    store: &mut S,
    business_id: &str,
    draft: &NewInvoice,
) -> Result<InvoiceRow> {
    find_party(store, business_id, &draft.party_id)?;
    let computed = compute_invoice(&draft.lines, draft.adjustments)?;

    let row = InvoiceRow {
        id: String::new(),
        business_id: business_id.to_string(),
        party_id: draft.party_id.clone(),
        invoice_number: draft.invoice_number.clone(),
        invoice_date: draft.invoice_date.format("%Y-%m-%d").to_string(),
        due_date: draft.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
        invoice_type: draft.invoice_type,
        status: computed.status,
        subtotal: computed.totals.subtotal,
        tax_amount: computed.totals.tax_amount,
        discount_amount: computed.totals.discount_amount,
        total_amount: computed.totals.total_amount,
        paid_amount: computed.totals.paid_amount,
        balance_amount: computed.totals.balance_amount,
        notes: draft.notes.clone(),
        signature_url: None,
        attachments: Vec::new(),
    };
    let stored = insert_typed(store, tables::INVOICES, &row)?;

    for item in &computed.items {
        let item_row = InvoiceItemRow {
            id: String::new(),
            invoice_id: stored.id.clone(),
            item_id: Some(item.item_id.clone()).filter(|id| !id.is_empty()),
            name: item.name.clone(),
            unit: item.unit.clone(),
            quantity: item.quantity,
            rate: item.rate,
            tax_amount: Some(item.tax_amount),
            tax_percent: Some(item.tax_percent),
            amount: Some(item.amount),
        };
        insert_typed(store, tables::INVOICE_ITEMS, &item_row)?;
    }

    info!(
        "Created invoice {} ({} items, total {})",
        stored.invoice_number,
        computed.items.len(),
        stored.total_amount
    );
    Ok(stored)
}

/// A payment transaction as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub party_id: String,
    #[serde(default)]
    pub invoice_id: Option<String>,
    pub date: NaiveDateTime,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Persist a transaction. When it references an invoice, the payment is
/// applied to that invoice's paid and balance amounts and its status is
/// re-derived; an overpayment rejects the whole operation.
pub fn record_transaction<S: DataStore>(
    store: &mut S,
    business_id: &str,
    entry: &NewTransaction,
) -> Result<TransactionRow> {
    let amount = round2(entry.amount);
    if amount <= Decimal::ZERO {
        return Err(InputError::invalid("amount", "must be positive").into());
    }
    find_party(store, business_id, &entry.party_id)?;

    let invoice_update = match &entry.invoice_id {
        Some(invoice_id) => {
            let mut invoice = find_invoice_row(store, business_id, invoice_id)?;
            if invoice.party_id != entry.party_id {
                return Err(InputError::invalid(
                    "invoice_id",
                    format!("invoice {} belongs to another party", invoice.invoice_number),
                )
                .into());
            }
            let expected = TransactionType::settling(invoice.invoice_type);
            if entry.transaction_type != expected {
                return Err(InputError::invalid(
                    "transaction_type",
                    format!(
                        "a {} invoice is settled by a {}, not a {}",
                        invoice.invoice_type.as_str(),
                        expected.as_str(),
                        entry.transaction_type.as_str()
                    ),
                )
                .into());
            }
            let totals = apply_payment(&invoice.totals(), amount)?;
            invoice.set_totals(&totals);
            invoice.status = InvoiceStatus::from_totals(&totals);
            Some(invoice)
        }
        None => None,
    };

    let row = TransactionRow {
        id: String::new(),
        business_id: business_id.to_string(),
        party_id: entry.party_id.clone(),
        invoice_id: invoice_update.as_ref().map(|i| i.id.clone()),
        date: entry.date.format("%Y-%m-%dT%H:%M:%S").to_string(),
        transaction_type: entry.transaction_type,
        amount,
        mode: entry.mode.clone(),
        notes: entry.notes.clone(),
    };
    let stored = insert_typed(store, tables::TRANSACTIONS, &row)?;

    if let Some(invoice) = invoice_update {
        let patch = to_row(tables::INVOICES, &invoice)?;
        store.update(tables::INVOICES, &[Filter::eq("id", invoice.id.as_str())], patch)?;
        info!(
            "Applied {} to invoice {}: balance {}, status {}",
            amount, invoice.invoice_number, invoice.balance_amount, invoice.status
        );
    }

    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::calc::TaxInput;
    use crate::models::ledger::Effect;
    use crate::store::{InMemoryStore, StaticAuth};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn store() -> InMemoryStore {
        InMemoryStore::from_snapshot(json!({
            "businesses": [
                {"id": "b1", "owner_id": "u1", "name": "Corner Store", "address": "12 Market Road",
                 "currency_code": "USD", "currency_symbol": "$"},
                {"id": "b2", "owner_id": "u2", "name": "Other Shop"}
            ],
            "parties": [
                {"id": "p1", "business_id": "b1", "name": "Acme Traders"},
                {"id": "p2", "business_id": "b2", "name": "Elsewhere"}
            ],
            "invoices": [
                {"id": 10, "business_id": "b1", "party_id": "p1", "invoice_number": "INV-1",
                 "invoice_date": "2024-01-10", "type": "SALE", "status": "UNPAID",
                 "subtotal": 200, "tax_amount": 10, "total_amount": 210, "balance_amount": 210},
                {"id": 11, "business_id": "b1", "party_id": "p1", "invoice_number": "INV-2",
                 "invoice_date": "2024-01-20T00:00:00+00:00", "type": "PURCHASE",
                 "status": "UNPAID",
                 "subtotal": 50, "tax_amount": 0, "total_amount": 50, "balance_amount": 50}
            ],
            "invoice_items": [
                {"id": 1, "invoice_id": 10, "name": "Widget", "unit": "pcs", "quantity": 2,
                 "rate": "50.00", "tax_amount": 5, "amount": 100},
                {"id": 2, "invoice_id": 10, "name": "Gadget", "quantity": 1, "rate": 100,
                 "tax_percent": 5},
                {"id": 3, "invoice_id": 11, "name": "Stock", "quantity": 1, "rate": 50,
                 "tax_amount": 0, "amount": 50}
            ],
            "transactions": [
                {"id": 20, "business_id": "b1", "party_id": "p1", "date": "2024-01-15",
                 "type": "RECEIPT", "amount": 30, "mode": "cash"}
            ]
        }))
        .unwrap()
    }

    fn business(store: &InMemoryStore) -> BusinessRow {
        resolve_business(store, &StaticAuth::anonymous(), Some("b1")).unwrap()
    }

    #[test]
    fn test_resolve_business_scopes_to_owner() {
        let store = store();

        let own = resolve_business(&store, &StaticAuth::signed_in("u2"), None).unwrap();
        assert_eq!(own.id, "b2");

        let err = resolve_business(&store, &StaticAuth::signed_in("u2"), Some("b1")).unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::NotFound { .. })));

        let first = resolve_business(&store, &StaticAuth::anonymous(), None).unwrap();
        assert_eq!(first.name, "Corner Store");
    }

    #[test]
    fn test_load_invoice_by_number_or_id() {
        let store = store();
        let business = business(&store);

        let loaded = load_invoice(&store, &business, "INV-1").unwrap();
        assert_eq!(loaded.id, "10");
        assert_eq!(load_invoice(&store, &business, "10").unwrap().invoice, loaded.invoice);

        let invoice = &loaded.invoice;
        assert_eq!(invoice.header.party_name, "Acme Traders");
        assert_eq!(invoice.header.business_address.as_deref(), Some("12 Market Road"));
        assert_eq!(invoice.header.currency_symbol, "$");
        assert_eq!(invoice.header.status, InvoiceStatus::Unpaid);
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.items[0].tax_percent, Decimal::from(5));
        assert_eq!(invoice.items[1].tax_amount, Decimal::from(5));
        assert_eq!(invoice.totals.total_amount, Decimal::from(210));
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_load_invoice_reports_mismatches() {
        let mut store = store();
        store
            .update(
                tables::INVOICES,
                &[Filter::eq("id", "10")],
                json!({"subtotal": 190, "total_amount": 200, "balance_amount": 200})
                    .as_object()
                    .unwrap()
                    .clone(),
            )
            .unwrap();

        let loaded = load_invoice(&store, &business(&store), "INV-1").unwrap();
        let fields: Vec<&str> = loaded.warnings.iter().map(|w| w.field.as_str()).collect();
        assert_eq!(fields, vec!["subtotal", "total_amount"]);
        assert_eq!(loaded.invoice.totals.total_amount, Decimal::from(200));
    }

    #[test]
    fn test_other_tenants_are_invisible() {
        let store = store();
        let other = resolve_business(&store, &StaticAuth::anonymous(), Some("b2")).unwrap();
        assert!(load_invoice(&store, &other, "INV-1").is_err());
        assert!(load_party_ledger(&store, "b2", "p1").is_err());
        assert!(list_invoices(&store, "b2", None).unwrap().is_empty());
    }

    #[test]
    fn test_list_invoices_newest_first() {
        let store = store();
        let numbers: Vec<String> = list_invoices(&store, "b1", Some("p1"))
            .unwrap()
            .into_iter()
            .map(|i| i.invoice_number)
            .collect();
        assert_eq!(numbers, vec!["INV-2", "INV-1"]);
    }

    #[test]
    fn test_party_ledger() {
        let store = store();
        let ledger = load_party_ledger(&store, "b1", "p1").unwrap();

        assert_eq!(ledger.party.name, "Acme Traders");
        let effects: Vec<(String, Effect)> = ledger
            .entries
            .iter()
            .map(|e| (e.describe(), e.effect()))
            .collect();
        assert_eq!(effects.len(), 3);
        assert_eq!(effects[0].1, Effect::Credit);
        assert_eq!(ledger.entries[0].amount(), Decimal::from(50));
        assert_eq!(ledger.entries[1].amount(), Decimal::from(30));
        assert_eq!(ledger.entries[2].amount(), Decimal::from(210));
    }

    #[test]
    fn test_party_ledger_rejects_bad_dates() {
        let mut store = store();
        store
            .update(
                tables::TRANSACTIONS,
                &[Filter::eq("id", "20")],
                json!({"date": "yesterday"}).as_object().unwrap().clone(),
            )
            .unwrap();

        let err = load_party_ledger(&store, "b1", "p1").unwrap_err();
        assert!(matches!(err, CoreError::Input(InputError::InvalidDate { .. })));
    }

    #[test]
    fn test_create_invoice_persists_rows() {
        let mut store = store();
        let draft = NewInvoice {
            party_id: "p1".to_string(),
            invoice_number: "INV-3".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            due_date: None,
            invoice_type: InvoiceType::Sale,
            lines: vec![LineInput {
                item_id: String::new(),
                name: "Widget".to_string(),
                unit: "pcs".to_string(),
                quantity: Decimal::from(3),
                rate: Decimal::new(1999, 2),
                tax: TaxInput::Percent(Decimal::from(18)),
            }],
            adjustments: Adjustments::default(),
            notes: None,
        };

        let created = create_invoice(&mut store, "b1", &draft).unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.subtotal, Decimal::new(5997, 2));
        assert_eq!(created.tax_amount, Decimal::new(1079, 2));
        assert_eq!(created.status, InvoiceStatus::Unpaid);

        let loaded = load_invoice(&store, &business(&store), "INV-3").unwrap();
        assert_eq!(loaded.invoice.items.len(), 1);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_create_invoice_requires_party_in_business() {
        let mut store = store();
        let draft = NewInvoice {
            party_id: "p2".to_string(),
            invoice_number: "X".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            due_date: None,
            invoice_type: InvoiceType::Sale,
            lines: vec![],
            adjustments: Adjustments::default(),
            notes: None,
        };
        assert!(create_invoice(&mut store, "b1", &draft).is_err());
    }

    fn payment(invoice_id: Option<&str>, amount: i64) -> NewTransaction {
        NewTransaction {
            party_id: "p1".to_string(),
            invoice_id: invoice_id.map(str::to_string),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(10, 0, 0).unwrap(),
            transaction_type: TransactionType::Receipt,
            amount: Decimal::from(amount),
            mode: "upi".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_record_transaction_applies_payment() {
        let mut store = store();

        let stored = record_transaction(&mut store, "b1", &payment(Some("INV-1"), 60)).unwrap();
        assert_eq!(stored.invoice_id.as_deref(), Some("10"));

        let invoice = load_invoice(&store, &business(&store), "INV-1").unwrap().invoice;
        assert_eq!(invoice.totals.paid_amount, Decimal::from(60));
        assert_eq!(invoice.totals.balance_amount, Decimal::from(150));
        assert_eq!(invoice.header.status, InvoiceStatus::Partial);

        record_transaction(&mut store, "b1", &payment(Some("10"), 150)).unwrap();
        let invoice = load_invoice(&store, &business(&store), "INV-1").unwrap().invoice;
        assert_eq!(invoice.header.status, InvoiceStatus::Paid);
        assert_eq!(load_party_ledger(&store, "b1", "p1").unwrap().entries.len(), 5);
    }

    #[test]
    fn test_record_transaction_rejects_overpayment_without_writing() {
        let mut store = store();

        assert!(record_transaction(&mut store, "b1", &payment(Some("INV-1"), 500)).is_err());
        assert!(record_transaction(&mut store, "b1", &payment(None, 0)).is_err());
        assert_eq!(store.query(tables::TRANSACTIONS, &[], None).unwrap().len(), 1);
    }

    #[test]
    fn test_record_transaction_stores_rounded_amount() {
        let mut store = store();
        let entry = NewTransaction {
            amount: Decimal::new(10_005, 3),
            ..payment(Some("INV-1"), 0)
        };

        let stored = record_transaction(&mut store, "b1", &entry).unwrap();
        assert_eq!(stored.amount, Decimal::new(1001, 2));

        let invoice = load_invoice(&store, &business(&store), "INV-1").unwrap().invoice;
        assert_eq!(invoice.totals.paid_amount, stored.amount);
        assert_eq!(invoice.totals.balance_amount, Decimal::new(19999, 2));

        let dust = NewTransaction {
            amount: Decimal::new(4, 3),
            ..payment(None, 0)
        };
        assert!(record_transaction(&mut store, "b1", &dust).is_err());
    }

    #[test]
    fn test_record_transaction_must_match_invoice_direction() {
        let mut store = store();
        let wrong = NewTransaction {
            transaction_type: TransactionType::Payment,
            ..payment(Some("INV-1"), 40)
        };

        let err = record_transaction(&mut store, "b1", &wrong).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Input(InputError::InvalidValue { ref field, .. })
                if field == "transaction_type"
        ));
        assert_eq!(store.query(tables::TRANSACTIONS, &[], None).unwrap().len(), 1);
        let invoice = load_invoice(&store, &business(&store), "INV-1").unwrap().invoice;
        assert_eq!(invoice.totals.paid_amount, Decimal::ZERO);

        let settle_purchase = NewTransaction {
            transaction_type: TransactionType::Payment,
            ..payment(Some("INV-2"), 20)
        };
        assert!(record_transaction(&mut store, "b1", &settle_purchase).is_ok());
    }

    #[test]
    fn test_record_unlinked_transaction() {
        let mut store = store();
        let stored = record_transaction(&mut store, "b1", &payment(None, 25)).unwrap();
        assert_eq!(stored.invoice_id, None);
        assert_eq!(stored.date, "2024-02-01T10:00:00");
    }
}
