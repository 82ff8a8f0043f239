//! Stored-versus-recomputed total checks.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use super::{checked_sum, round2, sum_bases};
use crate::models::invoice::{InvoiceTotals, LineItem};

/// Stored value that disagrees with the value recomputed from line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityMismatch {
    /// Name of the disagreeing field, e.g. `subtotal` or `items[2].amount`.
    pub field: String,
    pub stored: Decimal,
    pub computed: Decimal,
}

impl std::fmt::Display for IntegrityMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: stored {} but line items give {}",
            self.field, self.stored, self.computed
        )
    }
}

/// Compare stored totals against totals recomputed from `items`.
///
/// Differences within one cent are accepted. Nothing is repaired. A value
/// whose recomputation overflows cannot be checked and is skipped.
pub fn reconcile(stored: &InvoiceTotals, items: &[LineItem]) -> Vec<IntegrityMismatch> {
    let tolerance = Decimal::new(1, 2);
    let mut mismatches = Vec::new();
    let mut check = |field: String, stored: Decimal, computed: Option<Decimal>| {
        let Some(computed) = computed.map(round2) else {
            warn!("Cannot recompute {}: value out of range", field);
            return;
        };
        let agrees = stored
            .checked_sub(computed)
            .is_some_and(|diff| diff.abs() <= tolerance);
        if !agrees {
            mismatches.push(IntegrityMismatch {
                field,
                stored,
                computed,
            });
        }
    };

    for (i, item) in items.iter().enumerate() {
        check(format!("items[{}].amount", i), item.amount, item.base());
    }

    let subtotal = sum_bases(items).map(round2);
    let tax_amount = checked_sum(items.iter().map(|i| i.tax_amount)).map(round2);
    let total_amount = subtotal
        .zip(tax_amount)
        .and_then(|(s, t)| s.checked_add(t))
        .and_then(|gross| gross.checked_sub(stored.discount_amount));
    check("subtotal".to_string(), stored.subtotal, subtotal);
    check("tax_amount".to_string(), stored.tax_amount, tax_amount);
    check("total_amount".to_string(), stored.total_amount, total_amount);
    check(
        "balance_amount".to_string(),
        stored.balance_amount,
        stored.total_amount.checked_sub(stored.paid_amount),
    );

    for mismatch in &mismatches {
        warn!("Integrity mismatch: {}", mismatch);
    }

    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{compute_invoice, Adjustments, LineInput, TaxInput};
    use pretty_assertions::assert_eq;

    fn computed() -> (InvoiceTotals, Vec<LineItem>) {
        let inputs = vec![LineInput {
            item_id: "sku-1".to_string(),
            name: "Rice".to_string(),
            unit: "kg".to_string(),
            quantity: Decimal::from(10),
            rate: Decimal::new(4250, 2),
            tax: TaxInput::Percent(Decimal::from(5)),
        }];
        let result = compute_invoice(&inputs, Adjustments::default()).unwrap();
        (result.totals, result.items)
    }

    #[test]
    fn test_consistent_totals_have_no_mismatch() {
        let (totals, items) = computed();
        assert!(reconcile(&totals, &items).is_empty());
    }

    #[test]
    fn test_reports_each_disagreeing_field() {
        let (mut totals, items) = computed();
        totals.subtotal += Decimal::ONE;
        totals.balance_amount = Decimal::ZERO;

        let fields: Vec<String> = reconcile(&totals, &items).into_iter().map(|m| m.field).collect();
        assert_eq!(fields, vec!["subtotal".to_string(), "balance_amount".to_string()]);
    }

    #[test]
    fn test_overflowing_items_are_skipped() {
        let (totals, mut items) = computed();
        items[0].quantity = Decimal::MAX;
        items[0].rate = Decimal::MAX;

        let fields: Vec<String> = reconcile(&totals, &items).into_iter().map(|m| m.field).collect();
        assert_eq!(fields, Vec::<String>::new());
    }

    #[test]
    fn test_one_cent_is_tolerated() {
        let (mut totals, items) = computed();
        totals.tax_amount += Decimal::new(1, 2);
        assert!(reconcile(&totals, &items).is_empty());
    }
}
