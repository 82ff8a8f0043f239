//! Line-item and invoice total computation.
//!
//! Every currency output is rounded half-up (away from zero at the midpoint)
//! to two decimals with [`round2`]. Tax percentages are kept unrounded so
//! that deriving a percent from an amount and back reproduces the amount.

mod reconcile;

pub use reconcile::{reconcile, IntegrityMismatch};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InputError;
use crate::models::invoice::{InvoiceStatus, InvoiceTotals, LineItem};

/// Result type for computations.
pub type Result<T> = std::result::Result<T, InputError>;

/// Round a currency value half-up to two decimals.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn out_of_range(field: &str) -> InputError {
    InputError::invalid(field, "value is out of range")
}

/// Sum `values`; `None` on overflow.
pub(crate) fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
}

/// Sum of unrounded `quantity * rate` over `items`; `None` on overflow.
pub(crate) fn sum_bases(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.base()?))
}

/// Tax percent implied by an absolute tax amount on `base`.
///
/// A zero base yields 0 rather than a division error.
pub fn derive_tax_percent(base: Decimal, tax_amount: Decimal) -> Result<Decimal> {
    if base.is_zero() {
        return Ok(Decimal::ZERO);
    }
    tax_amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|v| v.checked_div(base))
        .map(|v| v.normalize())
        .ok_or_else(|| out_of_range("tax_percent"))
}

/// Tax amount for `percent` of `base`, rounded to two decimals.
pub fn tax_from_percent(base: Decimal, percent: Decimal) -> Result<Decimal> {
    base.checked_mul(percent)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .map(round2)
        .ok_or_else(|| out_of_range("tax_amount"))
}

/// How the tax of a line is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxInput {
    /// Absolute tax amount, passed through.
    Amount(Decimal),
    /// Percent of `quantity * rate`.
    Percent(Decimal),
}

impl Default for TaxInput {
    fn default() -> Self {
        TaxInput::Amount(Decimal::ZERO)
    }
}

/// One line as entered or persisted, before computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineInput {
    #[serde(default)]
    pub item_id: String,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    #[serde(default)]
    pub tax: TaxInput,
}

/// Invoice-level adjustments applied after line totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    pub discount: Decimal,
    pub paid: Decimal,
}

/// Computed line items and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Computation {
    pub items: Vec<LineItem>,
    pub totals: InvoiceTotals,
    pub status: InvoiceStatus,
}

fn non_negative(field: &str, value: Decimal) -> Result<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(InputError::invalid(field, format!("must not be negative, got {}", value)));
    }
    Ok(value)
}

/// Compute a single line item.
pub fn compute_line(input: &LineInput) -> Result<LineItem> {
    let quantity = non_negative("quantity", input.quantity)?;
    let rate = non_negative("rate", input.rate)?;
    let base = quantity
        .checked_mul(rate)
        .ok_or_else(|| out_of_range("quantity*rate"))?;

    let (tax_percent, tax_amount) = match input.tax {
        TaxInput::Amount(amount) => {
            let amount = non_negative("tax_amount", amount)?;
            (derive_tax_percent(base, amount)?, round2(amount))
        }
        TaxInput::Percent(percent) => {
            let percent = non_negative("tax_percent", percent)?;
            let shown = if base.is_zero() { Decimal::ZERO } else { percent };
            (shown, tax_from_percent(base, percent)?)
        }
    };

    Ok(LineItem {
        item_id: input.item_id.clone(),
        name: input.name.clone(),
        unit: input.unit.clone(),
        quantity,
        rate,
        tax_percent,
        tax_amount,
        amount: round2(base),
    })
}

/// Compute line items and invoice totals.
pub fn compute_invoice(inputs: &[LineInput], adjustments: Adjustments) -> Result<Computation> {
    let items = inputs.iter().map(compute_line).collect::<Result<Vec<_>>>()?;

    let subtotal = sum_bases(&items)
        .map(round2)
        .ok_or_else(|| out_of_range("subtotal"))?;
    let tax_amount = checked_sum(items.iter().map(|i| i.tax_amount))
        .map(round2)
        .ok_or_else(|| out_of_range("tax_amount"))?;
    let gross = subtotal
        .checked_add(tax_amount)
        .ok_or_else(|| out_of_range("total_amount"))?;

    let discount_amount = round2(non_negative("discount_amount", adjustments.discount)?);
    if discount_amount > gross {
        return Err(InputError::invalid(
            "discount_amount",
            format!("{} exceeds subtotal plus tax {}", discount_amount, gross),
        ));
    }
    let total_amount = round2(gross - discount_amount);

    let paid_amount = round2(non_negative("paid_amount", adjustments.paid)?);
    if paid_amount > total_amount {
        return Err(InputError::invalid(
            "paid_amount",
            format!("{} exceeds total {}", paid_amount, total_amount),
        ));
    }

    let totals = InvoiceTotals {
        subtotal,
        tax_amount,
        discount_amount,
        total_amount,
        paid_amount,
        balance_amount: round2(total_amount - paid_amount),
    };

    debug!(
        "Computed {} items: subtotal={} tax={} total={} balance={}",
        items.len(),
        totals.subtotal,
        totals.tax_amount,
        totals.total_amount,
        totals.balance_amount
    );

    Ok(Computation {
        status: InvoiceStatus::from_totals(&totals),
        items,
        totals,
    })
}

/// Record a payment of `amount` against `totals`.
pub fn apply_payment(totals: &InvoiceTotals, amount: Decimal) -> Result<InvoiceTotals> {
    let amount = round2(amount);
    if amount <= Decimal::ZERO {
        return Err(InputError::invalid("amount", "payment must be positive"));
    }

    let paid_amount = totals
        .paid_amount
        .checked_add(amount)
        .map(round2)
        .ok_or_else(|| out_of_range("amount"))?;
    if paid_amount > totals.total_amount {
        return Err(InputError::invalid(
            "amount",
            format!(
                "payment of {} exceeds outstanding balance {}",
                amount, totals.balance_amount
            ),
        ));
    }

    Ok(InvoiceTotals {
        paid_amount,
        balance_amount: round2(totals.total_amount - paid_amount),
        ..*totals
    })
}
