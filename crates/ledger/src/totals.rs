//! Subtotal, tax and total for a list of line items

use crate::model::{finite_or_zero, LineItem};
use serde::{Deserialize, Serialize};

/// Three-stage aggregation of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Compute totals for `items` at `tax_rate` percent
///
/// Amounts are summed in item order without intermediate rounding. A
/// negative rate is applied as given; a non-finite rate counts as zero.
///
/// # Example
/// ```
/// use ledger::{compute_totals, LineItem};
///
/// let items = vec![LineItem::new("1", "Work", 100.0, 2.0)];
/// let totals = compute_totals(&items, 10.0);
/// assert_eq!(totals.subtotal, 200.0);
/// assert_eq!(totals.tax, 20.0);
/// assert_eq!(totals.total, 220.0);
/// ```
pub fn compute_totals(items: &[LineItem], tax_rate: f64) -> Totals {
    let subtotal = items
        .iter()
        .map(LineItem::amount)
        .fold(0.0, |acc, amount| acc + amount);
    let tax = subtotal * (finite_or_zero(tax_rate) / 100.0);

    Totals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(rate: f64, quantity: f64) -> LineItem {
        LineItem::new("id", "row", rate, quantity)
    }

    #[test]
    fn test_empty_items() {
        assert_eq!(compute_totals(&[], 10.0), Totals::default());
    }

    #[test]
    fn test_single_item_with_tax() {
        let totals = compute_totals(&[item(100.0, 2.0)], 10.0);
        assert_eq!(
            totals,
            Totals {
                subtotal: 200.0,
                tax: 20.0,
                total: 220.0
            }
        );
    }

    #[test]
    fn test_fractional_quantities_without_tax() {
        let totals = compute_totals(&[item(50.0, 1.0), item(25.5, 3.0)], 0.0);
        assert_eq!(totals.subtotal, 126.5);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.total, 126.5);
    }

    #[test]
    fn test_negative_tax_reduces_total() {
        let totals = compute_totals(&[item(100.0, 1.0)], -5.0);
        assert_eq!(totals.tax, -5.0);
        assert!(totals.total < totals.subtotal);
    }

    #[test]
    fn test_non_finite_inputs_count_as_zero() {
        let totals = compute_totals(&[item(f64::INFINITY, 2.0), item(10.0, 1.0)], f64::NAN);
        assert_eq!(totals.subtotal, 10.0);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.total, 10.0);
    }
}
