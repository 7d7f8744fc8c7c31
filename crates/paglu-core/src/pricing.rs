//! # Order Total Calculator
//!
//! Two tax models live side by side and are never merged:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ITEMIZED (GST) MODEL            compute_itemized_total()              │
//! │  Used by: order details, admin console                                 │
//! │                                                                         │
//! │    gross     = price × qty                                             │
//! │    discount  = price × d% × qty                                        │
//! │    tax       = (price − price × d%) × gst% × qty                       │
//! │    grand     = Σgross − Σdiscount + Σtax                               │
//! │                                                                         │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  CHECKOUT-SUMMARY (FLAT) MODEL   compute_checkout_summary()            │
//! │  Used by: cart page, checkout page, Order.total                        │
//! │                                                                         │
//! │    discounted = Σ price × (1 − d%) × qty                               │
//! │    shipping   = 0 if discounted > threshold else flat fee              │
//! │    tax        = discounted × checkout tax%                             │
//! │    total      = discounted + shipping + tax                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here rounds. Call [`Money::rounded`] when presenting a figure.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Percent};
use crate::types::LineItem;
use crate::validation::validate_line_item;

// =============================================================================
// Itemized (GST) Model
// =============================================================================

/// Per-line figures of the itemized model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineBreakdown {
    /// `unit_price × quantity`
    pub gross: Money,
    /// `unit_price × discount% × quantity`
    pub discount: Money,
    /// `gross − discount`
    pub net_of_discount: Money,
    /// GST on the discounted price, times quantity.
    pub tax: Money,
}

/// Computes the itemized figures for one line.
///
/// The line is assumed valid; [`compute_itemized_total`] validates first.
/// Fails with [`CoreError::AmountOverflow`] when a figure does not fit.
pub fn line_breakdown(line: &LineItem) -> CoreResult<LineBreakdown> {
    let qty = line.quantity;
    let gross = line
        .unit_price
        .checked_mul_quantity(qty)
        .ok_or(CoreError::AmountOverflow)?;
    let discount = line
        .unit_price
        .checked_percent_of(line.discount)
        .and_then(|per_unit| per_unit.checked_mul_quantity(qty))
        .ok_or(CoreError::AmountOverflow)?;
    let tax = line
        .discounted_unit_price()
        .checked_percent_of(line.gst)
        .and_then(|per_unit| per_unit.checked_mul_quantity(qty))
        .ok_or(CoreError::AmountOverflow)?;

    Ok(LineBreakdown {
        gross,
        discount,
        net_of_discount: gross - discount,
        tax,
    })
}

/// Totals of the itemized model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemizedTotals {
    pub subtotal: Money,
    pub total_discount: Money,
    pub total_tax: Money,
    pub grand_total: Money,
}

/// Computes the itemized (per-line GST) totals.
///
/// An empty list yields all zeros. Any invalid line (quantity < 1, negative
/// price) fails the whole computation.
///
/// ## Example
/// ```rust
/// use paglu_core::money::{Money, Percent};
/// use paglu_core::pricing::compute_itemized_total;
/// use paglu_core::types::{LineItem, Variant};
///
/// let line = LineItem {
///     product_id: "p1".into(),
///     name: "Kurta".into(),
///     image: None,
///     unit_price: Money::from_major(100),
///     discount: Percent::from_whole(10).unwrap(),
///     gst: Percent::from_whole(5).unwrap(),
///     quantity: 2,
///     stock: None,
///     variant: Variant::none(),
/// };
///
/// let totals = compute_itemized_total(&[line]).unwrap();
/// assert_eq!(totals.subtotal, Money::from_major(200));
/// assert_eq!(totals.total_discount, Money::from_major(20));
/// assert_eq!(totals.total_tax, Money::from_major(9));
/// assert_eq!(totals.grand_total, Money::from_major(189));
/// ```
pub fn compute_itemized_total(lines: &[LineItem]) -> CoreResult<ItemizedTotals> {
    for line in lines {
        validate_line_item(line)?;
    }

    let mut totals = ItemizedTotals::default();
    for line in lines {
        let b = line_breakdown(line)?;
        totals.subtotal = add(totals.subtotal, b.gross)?;
        totals.total_discount = add(totals.total_discount, b.discount)?;
        totals.total_tax = add(totals.total_tax, b.tax)?;
    }
    totals.grand_total = add(totals.subtotal - totals.total_discount, totals.total_tax)?;

    Ok(totals)
}

// =============================================================================
// Checkout-Summary (Flat) Model
// =============================================================================

/// Shipping and tax settings of the checkout-summary model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutPolicy {
    /// Charged when the discounted subtotal is at or below the threshold.
    pub flat_shipping_fee: Money,
    /// Shipping is free only when the subtotal is strictly greater.
    pub free_shipping_threshold: Money,
    /// Flat tax applied to the discounted subtotal.
    pub tax_rate: Percent,
}

impl Default for CheckoutPolicy {
    /// ₹15 shipping, free above ₹100, 8% tax.
    fn default() -> Self {
        CheckoutPolicy {
            flat_shipping_fee: Money::from_major(15),
            free_shipping_threshold: Money::from_major(100),
            tax_rate: Percent::from_whole_const(8),
        }
    }
}

/// Totals of the checkout-summary model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutSummary {
    pub discounted_subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
    pub free_shipping: bool,
}

/// Applies shipping and flat tax to an already-discounted subtotal.
pub fn summarize_discounted_subtotal(
    discounted_subtotal: Money,
    policy: &CheckoutPolicy,
) -> CoreResult<CheckoutSummary> {
    let free_shipping = discounted_subtotal > policy.free_shipping_threshold;
    let shipping = if free_shipping {
        Money::zero()
    } else {
        policy.flat_shipping_fee
    };
    let tax = discounted_subtotal
        .checked_percent_of(policy.tax_rate)
        .ok_or(CoreError::AmountOverflow)?;
    let total = add(add(discounted_subtotal, shipping)?, tax)?;

    Ok(CheckoutSummary {
        discounted_subtotal,
        shipping,
        tax,
        total,
        free_shipping,
    })
}

/// Computes the checkout summary for a list of lines.
///
/// Line GST is ignored here; this model charges the policy's flat tax.
pub fn compute_checkout_summary(
    lines: &[LineItem],
    policy: &CheckoutPolicy,
) -> CoreResult<CheckoutSummary> {
    for line in lines {
        validate_line_item(line)?;
    }

    let mut discounted_subtotal = Money::zero();
    for line in lines {
        let net = line
            .discounted_unit_price()
            .checked_mul_quantity(line.quantity)
            .ok_or(CoreError::AmountOverflow)?;
        discounted_subtotal = add(discounted_subtotal, net)?;
    }

    summarize_discounted_subtotal(discounted_subtotal, policy)
}

fn add(a: Money, b: Money) -> CoreResult<Money> {
    a.checked_add(b).ok_or(CoreError::AmountOverflow)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Variant;
    use rust_decimal::Decimal;

    fn line(price: i64, discount: u32, gst: u32, quantity: i64) -> LineItem {
        LineItem {
            product_id: "p1".to_string(),
            name: "Item".to_string(),
            image: None,
            unit_price: Money::from_major(price),
            discount: Percent::from_whole(discount).unwrap(),
            gst: Percent::from_whole(gst).unwrap(),
            quantity,
            stock: None,
            variant: Variant::none(),
        }
    }

    #[test]
    fn test_itemized_empty_is_zero() {
        let totals = compute_itemized_total(&[]).unwrap();
        assert_eq!(totals, ItemizedTotals::default());
        assert!(totals.grand_total.is_zero());
    }

    #[test]
    fn test_line_breakdown() {
        let b = line_breakdown(&line(100, 10, 5, 2)).unwrap();

        assert_eq!(b.gross, Money::from_major(200));
        assert_eq!(b.discount, Money::from_major(20));
        assert_eq!(b.net_of_discount, Money::from_major(180));
        assert_eq!(b.tax, Money::from_major(9));
    }

    #[test]
    fn test_itemized_multiple_lines() {
        let lines = vec![line(100, 10, 5, 2), line(50, 0, 12, 1)];
        let totals = compute_itemized_total(&lines).unwrap();

        assert_eq!(totals.subtotal, Money::from_major(250));
        assert_eq!(totals.total_discount, Money::from_major(20));
        assert_eq!(totals.total_tax, Money::from_major(15));
        assert_eq!(totals.grand_total, Money::from_major(245));
    }

    #[test]
    fn test_itemized_keeps_fractions() {
        let mut l = line(0, 0, 0, 3);
        l.unit_price = Money::from_minor(9999);
        l.gst = Percent::new(Decimal::new(125, 1)).unwrap();

        let totals = compute_itemized_total(&[l]).unwrap();
        assert_eq!(totals.total_tax.amount(), Decimal::new(3749625, 5));
        assert_eq!(totals.total_tax.to_string(), "37.50");
    }

    #[test]
    fn test_itemized_rejects_invalid_line() {
        let err = compute_itemized_total(&[line(100, 0, 0, 0)]).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = compute_itemized_total(&[line(-1, 0, 0, 1)]).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_huge_amounts_fail_instead_of_panicking() {
        let quadrillion = 1_000_000_000_000_000;
        let lines = vec![line(quadrillion, 0, 0, quadrillion)];

        let err = compute_itemized_total(&lines).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow));

        let err = compute_checkout_summary(&lines, &CheckoutPolicy::default()).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow));
    }

    #[test]
    fn test_sum_overflow_across_lines() {
        let mut big = line(0, 0, 0, 1);
        big.unit_price = Money::new(Decimal::MAX);
        let lines = vec![big.clone(), big];

        assert!(matches!(
            compute_itemized_total(&lines),
            Err(CoreError::AmountOverflow)
        ));
        assert!(matches!(
            compute_checkout_summary(&lines, &CheckoutPolicy::default()),
            Err(CoreError::AmountOverflow)
        ));
    }

    #[test]
    fn test_summary_below_threshold_pays_shipping() {
        let summary =
            summarize_discounted_subtotal(Money::from_major(90), &CheckoutPolicy::default())
                .unwrap();

        assert_eq!(summary.shipping, Money::from_major(15));
        assert_eq!(summary.tax.amount(), Decimal::new(72, 1));
        assert_eq!(summary.total.amount(), Decimal::new(1122, 1));
        assert!(!summary.free_shipping);
    }

    #[test]
    fn test_summary_above_threshold_ships_free() {
        let summary =
            summarize_discounted_subtotal(Money::from_major(150), &CheckoutPolicy::default())
                .unwrap();

        assert_eq!(summary.shipping, Money::zero());
        assert_eq!(summary.tax, Money::from_major(12));
        assert_eq!(summary.total, Money::from_major(162));
        assert!(summary.free_shipping);
    }

    #[test]
    fn test_summary_threshold_is_strict() {
        let summary =
            summarize_discounted_subtotal(Money::from_major(100), &CheckoutPolicy::default())
                .unwrap();
        assert_eq!(summary.shipping, Money::from_major(15));
    }

    #[test]
    fn test_checkout_summary_from_lines_ignores_gst() {
        // 2 × 50 with 10% off = 90
        let lines = vec![line(50, 10, 18, 2)];
        let summary = compute_checkout_summary(&lines, &CheckoutPolicy::default()).unwrap();

        assert_eq!(summary.discounted_subtotal, Money::from_major(90));
        assert_eq!(summary.total.to_string(), "112.20");
    }

    #[test]
    fn test_checkout_summary_empty_cart_pays_shipping() {
        let summary = compute_checkout_summary(&[], &CheckoutPolicy::default()).unwrap();
        assert_eq!(summary.total, Money::from_major(15));
    }

    #[test]
    fn test_custom_policy() {
        let policy = CheckoutPolicy {
            flat_shipping_fee: Money::from_major(40),
            free_shipping_threshold: Money::from_major(499),
            tax_rate: Percent::zero(),
        };
        let summary = summarize_discounted_subtotal(Money::from_major(450), &policy).unwrap();
        assert_eq!(summary.total, Money::from_major(490));
    }
}

// =============================================================================
// Property Tests
// =============================================================================
