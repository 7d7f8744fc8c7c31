//! # Money Module
//!
//! Provides the `Money` and `Percent` types for prices, discounts and taxes.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    90 * 0.08 = 7.2 but 0.1 + 0.2 = 0.30000000000000004  ❌             │
//! │                                                                         │
//! │  Line discounts and GST produce fractions of a paisa:                  │
//! │    ₹99.99 × 12.5% = ₹12.49875                                          │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal with full precision                     │
//! │    Totals are summed exactly, then rounded ONCE for display            │
//! │    (Money::rounded → 2 decimal places)                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use paglu_core::money::{Money, Percent};
//! use rust_decimal::Decimal;
//!
//! let price = Money::from_minor(9999); // ₹99.99
//! let gst = Percent::new(Decimal::new(125, 1)).unwrap(); // 12.5%
//!
//! let tax = price.percent_of(gst);
//! assert_eq!(tax.amount(), Decimal::new(1249875, 5)); // exact
//! assert_eq!(tax.to_string(), "12.50"); // display rounding only
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Decimal places used when presenting money.
pub const DISPLAY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the store currency.
///
/// ## Design Decisions
/// - **Decimal, not f64**: discount and GST fractions stay exact
/// - **Full precision**: arithmetic never rounds; callers round at the boundary
/// - **Serialized as a string**: `"112.2"` survives JSON without float drift
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price ──► LineItem.unit_price ──► line_breakdown()            │
/// │                                                 │                       │
/// │                         ┌───────────────────────┴──────────┐           │
/// │                         ▼                                  ▼           │
/// │            compute_itemized_total()          compute_checkout_summary() │
/// │            (admin order details, GST)        (cart + checkout page)    │
/// │                                                        │               │
/// │                                                        ▼               │
/// │                                              Order.total (snapshot)    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates money from whole currency units (₹15 → `from_major(15)`).
    #[inline]
    pub fn from_major(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Creates money from minor units (paise / cents).
    ///
    /// ## Example
    /// ```rust
    /// use paglu_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(1099).to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_minor(minor: i64) -> Self {
        Money(Decimal::new(minor, DISPLAY_DECIMALS))
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the exact amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is below zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to two decimal places, half away from zero.
    ///
    /// Only presentation and payment-gateway amounts should be rounded.
    pub fn rounded(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Returns the amount in minor units after display rounding.
    ///
    /// Payment gateways take integer paise (`amount * 100`).
    pub fn to_minor_units(&self) -> Option<i64> {
        (self.rounded().0 * Decimal::ONE_HUNDRED).trunc().to_i64()
    }

    /// Returns `percent` of this amount, unrounded.
    #[inline]
    pub fn percent_of(&self, percent: Percent) -> Money {
        Money(self.0 * percent.fraction())
    }

    /// Returns this amount with `percent` taken off, unrounded.
    #[inline]
    pub fn less_percent(&self, percent: Percent) -> Money {
        *self - self.percent_of(percent)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use paglu_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(299);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_minor(897));
    /// ```
    ///
    /// Panics if the product overflows; pricing uses
    /// [`Money::checked_mul_quantity`].
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Multiplies by a quantity, `None` on overflow.
    #[inline]
    pub fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Returns `percent` of this amount, `None` on overflow.
    #[inline]
    pub fn checked_percent_of(&self, percent: Percent) -> Option<Self> {
        self.0.checked_mul(percent.fraction()).map(Money)
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts, `None` on overflow.
    #[inline]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Money)
    }
}

/// Display shows the amount rounded to two decimals, without a symbol.
///
/// ## Note
/// Currency symbols are a frontend concern (the storefront shows `₹`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded().0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Percent Type
// =============================================================================

/// A percentage in the closed range `[0, 100]`.
///
/// Used for product discounts, per-line GST and the flat checkout tax.
/// Out-of-range values are rejected at construction and when deserializing,
/// so a `Percent` in hand is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[serde(try_from = "Decimal", into = "Decimal")]
#[ts(export)]
pub struct Percent(#[ts(type = "string")] Decimal);

impl Percent {
    /// Creates a percentage, rejecting values outside `[0, 100]`.
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(ValidationError::OutOfRange {
                field: "percent".to_string(),
                min: "0".to_string(),
                max: "100".to_string(),
            });
        }
        Ok(Percent(value.normalize()))
    }

    /// Creates a whole-number percentage (`from_whole(8)` = 8%).
    pub fn from_whole(value: u32) -> Result<Self, ValidationError> {
        Percent::new(Decimal::from(value))
    }

    /// Zero percent. Missing discounts and GST default to this.
    #[inline]
    pub const fn zero() -> Self {
        Percent(Decimal::ZERO)
    }

    /// Returns the percentage value (8% → 8).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the multiplier (8% → 0.08).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Builds a percentage known to be in range (crate constants only).
    pub(crate) fn from_whole_const(value: u8) -> Self {
        Percent(Decimal::from(value.min(100)))
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Percent::new(value)
    }
}

impl From<Percent> for Decimal {
    fn from(percent: Percent) -> Self {
        percent.0
    }
}

impl FromStr for Percent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|e| ValidationError::InvalidFormat {
            field: "percent".to_string(),
            reason: e.to_string(),
        })?;
        Percent::new(value)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor_and_major() {
        assert_eq!(Money::from_minor(1099).amount(), Decimal::new(1099, 2));
        assert_eq!(Money::from_major(15).amount(), Decimal::from(15));
        assert_eq!(Money::from_minor(1500), Money::from_major(15));
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Money::from_major(0).to_string(), "0.00");
        assert_eq!(Money::new(Decimal::new(72, 1)).to_string(), "7.20");
        assert_eq!(Money::new(Decimal::new(12345, 3)).to_string(), "12.35");
        assert_eq!(Money::new(Decimal::new(12344, 3)).to_string(), "12.34");
    }

    #[test]
    fn test_percent_of_keeps_full_precision() {
        let price = Money::from_minor(9999);
        let gst = Percent::new(Decimal::new(125, 1)).unwrap();
        let tax = price.percent_of(gst);

        assert_eq!(tax.amount(), Decimal::new(1249875, 5));
        assert_eq!(tax.rounded().amount(), Decimal::new(1250, 2));
    }

    #[test]
    fn test_less_percent() {
        let price = Money::from_major(100);
        let discount = Percent::from_whole(10).unwrap();
        assert_eq!(price.less_percent(discount), Money::from_major(90));
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_major(10);
        let b = Money::from_major(5);

        assert_eq!(a + b, Money::from_major(15));
        assert_eq!(a - b, Money::from_major(5));
        assert_eq!(a * 3, Money::from_major(30));

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total, Money::from_major(20));
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let huge = Money::new(Decimal::MAX);

        assert_eq!(huge.checked_add(Money::from_major(1)), None);
        assert_eq!(huge.checked_mul_quantity(2), None);
        assert_eq!(Money::new(Decimal::MIN).checked_sub(Money::from_major(1)), None);
        assert_eq!(
            Money::from_major(10).checked_mul_quantity(3),
            Some(Money::from_major(30))
        );
        assert_eq!(
            Money::from_major(200).checked_percent_of(Percent::from_whole(8).unwrap()),
            Some(Money::from_major(16))
        );
    }

    #[test]
    fn test_is_negative() {
        assert!(!Money::zero().is_negative());
        assert!((Money::from_major(1) - Money::from_major(2)).is_negative());
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(Money::new(Decimal::new(1122, 1)).to_minor_units(), Some(11220));
        assert_eq!(Money::new(Decimal::new(100005, 3)).to_minor_units(), Some(10001));
        assert_eq!(Money::zero().to_minor_units(), Some(0));
    }

    #[test]
    fn test_percent_range() {
        assert!(Percent::new(Decimal::ZERO).is_ok());
        assert!(Percent::new(Decimal::ONE_HUNDRED).is_ok());
        assert!(Percent::new(Decimal::new(-1, 0)).is_err());
        assert!(Percent::new(Decimal::new(1001, 1)).is_err());
    }

    #[test]
    fn test_percent_fraction() {
        let rate = Percent::from_whole(8).unwrap();
        assert_eq!(rate.fraction(), Decimal::new(8, 2));
        assert!(Percent::zero().is_zero());
    }

    #[test]
    fn test_percent_deserialization_rejects_out_of_range() {
        let ok: Percent = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(ok.value(), Decimal::new(125, 1));

        assert!(serde_json::from_str::<Percent>("\"150\"").is_err());
        assert!(serde_json::from_str::<Percent>("\"-5\"").is_err());
    }

    #[test]
    fn test_money_serializes_as_string() {
        let json = serde_json::to_string(&Money::from_minor(1099)).unwrap();
        assert_eq!(json, "\"10.99\"");

        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Money::from_minor(1099));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("15".parse::<Money>().unwrap(), Money::from_major(15));
        assert_eq!(" 7.5 ".parse::<Percent>().unwrap().value(), Decimal::new(75, 1));
        assert!("abc".parse::<Percent>().is_err());
    }
}
