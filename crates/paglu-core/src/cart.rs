//! # Cart Consolidation Engine
//!
//! A per-user cart holding at most one line per `(product_id, color, size)`.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Storefront Action        Engine Call               State Change        │
//! │  ─────────────────        ───────────               ────────────        │
//! │                                                                         │
//! │  Add to Cart ────────────► add_item() ────────────► line.qty += n      │
//! │                                                      or push new line   │
//! │                                                                         │
//! │  Quantity Stepper ───────► update_quantity() ─────► line.qty = n       │
//! │                                                      (1..=stock)        │
//! │                                                                         │
//! │  Remove ─────────────────► remove_item() ─────────► retain others      │
//! │                                                                         │
//! │  Clear / after checkout ─► clear() ───────────────► items.clear()      │
//! │                                                                         │
//! │  Unknown (product, variant) on update/remove: no-op, never an error.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine is pure. The service layer loads the cart, calls one of these
//! methods, and writes the cart back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{LineItem, Product, Variant};
use crate::validation::validate_quantity;

/// A customer's shopping cart.
///
/// ## Invariants
/// - Lines are unique by `(product_id, color, size)`
/// - Every quantity is at least 1
/// - Lines keep insertion order
/// - `updated_at` moves only when the contents change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    pub user_id: String,
    pub items: Vec<LineItem>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Creates an empty cart for `user_id`.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Cart {
            user_id: user_id.into(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds a product to the cart, merging with an existing line.
    ///
    /// ## Behavior
    /// - Same `(product, color, size)` already present: quantity increases
    /// - Otherwise: a new line snapshots the product's current catalog data
    /// - `quantity` defaults to 1
    ///
    /// No stock clamp happens here; stock is enforced by `update_quantity`.
    /// A merge that would overflow the quantity is rejected and leaves the
    /// cart untouched.
    ///
    /// ## Example
    /// ```rust,ignore
    /// cart.add_item(&tee, Some(2), Variant::new("red", "M"))?;
    /// cart.add_item(&tee, None, Variant::new("red", "M"))?;
    /// assert_eq!(cart.items[0].quantity, 3);
    /// ```
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: Option<i64>,
        variant: Variant,
    ) -> CoreResult<()> {
        let quantity = quantity.unwrap_or(1);
        validate_quantity(quantity)?;

        match self.find_mut(&product.id, &variant) {
            Some(line) => {
                line.quantity = line.quantity.checked_add(quantity).ok_or_else(|| {
                    ValidationError::OutOfRange {
                        field: "quantity".to_string(),
                        min: "1".to_string(),
                        max: i64::MAX.to_string(),
                    }
                })?;
            }
            None => self
                .items
                .push(LineItem::from_product(product, quantity, variant)),
        }

        self.touch();
        Ok(())
    }

    /// Sets the quantity of one line.
    ///
    /// ## Returns
    /// - `Ok(true)` when the line existed and was updated
    /// - `Ok(false)` when no such line exists (no-op)
    /// - `Err` when `new_quantity < 1`, or exceeds the line's known stock
    ///
    /// A rejected call leaves the cart untouched.
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        variant: &Variant,
        new_quantity: i64,
    ) -> CoreResult<bool> {
        let Some(line) = self.find_mut(product_id, variant) else {
            return Ok(false);
        };

        validate_quantity(new_quantity)?;

        if let Some(available) = line.stock {
            if new_quantity > available {
                return Err(CoreError::InsufficientStock {
                    product_id: product_id.to_string(),
                    available,
                    requested: new_quantity,
                });
            }
        }

        if line.quantity != new_quantity {
            line.quantity = new_quantity;
            self.touch();
        }
        Ok(true)
    }

    /// Removes the line matching `(product_id, variant)`.
    ///
    /// Returns the number of lines removed (0 or 1). Removing a missing line
    /// is a no-op.
    pub fn remove_item(&mut self, product_id: &str, variant: &Variant) -> usize {
        let before = self.items.len();
        self.items.retain(|line| !line.matches(product_id, variant));

        let removed = before - self.items.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.touch();
        }
    }

    /// Looks up a line by identity.
    pub fn find(&self, product_id: &str, variant: &Variant) -> Option<&LineItem> {
        self.items
            .iter()
            .find(|line| line.matches(product_id, variant))
    }

    /// Returns the number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn find_mut(&mut self, product_id: &str, variant: &Variant) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|line| line.matches(product_id, variant))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================


// =============================================================================
// Property Tests
// =============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::types::sample_product;
    use proptest::prelude::*;

    fn variant_strategy() -> impl Strategy<Value = Variant> {
        (
            prop::sample::select(vec!["", "red", "blue"]),
            prop::sample::select(vec!["", "S", "M", "L"]),
        )
            .prop_map(|(color, size)| Variant::new(color, size))
    }

    proptest! {
        #[test]
        fn adding_same_line_twice_sums_quantities(
            q1 in 1i64..1000,
            q2 in 1i64..1000,
            variant in variant_strategy(),
        ) {
            let mut cart = Cart::new("u1");
            let product = sample_product("p1");

            cart.add_item(&product, Some(q1), variant.clone()).unwrap();
            cart.add_item(&product, Some(q2), variant.clone()).unwrap();

            prop_assert_eq!(cart.item_count(), 1);
            prop_assert_eq!(cart.find("p1", &variant).map(|l| l.quantity), Some(q1 + q2));
        }

        #[test]
        fn different_variants_never_merge(
            a in variant_strategy(),
            b in variant_strategy(),
        ) {
            prop_assume!(a != b);
            let mut cart = Cart::new("u1");
            let product = sample_product("p1");

            cart.add_item(&product, None, a).unwrap();
            cart.add_item(&product, None, b).unwrap();

            prop_assert_eq!(cart.item_count(), 2);
        }

        #[test]
        fn lines_stay_unique(
            ops in prop::collection::vec(
                (prop::sample::select(vec!["p1", "p2"]), variant_strategy(), 1i64..5),
                0..40,
            ),
        ) {
            let mut cart = Cart::new("u1");
            for (id, variant, qty) in ops {
                cart.add_item(&sample_product(id), Some(qty), variant).unwrap();
            }

            for (i, a) in cart.items.iter().enumerate() {
                for b in cart.items.iter().skip(i + 1) {
                    prop_assert!(!a.same_line(b));
                }
                prop_assert!(a.quantity >= 1);
            }
        }
    }
}
