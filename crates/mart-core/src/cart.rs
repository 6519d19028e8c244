//! # Cart Types & Math
//!
//! The shopping cart domain model.
//!
//! ## One Cart, One Document
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Cart = one document per user                    │
//! │                                                                     │
//! │  Cart { user_id: "u1" }                                             │
//! │    └── items: [                                                     │
//! │          CartItem { id: 42, title, price: 29.99, quantity: 1 },     │
//! │          CartItem { id: 7,  title, price:  9.99, quantity: 3 },     │
//! │        ]                                                            │
//! │                                                                     │
//! │  • created implicitly on first add (upsert)                         │
//! │  • entries removed when quantity hits zero                          │
//! │  • the empty cart document itself is never garbage-collected        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A [`CartItem`] copies `title` and `price` from the catalog item at
//! add-time and is never re-synced if the catalog changes. The cart shows
//! price-at-add-time, the same trade-off a printed receipt makes.

use serde::{Deserialize, Serialize};

use crate::types::Item;

// =============================================================================
// Cart Item
// =============================================================================

/// A catalog item snapshot inside a cart, plus its quantity.
///
/// `quantity` is always positive in a stored cart: a quantity of zero is a
/// removal signal to the data layer, never persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Identifier of the source catalog item.
    pub id: i64,

    /// Title snapshot, taken at add-time.
    pub title: String,

    /// Price snapshot, taken at add-time. NOT re-synced on catalog change.
    pub price: f64,

    /// Units of this item in the cart. Positive.
    pub quantity: u32,
}

impl CartItem {
    /// Snapshots a catalog item into a cart entry.
    pub fn from_item(item: &Item, quantity: u32) -> Self {
        CartItem {
            id: item.id,
            title: item.title.clone(),
            price: item.price,
            quantity,
        }
    }

    /// Line total for this entry (snapshot price × quantity).
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A user's shopping cart.
///
/// Identity key is `user_id`; there is one logical cart per user. Intended
/// invariant: at most one [`CartItem`] per distinct item `id` - upheld by
/// the caller's check-then-act protocol, not by the storage primitive (see
/// the data layer's `CartRepository::add_item`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Owning user. Opaque stable key.
    pub user_id: String,

    /// Cart entries, in add order.
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Sum of all line totals.
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all entries.
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Quantity of a given item, or 0 when absent.
    pub fn quantity_of(&self, item_id: i64) -> u32 {
        self.items
            .iter()
            .find(|i| i.id == item_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    /// True when the cart holds no entries (distinct from "no cart").
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, price: f64, quantity: u32) -> CartItem {
        CartItem {
            id,
            title: format!("item-{id}"),
            price,
            quantity,
        }
    }

    #[test]
    fn test_cart_total() {
        let cart = Cart {
            user_id: "u1".to_string(),
            items: vec![entry(42, 29.99, 1), entry(7, 9.99, 3)],
        };

        assert!((cart.total() - 59.96).abs() < 1e-9);
        assert_eq!(cart.unit_count(), 4);
    }

    #[test]
    fn test_quantity_of() {
        let cart = Cart {
            user_id: "u1".to_string(),
            items: vec![entry(42, 29.99, 2)],
        };

        assert_eq!(cart.quantity_of(42), 2);
        assert_eq!(cart.quantity_of(7), 0);
    }

    #[test]
    fn test_snapshot_from_item() {
        let item = Item {
            id: 42,
            title: "Travel Mug".to_string(),
            slogan: "Keeps it hot".to_string(),
            description: "Steel travel mug".to_string(),
            category: "Kitchen".to_string(),
            price: 12.99,
            img_url: "/img/products/mug.jpg".to_string(),
            reviews: vec![],
        };

        let snapshot = CartItem::from_item(&item, 1);
        assert_eq!(snapshot.id, 42);
        assert_eq!(snapshot.title, "Travel Mug");
        assert!((snapshot.line_total() - 12.99).abs() < 1e-9);
    }

    #[test]
    fn test_empty_cart_is_not_no_cart() {
        let cart = Cart {
            user_id: "u1".to_string(),
            items: vec![],
        };
        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0.0);
    }
}
