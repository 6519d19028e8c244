//! # Catalog Types
//!
//! Domain types for the item catalog.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │      Item       │   │     Review      │   │  CategoryCount  │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id (i64)       │   │  name           │   │  name           │   │
//! │  │  title          │──►│  comment        │   │  count          │   │
//! │  │  category       │   │  stars          │   │  ("All" first)  │   │
//! │  │  price          │   │  date (server)  │   └─────────────────┘   │
//! │  │  reviews[]      │   └─────────────────┘                         │
//! │  └─────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An item's reviews live *inside* the item document: a review has no
//! independent identity, is never deleted, and is only ever appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Categories
// =============================================================================

/// Reserved label for the synthetic "every category" aggregate.
///
/// Recognized by the query builder in the data layer; never stored as a
/// real category value on any item.
pub const ALL_CATEGORY: &str = "All";

/// A category label paired with the number of items carrying it.
///
/// `get_categories()` returns one of these per distinct category, sorted by
/// label, with an [`ALL_CATEGORY`] entry holding the grand total prepended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Category label (or [`ALL_CATEGORY`]).
    pub name: String,

    /// Number of items in this category.
    pub count: i64,
}

// =============================================================================
// Item
// =============================================================================

/// A catalog item.
///
/// ## Identity
/// `id` is assigned once at catalog load time and never reassigned. It is
/// globally unique across the catalog and doubles as the stable sort key
/// for pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, assigned at catalog load time.
    pub id: i64,

    /// Display title shown in listings and on the item page.
    pub title: String,

    /// Short marketing line ("Made of 100% cotton").
    pub slogan: String,

    /// Long-form description for the item page.
    pub description: String,

    /// Category label used for browsing. Non-empty; never [`ALL_CATEGORY`].
    pub category: String,

    /// Price in the store currency. Non-negative.
    pub price: f64,

    /// Path or URL of the product image.
    pub img_url: String,

    /// Customer reviews, in append order.
    pub reviews: Vec<Review>,
}

impl Item {
    /// Average star rating across reviews, or `None` when unreviewed.
    pub fn average_stars(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let sum: i64 = self.reviews.iter().map(|r| r.stars).sum();
        Some(sum as f64 / self.reviews.len() as f64)
    }
}

// =============================================================================
// Review
// =============================================================================

/// A customer review, owned exclusively by its parent [`Item`].
///
/// `stars` is expected to be 0-5 but is deliberately NOT validated here:
/// input validation is the request layer's concern, and this layer stores
/// what it is given. `date` is always server-assigned at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Reviewer display name.
    pub name: String,

    /// Review body.
    pub comment: String,

    /// Star rating (expected 0-5, unvalidated).
    pub stars: i64,

    /// Server-assigned timestamp of the append.
    pub date: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn review(stars: i64) -> Review {
        Review {
            name: "n".to_string(),
            comment: "c".to_string(),
            stars,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_average_stars() {
        let mut item = Item {
            id: 1,
            title: "Gray Hooded Sweatshirt".to_string(),
            slogan: "Made of 100% cotton".to_string(),
            description: "The top hooded sweatshirt we offer".to_string(),
            category: "Apparel".to_string(),
            price: 29.99,
            img_url: "/img/products/hoodie.jpg".to_string(),
            reviews: vec![],
        };

        assert_eq!(item.average_stars(), None);

        item.reviews.push(review(4));
        item.reviews.push(review(5));
        assert_eq!(item.average_stars(), Some(4.5));
    }

    #[test]
    fn test_review_json_round_trip() {
        let original = review(3);
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Review = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
