//! # Cart Repository
//!
//! Read/write access to per-user cart documents. One row per user; the
//! cart's entries live in a JSON array column, so the row *is* the cart
//! document and every mutation below is a single atomic statement.
//!
//! ## Mutation Primitives
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Cart Mutations (each atomic)                     │
//! │                                                                     │
//! │  add_item ────────► upsert row, append entry, return post-image     │
//! │  update_quantity ─► qty > 0: set first matching entry in place      │
//! │                     qty = 0: pull matching entries from the array   │
//! │  find_item_in_cart► decompose array server-side, project the match  │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Caller Protocol (load-bearing!)
//! `add_item` appends blindly - it does NOT merge with an existing entry
//! for the same item id. Duplicate prevention belongs to the caller:
//!
//! 1. `find_item_in_cart(user, item)`
//! 2. absent  → fetch the catalog item, `add_item` with quantity 1
//! 3. present → `update_quantity(user, item, current + 1)`
//!
//! The two steps are NOT atomic together: two concurrent "add item X"
//! requests for one user can both observe "absent" and both append,
//! leaving two entries for the same id. Known, documented limitation -
//! kept for compatibility with the system this layer reimplements.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use mart_core::{Cart, CartItem};

/// Raw cart row: the `items` document column still serialized.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    user_id: String,
    items: String,
}

impl CartRow {
    fn into_cart(self) -> DbResult<Cart> {
        let items: Vec<CartItem> =
            serde_json::from_str(&self.items).map_err(|e| DbError::malformed("cart", e))?;

        Ok(Cart {
            user_id: self.user_id,
            items,
        })
    }
}

/// Repository for cart operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Gets a user's cart.
    ///
    /// ## Returns
    /// * `Ok(Some(Cart))` - the cart (possibly with zero entries)
    /// * `Ok(None)` - the user has never added anything: no cart document
    ///   exists yet. Distinct from an empty cart.
    pub async fn get_cart(&self, user_id: &str) -> DbResult<Option<Cart>> {
        let row: Option<CartRow> =
            sqlx::query_as("SELECT user_id, items FROM carts WHERE user_id = ?1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(CartRow::into_cart).transpose()
    }

    /// Locates one item inside a user's cart.
    ///
    /// The cart's item array is decomposed *server-side* (`json_each`),
    /// matched on the entry's `id`, and only the matched entry is
    /// projected back - the equivalent of an unwind/match/project
    /// pipeline, atomic with respect to the read. No client-side scan.
    pub async fn find_item_in_cart(
        &self,
        user_id: &str,
        item_id: i64,
    ) -> DbResult<Option<CartItem>> {
        let entry: Option<String> = sqlx::query_scalar(
            r#"
            SELECT entry.value
            FROM carts, json_each(carts.items) AS entry
            WHERE carts.user_id = ?1
              AND json_extract(entry.value, '$.id') = ?2
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        entry
            .map(|json| serde_json::from_str(&json).map_err(|e| DbError::malformed("cart item", e)))
            .transpose()
    }

    /// Appends an item snapshot to a user's cart, creating the cart if
    /// this is the user's first add (upsert). Returns the post-mutation
    /// cart so the caller can render it without a second read.
    ///
    /// One atomic statement. **Deliberately does NOT check whether an
    /// entry with the same item id already exists** - see the caller
    /// protocol in the module docs. Callers that skip the
    /// `find_item_in_cart` check get duplicate entries, by contract.
    pub async fn add_item(&self, user_id: &str, item: &CartItem) -> DbResult<Cart> {
        let item_json =
            serde_json::to_string(item).map_err(|e| DbError::malformed("cart item", e))?;

        debug!(user_id = %user_id, item_id = item.id, quantity = item.quantity, "Adding cart item");

        let row: CartRow = sqlx::query_as(
            r#"
            INSERT INTO carts (user_id, items)
            VALUES (?1, json_array(json(?2)))
            ON CONFLICT(user_id) DO UPDATE
                SET items = json_insert(items, '$[#]', json(?2))
            RETURNING user_id, items
            "#,
        )
        .bind(user_id)
        .bind(&item_json)
        .fetch_one(&self.pool)
        .await?;

        row.into_cart()
    }

    /// Sets an entry's quantity in place, or removes it when `quantity`
    /// is zero. Matches on the `(user_id, entry id)` compound filter, in
    /// one atomic statement - no read-modify-write round trip.
    ///
    /// * `quantity > 0`: sets the **first** entry whose `id` matches
    ///   (positional-update semantics; under the intended one-entry-per-id
    ///   invariant there is only one).
    /// * `quantity == 0`: pulls *every* entry whose `id` matches out of
    ///   the array. The cart document itself stays behind even when this
    ///   empties it.
    ///
    /// ## Returns
    /// * `Ok(Some(Cart))` - the post-mutation cart
    /// * `Ok(None)` - no cart for this user, or no entry with this id
    pub async fn update_quantity(
        &self,
        user_id: &str,
        item_id: i64,
        quantity: u32,
    ) -> DbResult<Option<Cart>> {
        debug!(user_id = %user_id, item_id, quantity, "Updating cart quantity");

        let row: Option<CartRow> = if quantity == 0 {
            sqlx::query_as(
                r#"
                UPDATE carts
                SET items = (
                    SELECT json_group_array(json(entry.value))
                    FROM json_each(carts.items) AS entry
                    WHERE json_extract(entry.value, '$.id') <> ?2
                )
                WHERE user_id = ?1
                  AND EXISTS (
                    SELECT 1 FROM json_each(carts.items) AS entry
                    WHERE json_extract(entry.value, '$.id') = ?2
                  )
                RETURNING user_id, items
                "#,
            )
            .bind(user_id)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?
        } else {
            sqlx::query_as(
                r#"
                UPDATE carts
                SET items = json_set(
                    items,
                    '$[' || (
                        SELECT entry.key FROM json_each(carts.items) AS entry
                        WHERE json_extract(entry.value, '$.id') = ?2
                        LIMIT 1
                    ) || '].quantity',
                    ?3
                )
                WHERE user_id = ?1
                  AND EXISTS (
                    SELECT 1 FROM json_each(carts.items) AS entry
                    WHERE json_extract(entry.value, '$.id') = ?2
                  )
                RETURNING user_id, items
                "#,
            )
            .bind(user_id)
            .bind(item_id)
            .bind(i64::from(quantity))
            .fetch_optional(&self.pool)
            .await?
        };

        row.map(CartRow::into_cart).transpose()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use mart_core::Item;

    fn catalog_item(id: i64, title: &str, price: f64) -> Item {
        Item {
            id,
            title: title.to_string(),
            slogan: String::new(),
            description: String::new(),
            category: "Apparel".to_string(),
            price,
            img_url: String::new(),
            reviews: vec![],
        }
    }

    fn entry(id: i64, price: f64, quantity: u32) -> CartItem {
        CartItem {
            id,
            title: format!("item-{id}"),
            price,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_no_cart_is_absent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.carts().get_cart("u1").await.unwrap().is_none());
        assert!(db
            .carts()
            .find_item_in_cart("u1", 42)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_first_add_creates_cart() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let carts = db.carts();

        let cart = carts.add_item("u1", &entry(7, 9.99, 1)).await.unwrap();
        assert_eq!(cart.user_id, "u1");
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].id, 7);
        assert_eq!(cart.items[0].quantity, 1);

        let fetched = carts.get_cart("u1").await.unwrap().unwrap();
        assert_eq!(fetched, cart);
    }

    #[tokio::test]
    async fn test_find_item_in_cart() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let carts = db.carts();

        carts.add_item("u1", &entry(7, 9.99, 1)).await.unwrap();
        carts.add_item("u1", &entry(8, 4.99, 2)).await.unwrap();

        let found = carts.find_item_in_cart("u1", 8).await.unwrap().unwrap();
        assert_eq!(found.id, 8);
        assert_eq!(found.quantity, 2);

        assert!(carts.find_item_in_cart("u1", 99).await.unwrap().is_none());
        // Another user's cart is invisible
        assert!(carts.find_item_in_cart("u2", 7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_quantity_sets_only_target_entry() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let carts = db.carts();

        carts.add_item("u1", &entry(7, 9.99, 1)).await.unwrap();
        carts.add_item("u1", &entry(8, 4.99, 2)).await.unwrap();

        let cart = carts.update_quantity("u1", 7, 3).await.unwrap().unwrap();
        assert_eq!(cart.quantity_of(7), 3);
        assert_eq!(cart.quantity_of(8), 2);
        // Snapshot fields untouched
        assert_eq!(cart.items[0].title, "item-7");
        assert!((cart.items[0].price - 9.99).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_quantity_zero_removes_entry_keeps_cart() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let carts = db.carts();

        carts.add_item("u1", &entry(7, 9.99, 1)).await.unwrap();

        let cart = carts.update_quantity("u1", 7, 0).await.unwrap().unwrap();
        assert!(cart.items.is_empty());

        // The emptied cart document is still there - not garbage-collected
        let fetched = carts.get_cart("u1").await.unwrap().unwrap();
        assert!(fetched.is_empty());
    }

    #[tokio::test]
    async fn test_update_quantity_no_match_is_absent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let carts = db.carts();

        // No cart at all
        assert!(carts.update_quantity("u1", 7, 2).await.unwrap().is_none());

        // Cart exists, entry doesn't
        carts.add_item("u1", &entry(8, 4.99, 1)).await.unwrap();
        assert!(carts.update_quantity("u1", 7, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blind_double_add_duplicates() {
        // The documented gap: add_item never merges. Skipping the
        // find_item_in_cart check produces two entries for one id.
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let carts = db.carts();

        carts.add_item("u1", &entry(7, 9.99, 1)).await.unwrap();
        let cart = carts.add_item("u1", &entry(7, 9.99, 1)).await.unwrap();

        assert_eq!(cart.items.len(), 2);
        assert!(cart.items.iter().all(|i| i.id == 7));
    }

    #[tokio::test]
    async fn test_check_then_act_protocol() {
        // The full storefront scenario: empty cart, check, snapshot the
        // catalog item, add, then increment via update_quantity.
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.items()
            .insert(&catalog_item(42, "Gray Hooded Sweatshirt", 29.99))
            .await
            .unwrap();

        let carts = db.carts();

        assert!(carts.find_item_in_cart("u1", 42).await.unwrap().is_none());

        let item = db.items().get_item(42).await.unwrap().unwrap();
        let cart = carts
            .add_item("u1", &CartItem::from_item(&item, 1))
            .await
            .unwrap();
        assert_eq!(cart.items.len(), 1);
        assert!((cart.total() - 29.99).abs() < 1e-9);

        // Second add of the same item goes through update_quantity
        let existing = carts.find_item_in_cart("u1", 42).await.unwrap().unwrap();
        let cart = carts
            .update_quantity("u1", 42, existing.quantity + 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of(42), 2);
        assert!((cart.total() - 59.98).abs() < 1e-9);
    }
}
