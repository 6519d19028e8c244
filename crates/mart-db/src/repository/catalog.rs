//! # Catalog Repository
//!
//! Read-mostly access to the item catalog, plus the append-only review
//! mutation.
//!
//! ## Query Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Access Paths                           │
//! │                                                                     │
//! │  get_categories ──► GROUP BY category + synthetic "All" total       │
//! │  get_items ───────► category filter, ORDER BY id, LIMIT/OFFSET      │
//! │  search_items ────► FTS5 MATCH, rank then id, LIMIT/OFFSET          │
//! │  get_item ────────► exact id lookup (absence is a value)            │
//! │  add_review ──────► one atomic json_insert append                   │
//! │  get_related ─────► first 4 in storage order (placeholder)          │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pagination
//! `page` is zero-based; the window is `skip = page * page_size,
//! limit = page_size` over the filtered set sorted ascending by `id`, so
//! page boundaries are stable between requests.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use mart_core::{CategoryCount, Item, Review, ALL_CATEGORY};

/// Shared select list for item queries. `reviews` comes back as the raw
/// JSON column and is parsed in [`ItemRow::into_item`].
const ITEM_COLUMNS: &str = "id, title, slogan, description, category, price, img_url, reviews";

/// Builds the FTS5 MATCH string for user search text.
///
/// Search text is arbitrary shopper input, so every whitespace-separated
/// token is wrapped as an FTS5 string literal (embedded quotes doubled)
/// before the trailing prefix star. Quotes, parentheses, hyphens and the
/// like are then matched as text instead of being parsed as FTS5 query
/// operators: `t-shirt (red)` becomes `"t-shirt"* "(red)"*`.
fn fts_match_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(|token| format!("\"{}\"*", token.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Raw item row: the `reviews` document column still serialized.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i64,
    title: String,
    slogan: String,
    description: String,
    category: String,
    price: f64,
    img_url: String,
    reviews: String,
}

impl ItemRow {
    /// Parses the embedded reviews document. A blob that fails to parse is
    /// surfaced as [`DbError::MalformedDocument`], never defaulted to an
    /// empty list.
    fn into_item(self) -> DbResult<Item> {
        let reviews: Vec<Review> =
            serde_json::from_str(&self.reviews).map_err(|e| DbError::malformed("item", e))?;

        Ok(Item {
            id: self.id,
            title: self.title,
            slogan: self.slogan,
            description: self.description,
            category: self.category,
            price: self.price,
            img_url: self.img_url,
            reviews,
        })
    }
}

/// Repository for catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// let categories = repo.get_categories().await?;
/// let page = repo.get_items("Apparel", 0, 5).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Lists categories with their item counts.
    ///
    /// Counting happens server-side (`GROUP BY category`) - the catalog is
    /// never loaded into memory for this. Categories come back sorted by
    /// label ascending, with a synthetic [`ALL_CATEGORY`] entry holding the
    /// grand total prepended.
    pub async fn get_categories(&self) -> DbResult<Vec<CategoryCount>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT category, COUNT(*)
            FROM items
            GROUP BY category
            ORDER BY category ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = rows.iter().map(|(_, n)| n).sum();

        let mut categories = Vec::with_capacity(rows.len() + 1);
        categories.push(CategoryCount {
            name: ALL_CATEGORY.to_string(),
            count: total,
        });
        categories.extend(
            rows.into_iter()
                .map(|(name, count)| CategoryCount { name, count }),
        );

        debug!(categories = categories.len() - 1, total, "Listed categories");
        Ok(categories)
    }

    /// Gets one page of items for a category.
    ///
    /// [`ALL_CATEGORY`] means no filter; anything else is an exact match.
    /// Sorted ascending by `id` for a stable pagination order. `page` is
    /// zero-based.
    pub async fn get_items(&self, category: &str, page: u32, page_size: u32) -> DbResult<Vec<Item>> {
        let limit = i64::from(page_size);
        let offset = i64::from(page) * i64::from(page_size);

        debug!(category = %category, page, page_size, "Browsing items");

        let rows: Vec<ItemRow> = if category == ALL_CATEGORY {
            sqlx::query_as(&format!(
                "SELECT {ITEM_COLUMNS} FROM items ORDER BY id ASC LIMIT ?1 OFFSET ?2"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as(&format!(
                "SELECT {ITEM_COLUMNS} FROM items WHERE category = ?1 \
                 ORDER BY id ASC LIMIT ?2 OFFSET ?3"
            ))
            .bind(category)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        };

        rows.into_iter().map(ItemRow::into_item).collect()
    }

    /// Counts items for a category (same filter as [`get_items`]).
    ///
    /// [`get_items`]: ItemRepository::get_items
    pub async fn get_item_count(&self, category: &str) -> DbResult<i64> {
        let count: i64 = if category == ALL_CATEGORY {
            sqlx::query_scalar("SELECT COUNT(*) FROM items")
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE category = ?1")
                .bind(category)
                .fetch_one(&self.pool)
                .await?
        };

        Ok(count)
    }

    /// Searches the catalog with full-text search, paginated.
    ///
    /// A query that trims to empty behaves exactly like browsing
    /// [`ALL_CATEGORY`] (no filter, sorted by `id`). A non-empty query
    /// matches the FTS index over title/slogan/description/category with a
    /// trailing prefix wildcard, so "hood" also finds "hoodie".
    ///
    /// Result order for a non-empty query: relevance rank first (best
    /// match first), then `id` ascending as a deterministic tiebreaker.
    pub async fn search_items(&self, query: &str, page: u32, page_size: u32) -> DbResult<Vec<Item>> {
        let query = query.trim();

        debug!(query = %query, page, page_size, "Searching items");

        if query.is_empty() {
            return self.get_items(ALL_CATEGORY, page, page_size).await;
        }

        // "hood" becomes "hood"* to match "hood", "hoodie", ...
        let fts_query = fts_match_query(query);

        let rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT items.id, items.title, items.slogan, items.description,
                   items.category, items.price, items.img_url, items.reviews
            FROM items
            INNER JOIN items_fts ON items.id = items_fts.rowid
            WHERE items_fts MATCH ?1
            ORDER BY items_fts.rank, items.id ASC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(&fts_query)
        .bind(i64::from(page_size))
        .bind(i64::from(page) * i64::from(page_size))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Search returned items");
        rows.into_iter().map(ItemRow::into_item).collect()
    }

    /// Counts search results (same filter as [`search_items`]).
    ///
    /// [`search_items`]: ItemRepository::search_items
    pub async fn get_search_item_count(&self, query: &str) -> DbResult<i64> {
        let query = query.trim();

        if query.is_empty() {
            return self.get_item_count(ALL_CATEGORY).await;
        }

        let fts_query = fts_match_query(query);

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM items_fts WHERE items_fts MATCH ?1")
                .bind(&fts_query)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Gets an item by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - No such item (an expected outcome, not an error:
    ///   the request layer turns it into a 404)
    pub async fn get_item(&self, id: i64) -> DbResult<Option<Item>> {
        let row: Option<ItemRow> =
            sqlx::query_as(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(ItemRow::into_item).transpose()
    }

    /// Appends a review to an item.
    ///
    /// The review timestamp is server-assigned here, at write time. The
    /// append is one atomic `json_insert` UPDATE; two concurrent reviews of
    /// the same item both land, in some order, without clobbering each
    /// other. No validation of `stars` or emptiness is performed at this
    /// layer.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - the item doesn't exist
    pub async fn add_review(
        &self,
        item_id: i64,
        comment: &str,
        name: &str,
        stars: i64,
    ) -> DbResult<()> {
        let review = Review {
            name: name.to_string(),
            comment: comment.to_string(),
            stars,
            date: Utc::now(),
        };
        let review_json = serde_json::to_string(&review).map_err(|e| DbError::malformed("review", e))?;

        debug!(item_id, stars, "Appending review");

        let result = sqlx::query(
            r#"
            UPDATE items
            SET reviews = json_insert(reviews, '$[#]', json(?2))
            WHERE id = ?1
            "#,
        )
        .bind(item_id)
        .bind(&review_json)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", item_id));
        }

        Ok(())
    }

    /// Gets the "related items" strip for an item page.
    ///
    /// Placeholder relevance: the first 4 items in storage order (`id` is
    /// the rowid, so ascending `id` is insert order). Kept deliberately
    /// simple; a real related-to computation is out of scope.
    pub async fn get_related_items(&self) -> DbResult<Vec<Item>> {
        let rows: Vec<ItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY id ASC LIMIT 4"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ItemRow::into_item).collect()
    }

    /// Loads an item into the catalog.
    ///
    /// Catalog-load primitive used by the seed tool and tests; `id` must be
    /// unique and is never reassigned afterwards.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id already loaded
    pub async fn insert(&self, item: &Item) -> DbResult<()> {
        debug!(id = item.id, title = %item.title, "Loading catalog item");

        let reviews_json =
            serde_json::to_string(&item.reviews).map_err(|e| DbError::malformed("item", e))?;

        sqlx::query(
            r#"
            INSERT INTO items (id, title, slogan, description, category, price, img_url, reviews)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, json(?8))
            "#,
        )
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.slogan)
        .bind(&item.description)
        .bind(&item.category)
        .bind(item.price)
        .bind(&item.img_url)
        .bind(&reviews_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts total items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn item(id: i64, title: &str, category: &str, price: f64) -> Item {
        Item {
            id,
            title: title.to_string(),
            slogan: format!("slogan {id}"),
            description: format!("description {id}"),
            category: category.to_string(),
            price,
            img_url: format!("/img/products/{id}.jpg"),
            reviews: vec![],
        }
    }

    /// Six items: 4 Apparel, 2 Kitchen, ids 1..=6.
    async fn seed_catalog(db: &Database) {
        let repo = db.items();
        for it in [
            item(1, "Gray Hooded Sweatshirt", "Apparel", 29.99),
            item(2, "Green T-Shirt", "Apparel", 14.99),
            item(3, "Track Jacket", "Apparel", 39.99),
            item(4, "Baseball Cap", "Apparel", 11.99),
            item(5, "Travel Mug", "Kitchen", 12.99),
            item(6, "Coffee Press", "Kitchen", 24.99),
        ] {
            repo.insert(&it).await.unwrap();
        }
    }

    #[test]
    fn test_fts_match_query_quotes_tokens() {
        assert_eq!(fts_match_query("hood"), "\"hood\"*");
        assert_eq!(fts_match_query("t-shirt (red)"), "\"t-shirt\"* \"(red)\"*");
        assert_eq!(fts_match_query("say \"hi\""), "\"say\"* \"\"\"hi\"\"\"*");
    }

    #[tokio::test]
    async fn test_categories_all_first_with_totals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalog(&db).await;

        let categories = db.items().get_categories().await.unwrap();

        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0].name, ALL_CATEGORY);
        assert_eq!(categories[0].count, 6);
        assert_eq!(categories[1].name, "Apparel");
        assert_eq!(categories[1].count, 4);
        assert_eq!(categories[2].name, "Kitchen");
        assert_eq!(categories[2].count, 2);
    }

    #[tokio::test]
    async fn test_pagination_window_sorted_by_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalog(&db).await;

        let repo = db.items();

        let page0 = repo.get_items("Apparel", 0, 3).await.unwrap();
        assert_eq!(page0.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        let page1 = repo.get_items("Apparel", 1, 3).await.unwrap();
        assert_eq!(page1.iter().map(|i| i.id).collect::<Vec<_>>(), vec![4]);

        assert_eq!(repo.get_item_count("Apparel").await.unwrap(), 4);
        assert_eq!(repo.get_item_count(ALL_CATEGORY).await.unwrap(), 6);
        assert_eq!(repo.get_item_count("Nonexistent").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_search_is_all_browsing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalog(&db).await;

        let repo = db.items();

        let browsed = repo.get_items(ALL_CATEGORY, 0, 4).await.unwrap();
        let searched = repo.search_items("   ", 0, 4).await.unwrap();
        assert_eq!(
            browsed.iter().map(|i| i.id).collect::<Vec<_>>(),
            searched.iter().map(|i| i.id).collect::<Vec<_>>()
        );

        assert_eq!(repo.get_search_item_count("").await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_full_text_search() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalog(&db).await;

        let repo = db.items();

        let hits = repo.search_items("sweatshirt", 0, 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        // Prefix match: "swea" finds the sweatshirt too
        let hits = repo.search_items("swea", 0, 10).await.unwrap();
        assert_eq!(hits.len(), 1);

        assert_eq!(repo.get_search_item_count("sweatshirt").await.unwrap(), 1);
        assert_eq!(repo.get_search_item_count("zzzzz").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_tolerates_punctuation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalog(&db).await;

        let repo = db.items();

        // Shopper punctuation is matched as text, never parsed as FTS5
        // query syntax: these all succeed rather than erroring out
        let hits = repo.search_items("\"", 0, 10).await.unwrap();
        assert!(hits.is_empty());

        let hits = repo.search_items("t-shirt", 0, 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);

        assert_eq!(
            repo.get_search_item_count("t-shirt (green)").await.unwrap(),
            1
        );
        assert_eq!(repo.get_search_item_count("??").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_order_ties_broken_by_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.items();

        // Identical documents except for id, loaded out of id order, so
        // relevance ranks tie and only the id tiebreaker orders them
        for id in [9, 7, 8] {
            repo.insert(&Item {
                id,
                title: "Storm Umbrella".to_string(),
                slogan: "Sturdy in wind".to_string(),
                description: "Fiberglass ribs".to_string(),
                category: "Umbrellas".to_string(),
                price: 19.99,
                img_url: "/img/products/umbrella.jpg".to_string(),
                reviews: vec![],
            })
            .await
            .unwrap();
        }

        let first = repo.search_items("umbrella", 0, 10).await.unwrap();
        assert_eq!(
            first.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![7, 8, 9]
        );

        // Deterministic across calls
        let again = repo.search_items("umbrella", 0, 10).await.unwrap();
        assert_eq!(
            again.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![7, 8, 9]
        );
    }

    #[tokio::test]
    async fn test_get_item_and_absence() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalog(&db).await;

        let repo = db.items();

        let found = repo.get_item(5).await.unwrap().unwrap();
        assert_eq!(found.title, "Travel Mug");
        // Idempotent read
        let again = repo.get_item(5).await.unwrap().unwrap();
        assert_eq!(again.id, found.id);

        assert!(repo.get_item(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_review_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalog(&db).await;

        let repo = db.items();
        let before = Utc::now();

        repo.add_review(1, "Warm and comfy", "Shannon", 5)
            .await
            .unwrap();
        repo.add_review(1, "Shrank in the wash", "Pat", 2)
            .await
            .unwrap();

        let item = repo.get_item(1).await.unwrap().unwrap();
        assert_eq!(item.reviews.len(), 2);

        let last = item.reviews.last().unwrap();
        assert_eq!(last.comment, "Shrank in the wash");
        assert_eq!(last.name, "Pat");
        assert_eq!(last.stars, 2);
        assert!(last.date >= before);
    }

    #[tokio::test]
    async fn test_add_review_missing_item() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalog(&db).await;

        let err = db.items().add_review(999, "c", "n", 3).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_related_items_first_four() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalog(&db).await;

        let related = db.items().get_related_items().await.unwrap();
        assert_eq!(
            related.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalog(&db).await;

        let err = db
            .items()
            .insert(&item(1, "Impostor", "Apparel", 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
