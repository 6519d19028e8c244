//! # mart-db: Data Access Layer for the Mart Storefront
//!
//! This crate provides catalog and cart data access for the Mart
//! storefront demo. It uses SQLite with sqlx for async operations; the
//! document-flavored parts of the model (item reviews, the cart's entry
//! list) live in JSON columns so each mutation stays a single atomic
//! statement.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Mart Data Flow                              │
//! │                                                                     │
//! │  Request handler ("add item 42 to u1's cart")                       │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                    mart-db (THIS CRATE)                     │   │
//! │  │                                                             │   │
//! │  │   ┌────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │  Database  │   │  Repositories  │   │  Migrations  │   │   │
//! │  │   │ (pool.rs)  │◄──│ ItemRepository │   │  (embedded)  │   │   │
//! │  │   │ SqlitePool │   │ CartRepository │   │ 001_init.sql │   │   │
//! │  │   └────────────┘   └────────────────┘   │ 002_fts.sql  │   │   │
//! │  │                                         └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │                       SQLite database file                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and the `Database` handle
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Error types and taxonomy
//! - [`repository`] - Catalog and cart repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mart_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/mart.db")).await?;
//!
//! let categories = db.items().get_categories().await?;
//! let cart = db.carts().get_cart("u1").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cart::CartRepository;
pub use repository::catalog::ItemRepository;
