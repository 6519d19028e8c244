//! # Data Layer Error Types
//!
//! Error types for store operations.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Failure Categories                             │
//! │                                                                     │
//! │  Storage failure   → DbError (fatal to the operation, surfaced,     │
//! │                      never retried here)                            │
//! │  Expected absence  → Option::None (missing item/cart/entry is a     │
//! │                      value, not an error)                           │
//! │  Malformed result  → DbError::MalformedDocument (a stored JSON      │
//! │                      blob fails to parse; fail-closed, never        │
//! │                      defaulted to empty)                            │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The request layer above decides user-facing behavior (404 vs 500); this
//! layer only categorizes.

use thiserror::Error;

/// Store operation errors.
///
/// These errors wrap sqlx and serde_json errors and provide additional
/// context and categorization.
#[derive(Debug, Error)]
pub enum DbError {
    /// A row that the operation requires does not exist.
    ///
    /// Used where absence is a *failure* of the operation (appending a
    /// review to a missing item), not where absence is an expected value
    /// (lookups return `Option` instead).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (loading a duplicate item id).
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored document column did not deserialize to its expected shape.
    ///
    /// Treated as a storage failure: the caller never sees a silently
    /// defaulted document.
    #[error("Malformed {entity} document: {source}")]
    MalformedDocument {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a MalformedDocument error for a named document kind.
    pub fn malformed(entity: &'static str, source: serde_json::Error) -> Self {
        DbError::MalformedDocument { entity, source }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports constraint violations only through the
                // message text: "UNIQUE constraint failed: <table>.<column>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type DbResult<T> = Result<T, DbError>;
