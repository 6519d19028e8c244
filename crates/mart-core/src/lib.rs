//! # mart-core: Pure Domain Model for the Mart Storefront
//!
//! This crate holds the storefront's domain types and the little pure logic
//! they carry (cart math, snapshot construction). Zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Mart Architecture                             │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │              Request Layer (routes, templates)              │   │
//! │  │                   - NOT in this workspace -                 │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                ★ mart-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │   ┌────────────┐           ┌────────────┐                   │   │
//! │  │   │   types    │           │    cart    │                   │   │
//! │  │   │ Item       │           │ Cart       │                   │   │
//! │  │   │ Review     │           │ CartItem   │                   │   │
//! │  │   └────────────┘           └────────────┘                   │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                 mart-db (Data Access Layer)                 │   │
//! │  │          SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog types (Item, Review, CategoryCount)
//! - [`cart`] - Cart types and cart math
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic, no side effects
//! 2. **Documents as Types**: these structs serialize to exactly the shapes
//!    the data layer stores in its JSON document columns
//! 3. **No Validation Here**: stars ranges and the like are request-layer
//!    concerns; this layer stores what it is given

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart::{Cart, CartItem};
pub use types::{CategoryCount, Item, Review, ALL_CATEGORY};
