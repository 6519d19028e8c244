//! # Repository Module
//!
//! Repository implementations for the two logical collections.
//!
//! - [`catalog`] - Item catalog: browsing, search, reviews
//! - [`cart`] - Per-user cart documents: atomic add/update/remove
//!
//! The two repositories never call each other; composition ("look up the
//! item, then add it to the cart") belongs to the caller.

pub mod cart;
pub mod catalog;
