//! Core types for Ecocycle.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod points;
pub mod product;
pub mod status;

pub use cart::{Cart, CartItem};
pub use id::*;
pub use points::Points;
pub use product::Product;
pub use status::*;
