//! Ecocycle Core - Shared types library.
//!
//! This crate provides common types used across all Ecocycle components:
//! - `storefront` - Cart store, synchronizer, and checkout engine
//! - `cli` - Command-line view over the rewards storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and points, plus the cart,
//!   product, and delivery models

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
