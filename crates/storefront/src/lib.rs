//! Ecocycle Storefront library.
//!
//! The cart and checkout engine of the rewards storefront: users redeem
//! points earned by recycling e-waste for catalog items.
//!
//! # Components
//!
//! - [`store`] - Persistent cart store over a [`storage`] record
//! - [`sync`] - Same-context and cross-context change signals
//! - [`policy`] - Quantity bounds
//! - [`checkout`] - Totals and the points-balance gate
//! - [`product`] - Merging a product into the cart
//! - [`services::cart`] - The load/transform/save/publish entry point
//!
//! The catalog and the chat assistant are collaborators consumed by the
//! engine and the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod notice;
pub mod policy;
pub mod product;
pub mod services;
pub mod state;
pub mod storage;
pub mod store;
pub mod sync;
pub mod view;
