//! Services built on the store and synchronizer.

pub mod assistant;
pub mod cart;
