//! Subcommand implementations.

pub mod assistant;
pub mod cart;
pub mod catalog;

use ecocycle_storefront::error::CartError;
use ecocycle_storefront::notice::Notice;
use ecocycle_storefront::state::StateError;
use thiserror::Error;

/// Errors that end a command with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A user-facing failure (stock limit, blocked checkout, ...).
    #[error("{0}")]
    Notice(Notice),

    /// The context could not be set up.
    #[error("Startup error: {0}")]
    State(#[from] StateError),
}

impl From<CartError> for CommandError {
    fn from(err: CartError) -> Self {
        Self::Notice(err.notice())
    }
}
