//! Error type for cart operations.

use crate::stock::StockError;
use cas_ledger::StoreError;
use thiserror::Error;

/// Errors surfaced by [`CartService`](crate::cart::CartService) operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// A stock operation failed (out of stock, contention, unknown item).
    #[error("stock operation failed: {0}")]
    Stock(#[from] StockError),

    /// The cart-line store failed. When this happens during an add, the
    /// already-committed reservation has been compensated with a release.
    #[error("cart line store failed: {0}")]
    LineStore(#[from] StoreError),

    /// No cart line exists with the given id.
    #[error("cart line not found: {0}")]
    LineNotFound(String),
}
