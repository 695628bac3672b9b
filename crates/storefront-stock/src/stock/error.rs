//! Error type for stock operations.

use cas_ledger::{LedgerError, StoreError};
use thiserror::Error;

/// Errors surfaced by [`StockLedger`](crate::stock::StockLedger) operations.
///
/// `OutOfStock` and `Contended` are expected outcomes a storefront maps to a
/// user-visible "not enough stock, please retry" message; `Contended` is also
/// worth logging as a contention signal. `Store` means the inventory backend
/// itself failed.
#[derive(Debug, Error)]
pub enum StockError {
    /// No stock counter exists for the item.
    #[error("unknown stock item: {0}")]
    UnknownItem(String),

    /// Not enough units available at the moment of the write.
    #[error("out of stock: requested {requested}, available {available}")]
    OutOfStock { requested: u64, available: u64 },

    /// Concurrent cart activity kept winning the counter; the caller should
    /// try again.
    #[error("stock counter contended, gave up after {attempts} attempts")]
    Contended { attempts: u32, last_seen: u64 },

    /// The inventory backend failed.
    #[error("stock store fault: {0}")]
    Store(#[source] StoreError),
}

impl From<LedgerError> for StockError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(key) => StockError::UnknownItem(key),
            LedgerError::Insufficient {
                requested,
                available,
            } => StockError::OutOfStock {
                requested,
                available,
            },
            LedgerError::ConflictExhausted {
                attempts,
                last_observed,
            } => StockError::Contended {
                attempts,
                last_seen: last_observed,
            },
            LedgerError::Store(source) => StockError::Store(source),
        }
    }
}
