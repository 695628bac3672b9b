//! # Ledger Errors
//!
//! The failure taxonomy for counter adjustments. Expected business outcomes
//! (insufficient quantity, exhausted retries) are ordinary variants here, not
//! panics; only [`LedgerError::Store`] wraps a genuine fault from the record
//! store. Quantity-bearing variants carry the last observed value so callers
//! can show availability to the end user.

use crate::store::StoreError;

/// Errors returned by [`CasLedger`](crate::ledger::CasLedger) operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// No counter row exists for the key. Never retried: a missing row is
    /// not a transient condition.
    #[error("counter not found: {0}")]
    NotFound(String),

    /// The freshly observed quantity was below the requested amount. A
    /// business result, not a concurrency conflict; never retried.
    #[error("insufficient quantity: requested {requested}, available {available}")]
    Insufficient { requested: u64, available: u64 },

    /// Every conditional write lost its race against another writer.
    #[error("conditional write lost the race on all {attempts} attempts")]
    ConflictExhausted { attempts: u32, last_observed: u64 },

    /// The record store itself failed. Never retried, and distinct from
    /// [`LedgerError::ConflictExhausted`] so callers can tell "try again
    /// later" apart from "this will never succeed".
    #[error("store fault: {0}")]
    Store(#[from] StoreError),
}
