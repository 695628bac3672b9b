//! # Record Store Abstraction
//!
//! This module defines the contract between the ledger and whatever holds the
//! counter rows. The ledger never requires atomic increment support from the
//! store; it only needs two capabilities:
//!
//! - read a row by key
//! - replace a row *conditionally*, matching on the quantity that was
//!   previously observed ("update WHERE quantity = $observed")
//!
//! Any backend offering those two operations can sit behind the ledger: a
//! managed SQL row, a document store with versioned writes, or the in-memory
//! [`MemoryStore`](crate::memory::MemoryStore) used by tests and demos.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A single counter row as the store holds it.
///
/// `available` is the redundantly stored availability flag carried by
/// variant-level counters; plain counters leave it `None`. The flag is always
/// a pure function of `quantity`, so conditional writes match on `quantity`
/// alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterRecord {
    /// The authoritative available count. Never negative by construction.
    pub quantity: u64,
    /// Derived availability flag, stored for cheap filtering by callers.
    pub available: Option<bool>,
}

impl CounterRecord {
    /// A plain counter row with no derived flag.
    pub fn plain(quantity: u64) -> Self {
        Self {
            quantity,
            available: None,
        }
    }

    /// A variant counter row carrying its availability flag.
    pub fn with_flag(quantity: u64) -> Self {
        Self {
            quantity,
            available: Some(quantity > 0),
        }
    }
}

/// Errors raised by the record store itself.
///
/// These are *faults* (connectivity, malformed queries), not outcomes: a
/// conditional write whose predicate matched zero rows is reported through
/// the `Ok(false)` return of [`CounterStore::update_if`], never through this
/// type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The store contract consumed by [`CasLedger`](crate::ledger::CasLedger).
///
/// Each counter namespace (products, variants, ...) gets its own store value
/// with its own `Key` type, so a product key can never be handed to a variant
/// ledger by accident.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// The key identifying one counter row within this store's namespace.
    type Key: Clone + Eq + Hash + Display + Debug + Send + Sync;

    /// Reads the current row for `key`, or `None` when no such counter exists.
    async fn read(&self, key: &Self::Key) -> Result<Option<CounterRecord>, StoreError>;

    /// Replaces the row for `key` only if its quantity still equals `expected`.
    ///
    /// Returns `true` when exactly one row matched and was updated, `false`
    /// when the predicate matched nothing (the quantity moved under us, or
    /// the row vanished). Store faults are errors, never `false`.
    async fn update_if(
        &self,
        key: &Self::Key,
        expected: u64,
        record: CounterRecord,
    ) -> Result<bool, StoreError>;
}
