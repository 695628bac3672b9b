//! # cas-ledger
//!
//! Bounded optimistic-retry machinery for adjusting non-negative integer
//! counters held in an external record store, without ever driving a counter
//! negative and without losing an update to a racing writer.
//!
//! The target environment is an application tier that cannot reach atomic
//! increment/decrement primitives in its store (no stored procedures, no
//! `UPDATE ... SET x = x - 1`). The ledger needs only two store capabilities,
//! captured by the [`CounterStore`] trait:
//!
//! 1. read a counter row by key
//! 2. conditionally replace it, matching on the previously observed quantity
//!
//! ## Core Abstractions
//!
//! - [`CasLedger`] — the read/check/conditional-write retry loop, generic
//!   over the store (key namespace) and the backoff policy, with an optional
//!   derived availability flag recomputed on every write.
//! - [`CounterStore`] / [`CounterRecord`] — the store contract.
//! - [`BackoffPolicy`] — pluggable delay between attempts;
//!   [`ExponentialBackoff`] in production, [`NoBackoff`] in tests.
//! - [`LedgerError`] — the failure taxonomy. Expected outcomes (insufficient
//!   quantity, exhausted retries) are returned, never panicked.
//!
//! ## Concurrency Model
//!
//! Concurrency comes from independent requests interleaving their calls on
//! the same counter, not from in-process threads. Every store call and every
//! backoff sleep is an await point; nothing blocks. No lock is ever taken on
//! the counter: the store's conditional predicate serializes conflicting
//! writers, and losers retry against a fresh read.
//!
//! There is no cross-counter atomicity. A caller that must pair a counter
//! adjustment with a dependent write treats the adjustment as committed and
//! compensates with the opposite adjustment if the dependent write fails.
//!
//! ## Testing
//!
//! [`MemoryStore`] provides real conditional-update semantics in memory, and
//! [`mock::StoreSpy`] adds operation counting, scripted predicate misses, and
//! injected store faults. See the `mock` module docs.

pub mod backoff;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod mock;
pub mod store;
pub mod tracing;

// Re-export core types for convenience
pub use backoff::{BackoffPolicy, ExponentialBackoff, NoBackoff};
pub use error::LedgerError;
pub use ledger::{CasLedger, MAX_ATTEMPTS};
pub use memory::MemoryStore;
pub use store::{CounterRecord, CounterStore, StoreError};
