//! # Optimistic Counter Ledger
//!
//! This module implements the retry discipline for mutating a single
//! non-negative counter under contention when the store offers no atomic
//! increment/decrement reachable from the application tier.
//!
//! **Concurrency model**: the counter row is never locked. Each attempt reads
//! the current quantity, computes the new value, and issues a conditional
//! write matching on the quantity it observed. A racing writer makes the
//! predicate miss; the loser re-reads and tries again, up to a bounded number
//! of attempts with backoff between them. The store-level predicate match is
//! what serializes conflicting writers.
//!
//! One generic implementation covers every counter flavor: the namespace is
//! the store's key type, and the derived availability flag carried by
//! variant counters is an optional pure function of the new quantity supplied
//! at construction.

use crate::backoff::{BackoffPolicy, ExponentialBackoff};
use crate::error::LedgerError;
use crate::store::{CounterRecord, CounterStore};
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Total conditional-write attempts before a contended call gives up.
pub const MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Copy)]
enum Adjust {
    Reserve,
    Release,
}

impl Adjust {
    fn name(self) -> &'static str {
        match self {
            Adjust::Reserve => "reserve",
            Adjust::Release => "release",
        }
    }
}

/// A compare-and-swap ledger over one counter namespace.
///
/// Cheap to clone; clones share the underlying store.
///
/// # Result contract
///
/// Both operations return the written [`CounterRecord`] on success. Expected
/// failures come back as [`LedgerError`] variants carrying the last observed
/// quantity; the ledger never panics on them. Exactly one successful
/// conditional write happens per successful call, and none on failure.
pub struct CasLedger<S: CounterStore, B: BackoffPolicy = ExponentialBackoff> {
    store: Arc<S>,
    backoff: B,
    max_attempts: u32,
    derive_flag: Option<fn(u64) -> bool>,
}

impl<S: CounterStore> CasLedger<S> {
    /// Creates a ledger with the default exponential backoff.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_backoff(store, ExponentialBackoff::default())
    }
}

impl<S: CounterStore, B: BackoffPolicy> CasLedger<S, B> {
    /// Creates a ledger with an explicit backoff policy.
    pub fn with_backoff(store: Arc<S>, backoff: B) -> Self {
        Self {
            store,
            backoff,
            max_attempts: MAX_ATTEMPTS,
            derive_flag: None,
        }
    }

    /// Recompute `flag(new_quantity)` and write it alongside the quantity in
    /// the same conditional write. Used by variant counters for their
    /// availability flag.
    pub fn derive_flag(mut self, flag: fn(u64) -> bool) -> Self {
        self.derive_flag = Some(flag);
        self
    }

    /// Overrides the retry bound.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Subtracts `qty` from the counter, failing without a write when the
    /// observed quantity is below `qty`.
    ///
    /// `qty > 0` is a caller precondition; zero is not special-cased.
    pub async fn reserve(&self, key: &S::Key, qty: u64) -> Result<CounterRecord, LedgerError> {
        self.adjust(key, Adjust::Reserve, qty).await
    }

    /// Adds `qty` to the counter. No upper-bound check is performed; repeated
    /// releases grow the counter without limit.
    pub async fn release(&self, key: &S::Key, qty: u64) -> Result<CounterRecord, LedgerError> {
        self.adjust(key, Adjust::Release, qty).await
    }

    async fn adjust(
        &self,
        key: &S::Key,
        op: Adjust,
        qty: u64,
    ) -> Result<CounterRecord, LedgerError> {
        let mut last_observed = 0;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                sleep(self.backoff.delay(attempt - 1)).await;
            }

            let Some(current) = self.store.read(key).await? else {
                return Err(LedgerError::NotFound(key.to_string()));
            };
            let observed = current.quantity;

            // The bound check runs against the freshly re-read value on every
            // attempt, so a counter that drops below the requested amount
            // mid-retry is rejected rather than driven negative.
            let quantity = match op {
                Adjust::Reserve => {
                    if observed < qty {
                        return Err(LedgerError::Insufficient {
                            requested: qty,
                            available: observed,
                        });
                    }
                    observed - qty
                }
                Adjust::Release => observed.saturating_add(qty),
            };

            let next = CounterRecord {
                quantity,
                available: self.derive_flag.map(|flag| flag(quantity)),
            };

            if self.store.update_if(key, observed, next).await? {
                debug!(
                    op = op.name(),
                    %key,
                    qty,
                    remaining = quantity,
                    attempt,
                    "counter adjusted"
                );
                return Ok(next);
            }

            debug!(
                op = op.name(),
                %key,
                observed,
                attempt,
                "conditional write missed, retrying"
            );
            last_observed = observed;
        }

        warn!(
            op = op.name(),
            %key,
            attempts = self.max_attempts,
            "conditional write exhausted retries"
        );
        Err(LedgerError::ConflictExhausted {
            attempts: self.max_attempts,
            last_observed,
        })
    }
}

impl<S: CounterStore, B: BackoffPolicy + Clone> Clone for CasLedger<S, B> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            backoff: self.backoff.clone(),
            max_attempts: self.max_attempts,
            derive_flag: self.derive_flag,
        }
    }
}
