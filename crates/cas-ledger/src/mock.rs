//! # Instrumented Store Doubles
//!
//! [`StoreSpy`] wraps any [`CounterStore`] with operation counters and
//! scripted failure modes, so tests can assert on the ledger's retry
//! discipline instead of just its final answer:
//!
//! - **Write counting** proves that a rejected reserve issued zero
//!   conditional writes, and that an exhausted call issued exactly the
//!   bounded number.
//! - **Forced predicate misses** simulate a racing writer winning every
//!   conditional write, which is hard to arrange with real concurrency.
//! - **Injected faults** simulate the store itself failing (connectivity,
//!   malformed query), which must surface immediately rather than retry.
//!
//! ```ignore
//! let spy = Arc::new(StoreSpy::new(store));
//! let ledger = CasLedger::with_backoff(spy.clone(), NoBackoff);
//!
//! spy.force_conflicts(u32::MAX);
//! let err = ledger.reserve(&key, 1).await.unwrap_err();
//! assert!(matches!(err, LedgerError::ConflictExhausted { .. }));
//! assert_eq!(spy.writes(), MAX_ATTEMPTS);
//! ```

use crate::store::{CounterRecord, CounterStore, StoreError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// A pass-through [`CounterStore`] wrapper with counters and fault injection.
pub struct StoreSpy<S> {
    inner: S,
    reads: AtomicU32,
    writes: AtomicU32,
    forced_misses: AtomicU32,
    read_fault: AtomicBool,
    write_fault: AtomicBool,
}

impl<S> StoreSpy<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            reads: AtomicU32::new(0),
            writes: AtomicU32::new(0),
            forced_misses: AtomicU32::new(0),
            read_fault: AtomicBool::new(false),
            write_fault: AtomicBool::new(false),
        }
    }

    /// Number of `read` calls observed so far.
    pub fn reads(&self) -> u32 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `update_if` calls observed so far.
    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes the next `n` conditional writes miss their predicate without
    /// touching the wrapped store, as if a concurrent writer won each race.
    pub fn force_conflicts(&self, n: u32) {
        self.forced_misses.store(n, Ordering::SeqCst);
    }

    /// Makes every subsequent `read` fail with a store fault.
    pub fn fail_reads(&self) {
        self.read_fault.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent `update_if` fail with a store fault.
    pub fn fail_writes(&self) {
        self.write_fault.store(true, Ordering::SeqCst);
    }

    /// Access to the wrapped store, e.g. for seeding.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: CounterStore> CounterStore for StoreSpy<S> {
    type Key = S::Key;

    async fn read(&self, key: &S::Key) -> Result<Option<CounterRecord>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.read_fault.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read fault".to_string()));
        }
        self.inner.read(key).await
    }

    async fn update_if(
        &self,
        key: &S::Key,
        expected: u64,
        record: CounterRecord,
    ) -> Result<bool, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.write_fault.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write fault".to_string()));
        }

        // Consume one scripted miss if any remain
        let mut remaining = self.forced_misses.load(Ordering::SeqCst);
        while remaining > 0 {
            match self.forced_misses.compare_exchange(
                remaining,
                remaining - 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Ok(false),
                Err(actual) => remaining = actual,
            }
        }

        self.inner.update_if(key, expected, record).await
    }
}
