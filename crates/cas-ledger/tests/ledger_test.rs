use async_trait::async_trait;
use cas_ledger::mock::StoreSpy;
use cas_ledger::{
    CasLedger, CounterRecord, CounterStore, LedgerError, MemoryStore, NoBackoff, StoreError,
    MAX_ATTEMPTS,
};
use std::sync::Arc;

/// Store wrapper that yields to the scheduler between the ledger's read and
/// its conditional write. On a current-thread runtime the in-memory store
/// completes every call synchronously, so without the yield concurrent tasks
/// would never interleave inside the read-modify-write window and conditional
/// writes would never miss.
struct YieldingStore<S>(S);

#[async_trait]
impl<S: CounterStore> CounterStore for YieldingStore<S> {
    type Key = S::Key;

    async fn read(&self, key: &S::Key) -> Result<Option<CounterRecord>, StoreError> {
        let row = self.0.read(key).await;
        tokio::task::yield_now().await;
        row
    }

    async fn update_if(
        &self,
        key: &S::Key,
        expected: u64,
        record: CounterRecord,
    ) -> Result<bool, StoreError> {
        self.0.update_if(key, expected, record).await
    }
}

/// N concurrent single-unit reserves against a counter holding exactly N:
/// every task must eventually win its conditional write and the counter must
/// land on zero, with no reservation lost and none double-counted.
#[tokio::test]
async fn concurrent_reserves_converge_to_zero() {
    let store = Arc::new(YieldingStore(MemoryStore::new()));
    store.0.insert("sku-1", CounterRecord::plain(8));

    // Interleaved writers conflict far more often than production contention
    // would; widen the bound so the test asserts convergence, not the bound.
    let ledger = CasLedger::with_backoff(store.clone(), NoBackoff).max_attempts(64);

    let mut handles = vec![];
    for _ in 0..8 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(
            async move { ledger.reserve(&"sku-1", 1).await },
        ));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 8, "every reserve should eventually win its race");
    assert_eq!(store.0.get(&"sku-1"), Some(CounterRecord::plain(0)));
}

#[tokio::test]
async fn reserve_then_release_restores_quantity() {
    let store = Arc::new(MemoryStore::new());
    store.insert("sku-1", CounterRecord::plain(5));
    let ledger = CasLedger::with_backoff(store.clone(), NoBackoff);

    let reserved = ledger.reserve(&"sku-1", 4).await.unwrap();
    assert_eq!(reserved.quantity, 1);

    let released = ledger.release(&"sku-1", 4).await.unwrap();
    assert_eq!(released.quantity, 5);
    assert_eq!(store.get(&"sku-1"), Some(CounterRecord::plain(5)));
}

#[tokio::test]
async fn insufficient_quantity_issues_no_write() {
    let spy = Arc::new(StoreSpy::new(MemoryStore::new()));
    spy.inner().insert("sku-1", CounterRecord::plain(2));
    let ledger = CasLedger::with_backoff(spy.clone(), NoBackoff);

    let err = ledger.reserve(&"sku-1", 3).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Insufficient {
            requested: 3,
            available: 2
        }
    ));

    // Business rejection, not a conflict: one read, zero writes, no retries
    assert_eq!(spy.reads(), 1);
    assert_eq!(spy.writes(), 0);
    assert_eq!(spy.inner().get(&"sku-1"), Some(CounterRecord::plain(2)));
}

#[tokio::test]
async fn missing_counter_fails_without_retry() {
    let spy = Arc::new(StoreSpy::new(MemoryStore::<&str>::new()));
    let ledger = CasLedger::with_backoff(spy.clone(), NoBackoff);

    let err = ledger.reserve(&"ghost", 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(ref key) if key == "ghost"));
    assert_eq!(spy.reads(), 1);
    assert_eq!(spy.writes(), 0);

    let err = ledger.release(&"ghost", 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn exhausts_after_exactly_max_attempts() {
    let spy = Arc::new(StoreSpy::new(MemoryStore::new()));
    spy.inner().insert("sku-1", CounterRecord::plain(10));
    spy.force_conflicts(u32::MAX);
    let ledger = CasLedger::with_backoff(spy.clone(), NoBackoff);

    let err = ledger.reserve(&"sku-1", 1).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::ConflictExhausted {
            attempts: MAX_ATTEMPTS,
            last_observed: 10
        }
    ));
    assert_eq!(spy.writes(), MAX_ATTEMPTS);
    assert_eq!(spy.reads(), MAX_ATTEMPTS);
    assert_eq!(spy.inner().get(&"sku-1"), Some(CounterRecord::plain(10)));
}

#[tokio::test]
async fn recovers_after_transient_conflicts() {
    let spy = Arc::new(StoreSpy::new(MemoryStore::new()));
    spy.inner().insert("sku-1", CounterRecord::plain(10));
    spy.force_conflicts(2);
    let ledger = CasLedger::with_backoff(spy.clone(), NoBackoff);

    let record = ledger.reserve(&"sku-1", 3).await.unwrap();
    assert_eq!(record.quantity, 7);
    // Two misses, then the winning write
    assert_eq!(spy.writes(), 3);
}

#[tokio::test]
async fn read_fault_surfaces_immediately() {
    let spy = Arc::new(StoreSpy::new(MemoryStore::new()));
    spy.inner().insert("sku-1", CounterRecord::plain(5));
    spy.fail_reads();
    let ledger = CasLedger::with_backoff(spy.clone(), NoBackoff);

    let err = ledger.reserve(&"sku-1", 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::Store(_)));
    assert_eq!(spy.reads(), 1, "store faults are not retried");
    assert_eq!(spy.writes(), 0);
}

#[tokio::test]
async fn write_fault_surfaces_immediately() {
    let spy = Arc::new(StoreSpy::new(MemoryStore::new()));
    spy.inner().insert("sku-1", CounterRecord::plain(5));
    spy.fail_writes();
    let ledger = CasLedger::with_backoff(spy.clone(), NoBackoff);

    let err = ledger.reserve(&"sku-1", 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::Store(_)));
    assert_eq!(spy.reads(), 1);
    assert_eq!(spy.writes(), 1, "store faults are not retried");
    assert_eq!(spy.inner().get(&"sku-1"), Some(CounterRecord::plain(5)));
}

/// Store whose row vanishes right after the first read, as when catalog
/// policy deletes a sold-out variant while a reserve is in flight.
struct VanishingStore {
    inner: MemoryStore<&'static str>,
    reads: std::sync::atomic::AtomicU32,
}

#[async_trait]
impl CounterStore for VanishingStore {
    type Key = &'static str;

    async fn read(&self, key: &&'static str) -> Result<Option<CounterRecord>, StoreError> {
        let row = self.inner.read(key).await?;
        if self
            .reads
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            == 0
        {
            self.inner.remove(key);
        }
        Ok(row)
    }

    async fn update_if(
        &self,
        key: &&'static str,
        expected: u64,
        record: CounterRecord,
    ) -> Result<bool, StoreError> {
        self.inner.update_if(key, expected, record).await
    }
}

/// A row deleted between the read and the conditional write makes the write
/// miss; the next attempt's read then reports the counter as gone, which is
/// the terminal answer rather than a retryable conflict.
#[tokio::test]
async fn counter_deleted_mid_flight_resolves_to_not_found() {
    let store = Arc::new(VanishingStore {
        inner: MemoryStore::new(),
        reads: std::sync::atomic::AtomicU32::new(0),
    });
    store.inner.insert("sku-1", CounterRecord::plain(5));
    let ledger = CasLedger::with_backoff(store.clone(), NoBackoff);

    let err = ledger.reserve(&"sku-1", 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn release_has_no_upper_bound() {
    let store = Arc::new(MemoryStore::new());
    store.insert("sku-1", CounterRecord::plain(1));
    let ledger = CasLedger::with_backoff(store.clone(), NoBackoff);

    let record = ledger.release(&"sku-1", 5).await.unwrap();
    assert_eq!(record.quantity, 6);
    let record = ledger.release(&"sku-1", 100).await.unwrap();
    assert_eq!(record.quantity, 106);
}

#[tokio::test]
async fn derived_flag_tracks_quantity() {
    let store = Arc::new(MemoryStore::new());
    store.insert("sku-1:250g", CounterRecord::with_flag(2));
    let ledger = CasLedger::with_backoff(store.clone(), NoBackoff).derive_flag(|q| q > 0);

    let record = ledger.reserve(&"sku-1:250g", 2).await.unwrap();
    assert_eq!(record.quantity, 0);
    assert_eq!(record.available, Some(false));

    let record = ledger.release(&"sku-1:250g", 1).await.unwrap();
    assert_eq!(record.quantity, 1);
    assert_eq!(record.available, Some(true));

    // The stored row carries the same flag the caller saw
    assert_eq!(store.get(&"sku-1:250g"), Some(CounterRecord::with_flag(1)));
}
