//! # Stock Ledger Facade
//!
//! The caller-facing surface for inventory adjustments. Cart mutation,
//! checkout, returns and admin inventory tools all go through these four
//! operations:
//!
//! - [`StockLedger::reserve_product`] / [`StockLedger::release_product`] —
//!   simple products, plain quantity counter.
//! - [`StockLedger::reserve_variant`] / [`StockLedger::release_variant`] —
//!   weight-variants, quantity plus a redundantly stored `in_stock` flag kept
//!   equal to `quantity > 0` on every write.
//!
//! Both flavors are instantiations of the same generic
//! [`CasLedger`](cas_ledger::CasLedger); only the key namespace and the
//! derived-flag function differ.

pub mod error;

pub use error::StockError;

use crate::model::{ProductId, VariantId};
use cas_ledger::{BackoffPolicy, CasLedger, CounterRecord, CounterStore, ExponentialBackoff};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Snapshot of a counter after a successful adjustment.
///
/// `in_stock` is populated for variant operations only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub remaining: u64,
    pub in_stock: Option<bool>,
}

impl From<CounterRecord> for StockLevel {
    fn from(record: CounterRecord) -> Self {
        Self {
            remaining: record.quantity,
            in_stock: record.available,
        }
    }
}

/// Inventory operations over the product and variant counter namespaces.
///
/// Cheap to clone; clones share the underlying stores.
pub struct StockLedger<P, V, B = ExponentialBackoff>
where
    P: CounterStore<Key = ProductId>,
    V: CounterStore<Key = VariantId>,
    B: BackoffPolicy,
{
    products: CasLedger<P, B>,
    variants: CasLedger<V, B>,
}

impl<P, V> StockLedger<P, V>
where
    P: CounterStore<Key = ProductId>,
    V: CounterStore<Key = VariantId>,
{
    /// Creates a ledger with the default exponential backoff.
    pub fn new(products: Arc<P>, variants: Arc<V>) -> Self {
        Self::with_backoff(products, variants, ExponentialBackoff::default())
    }
}

impl<P, V, B> StockLedger<P, V, B>
where
    P: CounterStore<Key = ProductId>,
    V: CounterStore<Key = VariantId>,
    B: BackoffPolicy + Clone,
{
    /// Creates a ledger with an explicit backoff policy (tests pass
    /// [`NoBackoff`](cas_ledger::NoBackoff)).
    pub fn with_backoff(products: Arc<P>, variants: Arc<V>, backoff: B) -> Self {
        Self {
            products: CasLedger::with_backoff(products, backoff.clone()),
            variants: CasLedger::with_backoff(variants, backoff).derive_flag(|q| q > 0),
        }
    }

    /// Reserves `qty` units of a simple product.
    #[instrument(skip(self))]
    pub async fn reserve_product(
        &self,
        id: &ProductId,
        qty: u64,
    ) -> Result<StockLevel, StockError> {
        debug!("reserving product stock");
        self.products
            .reserve(id, qty)
            .await
            .map(Into::into)
            .map_err(Into::into)
    }

    /// Returns `qty` units of a simple product to stock.
    #[instrument(skip(self))]
    pub async fn release_product(
        &self,
        id: &ProductId,
        qty: u64,
    ) -> Result<StockLevel, StockError> {
        debug!("releasing product stock");
        self.products
            .release(id, qty)
            .await
            .map(Into::into)
            .map_err(Into::into)
    }

    /// Reserves `qty` units of a weight-variant, refreshing its `in_stock`
    /// flag in the same write.
    #[instrument(skip(self))]
    pub async fn reserve_variant(
        &self,
        id: &VariantId,
        qty: u64,
    ) -> Result<StockLevel, StockError> {
        debug!("reserving variant stock");
        self.variants
            .reserve(id, qty)
            .await
            .map(Into::into)
            .map_err(Into::into)
    }

    /// Returns `qty` units of a weight-variant to stock, refreshing its
    /// `in_stock` flag in the same write.
    #[instrument(skip(self))]
    pub async fn release_variant(
        &self,
        id: &VariantId,
        qty: u64,
    ) -> Result<StockLevel, StockError> {
        debug!("releasing variant stock");
        self.variants
            .release(id, qty)
            .await
            .map(Into::into)
            .map_err(Into::into)
    }
}

impl<P, V, B> Clone for StockLedger<P, V, B>
where
    P: CounterStore<Key = ProductId>,
    V: CounterStore<Key = VariantId>,
    B: BackoffPolicy + Clone,
{
    fn clone(&self) -> Self {
        Self {
            products: self.products.clone(),
            variants: self.variants.clone(),
        }
    }
}
