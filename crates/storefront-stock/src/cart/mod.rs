//! # Cart Mutation & Compensation
//!
//! Adding an item to a cart touches two resources that cannot share a
//! transaction: the stock counter and the cart-line row. The service treats
//! the counter adjustment as committed first, then persists the line; if the
//! line write fails, it puts the units back with the matching `release` for
//! the same key and quantity before surfacing the failure. Without that
//! compensation the reserved stock would be stranded permanently.
//!
//! Removing a line runs the pair in the opposite order: delete the line,
//! then release its units.

pub mod error;

pub use error::CartError;

use crate::model::{CartLine, CartLineId, ItemRef, ProductId, VariantId};
use crate::stock::{StockLedger, StockLevel};
use async_trait::async_trait;
use cas_ledger::{BackoffPolicy, CounterStore, ExponentialBackoff, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Persistence contract for cart lines.
///
/// The storefront's real backend is a managed row store; tests and the demo
/// use [`MemoryCartStore`].
#[async_trait]
pub trait CartLineStore: Send + Sync {
    async fn insert(&self, line: &CartLine) -> Result<(), StoreError>;
    async fn remove(&self, id: &CartLineId) -> Result<Option<CartLine>, StoreError>;
}

/// Cart operations that keep stock counters and cart lines consistent.
pub struct CartService<P, V, L, B = ExponentialBackoff>
where
    P: CounterStore<Key = ProductId>,
    V: CounterStore<Key = VariantId>,
    L: CartLineStore,
    B: BackoffPolicy + Clone,
{
    stock: StockLedger<P, V, B>,
    lines: Arc<L>,
    next_line_id: AtomicU64,
}

impl<P, V, L, B> CartService<P, V, L, B>
where
    P: CounterStore<Key = ProductId>,
    V: CounterStore<Key = VariantId>,
    L: CartLineStore,
    B: BackoffPolicy + Clone,
{
    pub fn new(stock: StockLedger<P, V, B>, lines: Arc<L>) -> Self {
        Self {
            stock,
            lines,
            next_line_id: AtomicU64::new(1),
        }
    }

    /// Reserves product stock and persists a cart line for it.
    #[instrument(skip(self))]
    pub async fn add_product_line(
        &self,
        product: ProductId,
        qty: u64,
    ) -> Result<CartLine, CartError> {
        self.add_line(ItemRef::Product(product), qty).await
    }

    /// Reserves variant stock and persists a cart line for it.
    #[instrument(skip(self))]
    pub async fn add_variant_line(
        &self,
        variant: VariantId,
        qty: u64,
    ) -> Result<CartLine, CartError> {
        self.add_line(ItemRef::Variant(variant), qty).await
    }

    /// Deletes a cart line and returns its units to stock.
    #[instrument(skip(self))]
    pub async fn remove_line(&self, id: &CartLineId) -> Result<StockLevel, CartError> {
        let Some(line) = self.lines.remove(id).await? else {
            return Err(CartError::LineNotFound(id.to_string()));
        };

        match self.release_item(&line.item, line.qty).await {
            Ok(level) => {
                info!(line = %line.id, item = %line.item, qty = line.qty, "cart line removed");
                Ok(level)
            }
            Err(err) => {
                warn!(
                    line = %line.id,
                    item = %line.item,
                    qty = line.qty,
                    error = %err,
                    "cart line removed but stock release failed"
                );
                Err(err.into())
            }
        }
    }

    async fn add_line(&self, item: ItemRef, qty: u64) -> Result<CartLine, CartError> {
        let level = self.reserve_item(&item, qty).await?;
        debug!(item = %item, qty, remaining = level.remaining, "stock reserved for cart line");

        let line = CartLine {
            id: CartLineId(self.next_line_id.fetch_add(1, Ordering::SeqCst)),
            item: item.clone(),
            qty,
        };

        if let Err(err) = self.lines.insert(&line).await {
            // The reservation is already committed; put the units back before
            // surfacing the line-store failure.
            if let Err(release_err) = self.release_item(&item, qty).await {
                warn!(
                    item = %item,
                    qty,
                    error = %release_err,
                    "compensating release failed, reserved stock stranded"
                );
            }
            return Err(CartError::LineStore(err));
        }

        info!(line = %line.id, item = %line.item, qty, "cart line added");
        Ok(line)
    }

    async fn reserve_item(
        &self,
        item: &ItemRef,
        qty: u64,
    ) -> Result<StockLevel, crate::stock::StockError> {
        match item {
            ItemRef::Product(id) => self.stock.reserve_product(id, qty).await,
            ItemRef::Variant(id) => self.stock.reserve_variant(id, qty).await,
        }
    }

    async fn release_item(
        &self,
        item: &ItemRef,
        qty: u64,
    ) -> Result<StockLevel, crate::stock::StockError> {
        match item {
            ItemRef::Product(id) => self.stock.release_product(id, qty).await,
            ItemRef::Variant(id) => self.stock.release_variant(id, qty).await,
        }
    }
}

/// HashMap-backed [`CartLineStore`] for tests and the demo binary.
pub struct MemoryCartStore {
    lines: Mutex<HashMap<CartLineId, CartLine>>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(HashMap::new()),
        }
    }

    /// Reads a line without going through the async contract.
    pub fn get(&self, id: &CartLineId) -> Option<CartLine> {
        self.lines
            .lock()
            .expect("cart store lock poisoned")
            .get(id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().expect("cart store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCartStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CartLineStore for MemoryCartStore {
    async fn insert(&self, line: &CartLine) -> Result<(), StoreError> {
        let mut lines = self
            .lines
            .lock()
            .map_err(|_| StoreError::Unavailable("cart store lock poisoned".to_string()))?;
        lines.insert(line.id, line.clone());
        Ok(())
    }

    async fn remove(&self, id: &CartLineId) -> Result<Option<CartLine>, StoreError> {
        let mut lines = self
            .lines
            .lock()
            .map_err(|_| StoreError::Unavailable("cart store lock poisoned".to_string()))?;
        Ok(lines.remove(id))
    }
}
