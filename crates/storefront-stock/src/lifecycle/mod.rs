//! # System Wiring
//!
//! [`StockSystem`] assembles the in-memory stores, the stock ledger and the
//! cart service into one ready-to-use bundle for the demo binary and
//! integration tests. Counter rows are created here through the seeding
//! helpers; the ledger itself never creates or deletes counters.

use crate::cart::{CartService, MemoryCartStore};
use crate::model::{ProductId, VariantId};
use crate::stock::StockLedger;
use cas_ledger::{CounterRecord, MemoryStore};
use std::sync::Arc;

pub type ProductStore = MemoryStore<ProductId>;
pub type VariantStore = MemoryStore<VariantId>;

/// A fully wired stock subsystem backed by in-memory stores.
pub struct StockSystem {
    /// Inventory operations over both counter namespaces.
    pub stock: StockLedger<ProductStore, VariantStore>,

    /// Cart mutation with saga-style compensation.
    pub cart: CartService<ProductStore, VariantStore, MemoryCartStore>,

    /// Direct store handles, for seeding and assertions.
    pub products: Arc<ProductStore>,
    pub variants: Arc<VariantStore>,
    pub cart_lines: Arc<MemoryCartStore>,
}

impl StockSystem {
    pub fn new() -> Self {
        let products = Arc::new(MemoryStore::new());
        let variants = Arc::new(MemoryStore::new());
        let cart_lines = Arc::new(MemoryCartStore::new());

        let stock = StockLedger::new(products.clone(), variants.clone());
        let cart = CartService::new(stock.clone(), cart_lines.clone());

        Self {
            stock,
            cart,
            products,
            variants,
            cart_lines,
        }
    }

    /// Seeds a simple product counter.
    pub fn seed_product(&self, id: impl Into<ProductId>, quantity: u64) {
        self.products
            .insert(id.into(), CounterRecord::plain(quantity));
    }

    /// Seeds a variant counter, with its availability flag derived from the
    /// initial quantity.
    pub fn seed_variant(&self, id: impl Into<VariantId>, quantity: u64) {
        self.variants
            .insert(id.into(), CounterRecord::with_flag(quantity));
    }
}

impl Default for StockSystem {
    fn default() -> Self {
        Self::new()
    }
}
