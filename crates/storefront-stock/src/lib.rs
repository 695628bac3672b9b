//! # Storefront Stock
//!
//! Inventory reservation for an e-commerce storefront, built on the generic
//! optimistic counter ledger in `cas-ledger`.
//!
//! - **[model]**: id newtypes for the two counter namespaces and the cart
//!   line record.
//! - **[stock]**: the caller-facing [`StockLedger`](stock::StockLedger) —
//!   reserve/release for simple products and for weight-variants (the latter
//!   carrying a derived `in_stock` flag).
//! - **[cart]**: [`CartService`](cart::CartService), the reserve-then-persist
//!   flow with compensating release when the dependent write fails.
//! - **[lifecycle]**: [`StockSystem`](lifecycle::StockSystem) wiring for the
//!   demo binary and integration tests.

pub mod cart;
pub mod lifecycle;
pub mod model;
pub mod stock;
