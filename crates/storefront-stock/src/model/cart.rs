/// Cart line model.
///
/// A cart line records units already reserved against a stock counter; the
/// line and the counter adjustment are linked only by the compensation
/// discipline in [`CartService`](crate::cart::CartService), never by a
/// transaction.
use crate::model::{ProductId, VariantId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartLineId(pub u64);

impl Display for CartLineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line_{}", self.0)
    }
}

/// The inventory unit a cart line points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemRef {
    Product(ProductId),
    Variant(VariantId),
}

impl Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemRef::Product(id) => write!(f, "{}", id),
            ItemRef::Variant(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub item: ItemRef,
    pub qty: u64,
}
