/// Identifier type for weight-variant stock counters.
///
/// Variants live in their own key namespace: a product sold by weight has one
/// counter per variant (e.g. `sku-42:250g`), each carrying its own derived
/// availability flag.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for product weight-variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantId(pub String);

impl From<&str> for VariantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
