/// Identifier types for product-level stock counters.
///
/// Keys are opaque strings handed out by the catalog backend; the ledger only
/// ever uses them for lookup and display.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for simple (non-variant) products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
