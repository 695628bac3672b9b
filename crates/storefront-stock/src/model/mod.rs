//! Domain model types: id newtypes for the two counter namespaces, and the
//! cart line persisted by callers of the stock ledger.

mod cart;
mod product;
mod variant;

pub use cart::{CartLine, CartLineId, ItemRef};
pub use product::ProductId;
pub use variant::VariantId;
