//! # Storefront Stock Demo
//!
//! Exercises the stock subsystem end to end:
//! 1. Seed a simple product, walk it through a reserve / reject / release
//!    cycle.
//! 2. Add and remove a cart line, showing the reserve-then-persist flow.
//! 3. Drain a variant counter with concurrent single-unit reservations.
//!
//! Run with `RUST_LOG=debug` to watch the per-attempt CAS traffic.

use cas_ledger::tracing::setup_tracing;
use storefront_stock::lifecycle::StockSystem;
use storefront_stock::model::{ProductId, VariantId};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting storefront stock demo");

    let system = StockSystem::new();

    // A simple product with five units on hand
    let beans = ProductId::from("sku-1001");
    system.seed_product(beans.clone(), 5);

    let level = system
        .stock
        .reserve_product(&beans, 3)
        .await
        .map_err(|e| e.to_string())?;
    info!(product = %beans, remaining = level.remaining, "reserved 3 units");

    match system.stock.reserve_product(&beans, 3).await {
        Ok(level) => warn!(remaining = level.remaining, "second reservation unexpectedly succeeded"),
        Err(e) => info!(error = %e, "second reservation rejected as expected"),
    }

    let level = system
        .stock
        .release_product(&beans, 3)
        .await
        .map_err(|e| e.to_string())?;
    info!(product = %beans, remaining = level.remaining, "released 3 units");

    // Cart flow: reserve, persist the line, then undo both
    let line = system
        .cart
        .add_product_line(beans.clone(), 2)
        .await
        .map_err(|e| e.to_string())?;
    info!(line = %line.id, "cart line added");

    let level = system
        .cart
        .remove_line(&line.id)
        .await
        .map_err(|e| e.to_string())?;
    info!(remaining = level.remaining, "cart line removed, stock restored");

    // Concurrent single-unit reservations draining a variant counter
    let grind = VariantId::from("sku-2002:250g");
    system.seed_variant(grind.clone(), 20);

    let mut handles = vec![];
    for _ in 0..20 {
        let stock = system.stock.clone();
        let id = grind.clone();
        handles.push(tokio::spawn(
            async move { stock.reserve_variant(&id, 1).await },
        ));
    }

    let mut reserved = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.map_err(|e| e.to_string())? {
            Ok(_) => reserved += 1,
            Err(e) => {
                warn!(error = %e, "variant reservation failed");
                rejected += 1;
            }
        }
    }

    let row = system.variants.get(&grind);
    info!(reserved, rejected, ?row, "concurrent drain complete");

    info!("Demo completed");
    Ok(())
}
