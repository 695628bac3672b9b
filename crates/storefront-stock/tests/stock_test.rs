use cas_ledger::CounterRecord;
use storefront_stock::lifecycle::StockSystem;
use storefront_stock::model::{ProductId, VariantId};
use storefront_stock::stock::StockError;

/// The canonical cart cycle: five on hand, reserve three, get rejected on the
/// second three, release the first three back.
#[tokio::test]
async fn reserve_reject_release_cycle() {
    let system = StockSystem::new();
    let id = ProductId::from("sku-1");
    system.seed_product(id.clone(), 5);

    let level = system.stock.reserve_product(&id, 3).await.unwrap();
    assert_eq!(level.remaining, 2);
    assert_eq!(level.in_stock, None);

    let err = system.stock.reserve_product(&id, 3).await.unwrap_err();
    assert!(matches!(
        err,
        StockError::OutOfStock {
            requested: 3,
            available: 2
        }
    ));

    let level = system.stock.release_product(&id, 3).await.unwrap();
    assert_eq!(level.remaining, 5);
    assert_eq!(system.products.get(&id), Some(CounterRecord::plain(5)));
}

#[tokio::test]
async fn variant_flag_follows_quantity() {
    let system = StockSystem::new();
    let id = VariantId::from("sku-2:500g");
    system.seed_variant(id.clone(), 2);

    let level = system.stock.reserve_variant(&id, 1).await.unwrap();
    assert_eq!(level.remaining, 1);
    assert_eq!(level.in_stock, Some(true));

    let level = system.stock.reserve_variant(&id, 1).await.unwrap();
    assert_eq!(level.remaining, 0);
    assert_eq!(level.in_stock, Some(false));

    let level = system.stock.release_variant(&id, 4).await.unwrap();
    assert_eq!(level.remaining, 4);
    assert_eq!(level.in_stock, Some(true));

    // The stored row carries the same derived flag
    assert_eq!(system.variants.get(&id), Some(CounterRecord::with_flag(4)));
}

#[tokio::test]
async fn unknown_items_are_rejected() {
    let system = StockSystem::new();

    let err = system
        .stock
        .reserve_product(&ProductId::from("missing"), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, StockError::UnknownItem(ref key) if key == "missing"));

    let err = system
        .stock
        .release_variant(&VariantId::from("missing:1kg"), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, StockError::UnknownItem(_)));
}

#[tokio::test]
async fn drains_to_zero_then_rejects() {
    let system = StockSystem::new();
    let id = ProductId::from("sku-3");
    system.seed_product(id.clone(), 4);

    for expected in (0..4).rev() {
        let level = system.stock.reserve_product(&id, 1).await.unwrap();
        assert_eq!(level.remaining, expected);
    }

    let err = system.stock.reserve_product(&id, 1).await.unwrap_err();
    assert!(matches!(
        err,
        StockError::OutOfStock {
            requested: 1,
            available: 0
        }
    ));
}

#[tokio::test]
async fn paired_reserve_release_conserves_quantity() {
    let system = StockSystem::new();
    let id = ProductId::from("sku-4");
    system.seed_product(id.clone(), 10);

    system.stock.reserve_product(&id, 6).await.unwrap();
    let level = system.stock.release_product(&id, 6).await.unwrap();

    assert_eq!(level.remaining, 10);
    assert_eq!(system.products.get(&id), Some(CounterRecord::plain(10)));
}
