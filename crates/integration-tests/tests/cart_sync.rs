//! Several contexts sharing one storage converge on the last save.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use ecocycle_core::{DeliveryMethod, ProductId};
use ecocycle_integration_tests::{POLL, Tab, WAIT, product};
use ecocycle_storefront::config::StorefrontConfig;
use ecocycle_storefront::state::AppState;
use ecocycle_storefront::storage::{FileStorage, MemoryStorage};
use ecocycle_storefront::sync::CartSignal;
use ecocycle_storefront::view::CartView;

#[test]
fn test_same_context_views_see_local_saves() {
    let tab = Tab::open(MemoryStorage::new());
    let mut header = CartView::new(Arc::clone(&tab.store), tab.service.synchronizer());

    tab.service.add(&product(1, 200, None), 2).unwrap();

    assert!(header.apply_pending());
    assert_eq!(header.item_count(), 2);
}

#[tokio::test]
async fn test_other_context_receives_storage_signal() {
    let dir = tempfile::tempdir().unwrap();
    let tab_a = Tab::open(FileStorage::new(dir.path()));
    let tab_b = Tab::open(FileStorage::new(dir.path()));

    let _watcher = tab_b.watch();
    let mut view_b = CartView::new(Arc::clone(&tab_b.store), tab_b.service.synchronizer());

    tab_a.service.add(&product(1, 200, Some(5)), 3).unwrap();

    let signal = tokio::time::timeout(WAIT, view_b.changed()).await.unwrap();
    assert_eq!(signal, Some(CartSignal::Storage));
    assert_eq!(view_b.item_count(), 3);
}

#[tokio::test]
async fn test_writer_context_gets_no_storage_signal() {
    let dir = tempfile::tempdir().unwrap();
    let tab = Tab::open(FileStorage::new(dir.path()));
    let _watcher = tab.watch();
    let mut sub = tab.service.subscribe();

    tab.service.add(&product(1, 200, None), 1).unwrap();
    tokio::time::sleep(POLL * 5).await;

    assert_eq!(sub.try_recv(), Some(CartSignal::Updated));
    assert_eq!(sub.try_recv(), None);
}

#[tokio::test]
async fn test_last_write_wins_across_contexts() {
    let storage = MemoryStorage::new();
    let tab_a = Tab::open(storage.clone());
    let tab_b = Tab::open(storage);
    let _watcher = tab_a.watch();
    let mut view_a = CartView::new(Arc::clone(&tab_a.store), tab_a.service.synchronizer());

    tab_a.service.add(&product(1, 200, None), 1).unwrap();
    tab_b.service.add(&product(2, 350, None), 1).unwrap();
    tab_b.service.remove(ProductId::new(1)).unwrap();

    let deadline = tokio::time::Instant::now() + WAIT;
    while view_a.cart() != &tab_b.service.cart() {
        tokio::time::timeout_at(deadline, view_a.changed())
            .await
            .unwrap();
    }
    assert!(view_a.cart().get(ProductId::new(1)).is_none());
    assert_eq!(view_a.item_count(), 1);
}

#[tokio::test]
async fn test_app_states_on_one_data_dir_share_the_cart() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorefrontConfig {
        data_dir: dir.path().to_path_buf(),
        sync_poll_interval: POLL,
        ..StorefrontConfig::default()
    };
    let first = AppState::new(config.clone()).unwrap();
    let second = AppState::new(config).unwrap();

    let _watcher = second.watch_storage();
    let mut view = second.view();

    let notebook = first.catalog().get(ProductId::new(1)).unwrap().clone();
    first.cart().add(&notebook, 2).unwrap();

    tokio::time::timeout(WAIT, view.changed()).await.unwrap();
    assert_eq!(view.item_count(), 2);

    let totals = second.cart().totals(DeliveryMethod::Delivery);
    assert_eq!(totals.total.get(), 200 * 2 + 50);
}
