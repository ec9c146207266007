//! Integration tests for the CartStore: lifecycle, mutation semantics,
//! persistence, and failure tolerance.

use std::sync::Arc;
use std::time::Duration;

use gocart::{CartConfig, CartError, CartStore, ItemId, MemoryKv, SqliteKv, DEFAULT_CART_KEY};
use gocart_kv::KvStore;
use gocart_testkit::{
    corrupt_memory_kv, sample_item, sample_product, seeded_memory_kv, FailingKv, RecordingKv,
    SlowReadKv,
};

fn id(s: &str) -> ItemId {
    ItemId::new(s).unwrap()
}

#[tokio::test]
async fn adding_to_an_empty_cart_creates_a_single_unit_entry() {
    let store = CartStore::new(MemoryKv::new());
    store.load().await.unwrap();

    store
        .add_to_cart(gocart::Product::new("A", "Shirt", "u", 10.0).unwrap())
        .await;

    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id.as_str(), "A");
    assert_eq!(items[0].quantity, 1);
}

#[tokio::test]
async fn adding_an_existing_id_merges_quantities() {
    let store = CartStore::new(MemoryKv::new());
    store.load().await.unwrap();

    store.add_to_cart(sample_product("A")).await;
    store.add_to_cart(sample_product("A")).await;

    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
}

#[tokio::test]
async fn decrementing_to_zero_removes_the_entry() {
    let store = CartStore::new(MemoryKv::new());
    store.load().await.unwrap();

    store.add_to_cart(sample_product("A")).await;
    store.add_to_cart(sample_product("A")).await;

    store.decrement(&id("A")).await;
    assert_eq!(store.items()[0].quantity, 1);

    store.decrement(&id("A")).await;
    assert!(store.items().is_empty());
}

#[tokio::test]
async fn loading_a_fresh_store_yields_an_empty_cart() {
    let store = CartStore::new(MemoryKv::new());
    store.load().await.unwrap();
    assert!(store.items().is_empty());
}

#[tokio::test]
async fn loading_restores_entries_in_original_order() {
    let kv = seeded_memory_kv(
        DEFAULT_CART_KEY,
        vec![sample_item("A", 3), sample_item("B", 1)],
    );
    let store = CartStore::new(kv);
    store.load().await.unwrap();

    let items = store.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id.as_str(), "A");
    assert_eq!(items[0].quantity, 3);
    assert_eq!(items[1].id.as_str(), "B");
    assert_eq!(items[1].quantity, 1);
}

#[tokio::test]
async fn noop_increment_and_decrement_do_not_change_state() {
    let store = CartStore::new(MemoryKv::new());
    store.load().await.unwrap();
    store.add_to_cart(sample_product("A")).await;

    let before = store.items();
    store.increment(&id("ghost")).await;
    store.decrement(&id("ghost")).await;
    assert_eq!(store.items(), before);
}

#[tokio::test]
async fn noop_mutations_still_persist_the_current_state() {
    let kv = Arc::new(MemoryKv::new());
    let store = CartStore::new(Arc::clone(&kv));
    store.load().await.unwrap();

    store.increment(&id("ghost")).await;
    store.flush().await.unwrap();

    let blob = kv.get(DEFAULT_CART_KEY).await.unwrap().unwrap();
    assert_eq!(&blob[..], b"[]");
}

#[tokio::test]
async fn mutations_issued_before_load_are_replayed_on_top_of_loaded_state() {
    let kv = seeded_memory_kv(DEFAULT_CART_KEY, vec![sample_item("A", 3)]);
    let store = CartStore::new(kv);

    // load() has not started yet: these buffer.
    store.add_to_cart(sample_product("A")).await;
    store.add_to_cart(sample_product("B")).await;
    assert!(store.items().is_empty());

    store.load().await.unwrap();

    let items = store.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id.as_str(), "A");
    assert_eq!(items[0].quantity, 4);
    assert_eq!(items[1].id.as_str(), "B");
    assert_eq!(items[1].quantity, 1);
}

#[tokio::test]
async fn mutations_racing_a_slow_load_are_not_lost() {
    let kv = SlowReadKv::new(
        seeded_memory_kv(DEFAULT_CART_KEY, vec![sample_item("A", 1)]),
        Duration::from_millis(100),
    );
    let store = CartStore::new(kv);

    let loader = {
        let store = store.clone();
        tokio::spawn(async move { store.load().await })
    };
    // Let load() take the mutation lock before racing it.
    tokio::time::sleep(Duration::from_millis(10)).await;

    store.add_to_cart(sample_product("B")).await;
    loader.await.unwrap().unwrap();

    let items = store.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id.as_str(), "A");
    assert_eq!(items[1].id.as_str(), "B");
}

#[tokio::test]
async fn corrupt_stored_state_degrades_to_an_empty_usable_cart() {
    let kv = Arc::new(corrupt_memory_kv(DEFAULT_CART_KEY));
    let store = CartStore::new(Arc::clone(&kv));

    let err = store.load().await.unwrap_err();
    assert!(matches!(err, CartError::CorruptState(_)));
    assert!(store.items().is_empty());

    // The store stays usable and the next mutation overwrites the
    // corrupt blob.
    store.add_to_cart(sample_product("A")).await;
    store.flush().await.unwrap();

    let blob = kv.get(DEFAULT_CART_KEY).await.unwrap().unwrap();
    let restored = gocart::CartState::from_bytes(&blob).unwrap();
    assert_eq!(restored.items()[0].id.as_str(), "A");
}

#[tokio::test]
async fn write_failures_leave_the_in_memory_cart_authoritative() {
    let store = CartStore::new(FailingKv::new());
    store.load().await.unwrap();

    store.add_to_cart(sample_product("A")).await;
    assert_eq!(store.items().len(), 1);

    let err = store.flush().await.unwrap_err();
    assert!(matches!(err, CartError::WriteFailed(_)));

    // The mutation is still logically successful.
    store.add_to_cart(sample_product("A")).await;
    assert_eq!(store.items()[0].quantity, 2);
}

#[tokio::test]
async fn the_final_persisted_blob_matches_the_final_state() {
    let kv = Arc::new(RecordingKv::new(MemoryKv::new()));
    let store = CartStore::new(Arc::clone(&kv));
    store.load().await.unwrap();

    let mutations = 20;
    for _ in 0..mutations / 2 {
        store.add_to_cart(sample_product("A")).await;
        store.add_to_cart(sample_product("B")).await;
    }
    store.flush().await.unwrap();

    // One write per mutation at most; the coalescing writer may do fewer.
    assert!(kv.sets() >= 1);
    assert!(kv.sets() <= mutations);

    let blob = kv.get(DEFAULT_CART_KEY).await.unwrap().unwrap();
    let persisted = gocart::CartState::from_bytes(&blob).unwrap();
    assert_eq!(persisted, *store.snapshot());
}

#[tokio::test]
async fn subscribers_observe_each_published_state() {
    let store = CartStore::new(MemoryKv::new());
    let mut rx = store.subscribe();
    store.load().await.unwrap();

    store.add_to_cart(sample_product("A")).await;

    rx.changed().await.unwrap();
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.items()[0].id.as_str(), "A");
}

#[tokio::test]
async fn persisted_layout_uses_the_camel_case_image_key() {
    let kv = Arc::new(MemoryKv::new());
    let store = CartStore::new(Arc::clone(&kv));
    store.load().await.unwrap();

    store.add_to_cart(sample_product("A")).await;
    store.flush().await.unwrap();

    let blob = kv.get(DEFAULT_CART_KEY).await.unwrap().unwrap();
    let text = std::str::from_utf8(&blob).unwrap();
    assert!(text.contains("\"imageUrl\""));
    assert!(!text.contains("\"image_url\""));
}

#[tokio::test]
async fn a_custom_key_is_respected() {
    let kv = Arc::new(MemoryKv::new());
    let config = CartConfig {
        key: "tenant-7/cart".to_string(),
    };
    let store = CartStore::with_config(Arc::clone(&kv), config);
    store.load().await.unwrap();

    store.add_to_cart(sample_product("A")).await;
    store.flush().await.unwrap();

    assert!(kv.get("tenant-7/cart").await.unwrap().is_some());
    assert!(kv.get(DEFAULT_CART_KEY).await.unwrap().is_none());
}

#[tokio::test]
#[should_panic(expected = "load() called twice")]
async fn loading_twice_is_a_wiring_bug() {
    let store = CartStore::new(MemoryKv::new());
    store.load().await.unwrap();
    let _ = store.load().await;
}

#[tokio::test]
async fn a_cart_survives_process_restart_on_sqlite() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cart.db");

    {
        let store = CartStore::new(SqliteKv::open(&path)?);
        store.load().await?;
        store.add_to_cart(sample_product("A")).await;
        store.add_to_cart(sample_product("A")).await;
        store.add_to_cart(sample_product("B")).await;
        store.flush().await?;
    }

    let store = CartStore::new(SqliteKv::open(&path)?);
    store.load().await?;

    let items = store.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[1].id.as_str(), "B");
    Ok(())
}
