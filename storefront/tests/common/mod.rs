// tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::sync::Arc;
use storefront::config::{AppConfig, StoreBackend};
use storefront::models::{DeliveryInfo, NewOrderItem, OrderStatus, PlacedOrder};
use storefront::services::HeaderSessionProvider;
use storefront::state::AppState;
use storefront::store::{MemoryStore, OrderStore};
use uuid::Uuid;

pub const SESSION_HEADER: &str = "X-User-ID";

static TRACING: Lazy<()> = Lazy::new(|| {
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

/// Application state over a fresh in-memory store.
pub fn memory_state() -> (AppState, Arc<MemoryStore>) {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let config = AppConfig {
    store_backend: StoreBackend::Memory,
    ..AppConfig::default()
  };
  let state = AppState::build(
    config,
    store.clone(),
    Arc::new(HeaderSessionProvider::new(SESSION_HEADER)),
  )
  .expect("pipelines register");
  (state, store)
}

pub fn session(user: Uuid) -> (&'static str, String) {
  (SESSION_HEADER, user.to_string())
}

/// Places a one-line order straight through the store.
pub async fn seed_order(store: &MemoryStore, user: Uuid, price: i64, quantity: i32) -> PlacedOrder {
  let product = store.insert_product("tumbler", Some("/img/tumbler.png"), price);
  store
    .place_order(
      user,
      vec![NewOrderItem {
        product_id: product,
        price,
        quantity,
        amount: None,
      }],
      DeliveryInfo::default(),
    )
    .await
    .expect("seed order")
}

/// Walks an order along legal transitions until it is delivered.
pub async fn deliver(store: &MemoryStore, order_id: i64) {
  for status in [OrderStatus::ShippingInProgress, OrderStatus::Delivered] {
    store.update_order_status(order_id, status).await.expect("advance status");
  }
}
