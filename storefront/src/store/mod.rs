// storefront/src/store/mod.rs

//! Persistence behind the `OrderStore` trait.
//!
//! The store is opened once at start-up, shared through `AppState` and closed
//! when the server stops.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{
  CartLine, Comment, DeliveryInfo, NewComment, NewOrderItem, Order, OrderDetail, OrderItemDetail, OrderStatus,
  PlacedOrder,
};

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Creates every order item and the order that references them in one
  /// transaction. Either all rows exist afterwards or none do.
  async fn place_order(&self, user_id: Uuid, items: Vec<NewOrderItem>, delivery: DeliveryInfo)
    -> Result<PlacedOrder>;

  async fn find_order(&self, order_id: i64) -> Result<Option<Order>>;

  /// The order whose item list contains `order_item_id`.
  async fn find_order_by_item(&self, order_item_id: i64) -> Result<Option<Order>>;

  /// Newest first, each joined with its item details.
  async fn find_orders_by_user(&self, user_id: Uuid) -> Result<Vec<OrderDetail>>;

  /// Writes `status` and refreshes `updated_at`. `NotFound` if the order is missing.
  async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order>;

  async fn find_comment_by_order_item(&self, order_item_id: i64) -> Result<Option<Comment>>;

  /// Inserts the comment or updates the existing one for the same item.
  async fn save_comment(&self, user_id: Uuid, comment: NewComment) -> Result<Comment>;

  async fn find_cart_by_user(&self, user_id: Uuid) -> Result<Vec<CartLine>>;

  async fn close(&self);
}

/// Pairs each order with its item details in the order's own item order.
/// Items that no longer resolve are left out.
pub(crate) fn assemble_details(orders: Vec<Order>, items: Vec<OrderItemDetail>) -> Vec<OrderDetail> {
  let mut by_id: HashMap<i64, OrderItemDetail> = items.into_iter().map(|d| (d.item.id, d)).collect();
  orders
    .into_iter()
    .map(|order| {
      let order_items = order.order_item_ids.iter().filter_map(|id| by_id.remove(id)).collect();
      OrderDetail { order, order_items }
    })
    .collect()
}
