// storefront/src/store/memory.rs

//! In-process `OrderStore` for development and tests.
//!
//! Mirrors the relational schema closely enough for the HTTP layer: product
//! references must resolve, comments are unique per item, and a closed store
//! refuses work the way a closed pool does.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};
use uuid::Uuid;

use super::{assemble_details, OrderStore};
use crate::errors::{AppError, Result};
use crate::models::{
  line_amount, CartLine, Comment, DeliveryInfo, NewComment, NewOrderItem, Order, OrderDetail, OrderItem,
  OrderItemDetail, OrderStatus, PlacedOrder,
};

#[derive(Debug, Clone)]
struct ProductRow {
  name: String,
  image_url: Option<String>,
  price: i64,
}

#[derive(Debug, Clone)]
struct CartRow {
  id: i64,
  user_id: Uuid,
  product_id: i64,
  quantity: i32,
  amount: i64,
}

#[derive(Debug, Default)]
struct Tables {
  last_id: i64,
  products: HashMap<i64, ProductRow>,
  cart: Vec<CartRow>,
  order_items: HashMap<i64, OrderItem>,
  orders: BTreeMap<i64, Order>,
  comments: HashMap<i64, Comment>,
}

impl Tables {
  fn next_id(&mut self) -> i64 {
    self.last_id += 1;
    self.last_id
  }

  fn create_order_item(&mut self, item: &NewOrderItem) -> OrderItem {
    let created = OrderItem {
      id: self.next_id(),
      product_id: item.product_id,
      price: item.price,
      quantity: item.quantity,
      amount: item.computed_amount(),
    };
    self.order_items.insert(created.id, created.clone());
    created
  }

  fn create_order(&mut self, user_id: Uuid, order_item_ids: Vec<i64>, delivery: DeliveryInfo) -> Order {
    let now = Utc::now();
    let created = Order {
      id: self.next_id(),
      user_id,
      order_item_ids,
      status: OrderStatus::OrderPending,
      receiver: delivery.receiver,
      address: delivery.address,
      phone_number: delivery.phone_number,
      created_at: now,
      updated_at: now,
    };
    self.orders.insert(created.id, created.clone());
    created
  }

  fn item_detail(&self, item_id: i64) -> Option<OrderItemDetail> {
    let item = self.order_items.get(&item_id)?;
    let product = self.products.get(&item.product_id)?;
    Some(OrderItemDetail {
      item: item.clone(),
      name: product.name.clone(),
      image_url: product.image_url.clone(),
    })
  }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
  closed: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seeds a product and returns its id.
  pub fn insert_product(&self, name: &str, image_url: Option<&str>, price: i64) -> i64 {
    let mut tables = self.tables.write();
    let id = tables.next_id();
    tables.products.insert(
      id,
      ProductRow {
        name: name.to_string(),
        image_url: image_url.map(str::to_string),
        price,
      },
    );
    id
  }

  /// Seeds a cart line priced at the product's current price.
  pub fn add_cart_line(&self, user_id: Uuid, product_id: i64, quantity: i32) -> Result<i64> {
    let mut tables = self.tables.write();
    let price = tables
      .products
      .get(&product_id)
      .map(|p| p.price)
      .ok_or_else(|| AppError::NotFound(format!("product {} not found", product_id)))?;
    let id = tables.next_id();
    tables.cart.push(CartRow {
      id,
      user_id,
      product_id,
      quantity,
      amount: line_amount(price, quantity),
    });
    Ok(id)
  }

  pub fn is_closed(&self) -> bool {
    self.closed.load(Ordering::Acquire)
  }

  fn ensure_open(&self) -> Result<()> {
    if self.is_closed() {
      return Err(AppError::Sqlx(sqlx::Error::PoolClosed));
    }
    Ok(())
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn place_order(
    &self,
    user_id: Uuid,
    items: Vec<NewOrderItem>,
    delivery: DeliveryInfo,
  ) -> Result<PlacedOrder> {
    self.ensure_open()?;
    let mut tables = self.tables.write();

    // Check every reference before the first write so a failure leaves no rows behind.
    if let Some(missing) = items.iter().find(|i| !tables.products.contains_key(&i.product_id)) {
      return Err(AppError::Validation(format!("product {} not found", missing.product_id)));
    }

    let order_items: Vec<OrderItem> = items.iter().map(|item| tables.create_order_item(item)).collect();
    let ids = order_items.iter().map(|i| i.id).collect();
    let order = tables.create_order(user_id, ids, delivery);
    debug!(order_id = order.id, "Order stored in memory.");
    Ok(PlacedOrder { order, order_items })
  }

  async fn find_order(&self, order_id: i64) -> Result<Option<Order>> {
    self.ensure_open()?;
    Ok(self.tables.read().orders.get(&order_id).cloned())
  }

  async fn find_order_by_item(&self, order_item_id: i64) -> Result<Option<Order>> {
    self.ensure_open()?;
    let tables = self.tables.read();
    Ok(
      tables
        .orders
        .values()
        .find(|o| o.order_item_ids.contains(&order_item_id))
        .cloned(),
    )
  }

  async fn find_orders_by_user(&self, user_id: Uuid) -> Result<Vec<OrderDetail>> {
    self.ensure_open()?;
    let tables = self.tables.read();
    let mut orders: Vec<Order> = tables.orders.values().filter(|o| o.is_owned_by(user_id)).cloned().collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    let items = orders
      .iter()
      .flat_map(|o| o.order_item_ids.iter())
      .filter_map(|id| tables.item_detail(*id))
      .collect();
    Ok(assemble_details(orders, items))
  }

  async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order> {
    self.ensure_open()?;
    let mut tables = self.tables.write();
    let order = tables
      .orders
      .get_mut(&order_id)
      .ok_or_else(|| AppError::NotFound(format!("order {} not found", order_id)))?;
    order.status = status;
    order.updated_at = Utc::now();
    Ok(order.clone())
  }

  async fn find_comment_by_order_item(&self, order_item_id: i64) -> Result<Option<Comment>> {
    self.ensure_open()?;
    Ok(self.tables.read().comments.get(&order_item_id).cloned())
  }

  async fn save_comment(&self, user_id: Uuid, comment: NewComment) -> Result<Comment> {
    self.ensure_open()?;
    let mut tables = self.tables.write();
    if !tables.order_items.contains_key(&comment.order_item_id) {
      return Err(AppError::Validation(format!("order item {} not found", comment.order_item_id)));
    }

    let now = Utc::now();
    if let Some(existing) = tables.comments.get_mut(&comment.order_item_id) {
      if existing.user_id != user_id {
        return Err(AppError::Forbidden("userId is not matched".to_string()));
      }
      existing.rating = comment.rating;
      existing.contents = comment.contents;
      existing.updated_at = now;
      return Ok(existing.clone());
    }

    let created = Comment {
      id: tables.next_id(),
      user_id,
      order_item_id: comment.order_item_id,
      rating: comment.rating,
      contents: comment.contents,
      created_at: now,
      updated_at: now,
    };
    tables.comments.insert(created.order_item_id, created.clone());
    Ok(created)
  }

  async fn find_cart_by_user(&self, user_id: Uuid) -> Result<Vec<CartLine>> {
    self.ensure_open()?;
    let tables = self.tables.read();
    Ok(
      tables
        .cart
        .iter()
        .filter(|row| row.user_id == user_id)
        .filter_map(|row| {
          let product = tables.products.get(&row.product_id)?;
          Some(CartLine {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            quantity: row.quantity,
            amount: row.amount,
            price: product.price,
            name: product.name.clone(),
            image_url: product.image_url.clone(),
          })
        })
        .collect(),
    )
  }

  async fn close(&self) {
    self.closed.store(true, Ordering::Release);
    info!("Memory store closed.");
  }
}
