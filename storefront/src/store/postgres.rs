// storefront/src/store/postgres.rs

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{assemble_details, OrderStore};
use crate::errors::{AppError, Result};
use crate::models::{
  CartLine, Comment, DeliveryInfo, NewComment, NewOrderItem, Order, OrderDetail, OrderItem, OrderItemDetail,
  OrderStatus, PlacedOrder,
};

const ORDER_COLUMNS: &str =
  "id, user_id, order_item_ids, status, receiver, address, phone_number, created_at, updated_at";

const COMMENT_COLUMNS: &str = "id, user_id, order_item_id, rating, contents, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await?;
    info!(max_connections, "Connected to the database.");
    Ok(Self::new(pool))
  }

  /// Applies `schema.sql`. Every statement is idempotent.
  pub async fn init_schema(&self) -> Result<()> {
    sqlx::raw_sql(include_str!("../../schema.sql")).execute(&self.pool).await?;
    info!("Database schema applied.");
    Ok(())
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

async fn create_order_item(conn: &mut PgConnection, item: &NewOrderItem) -> Result<OrderItem> {
  let created = sqlx::query_as::<_, OrderItem>(
    "INSERT INTO order_items (product_id, price, quantity, amount) VALUES ($1, $2, $3, $4) \
     RETURNING id, product_id, price, quantity, amount",
  )
  .bind(item.product_id)
  .bind(item.price)
  .bind(item.quantity)
  .bind(item.computed_amount())
  .fetch_one(conn)
  .await?;
  Ok(created)
}

async fn create_order(
  conn: &mut PgConnection,
  user_id: Uuid,
  order_item_ids: &[i64],
  delivery: &DeliveryInfo,
) -> Result<Order> {
  let sql = format!(
    "INSERT INTO orders (user_id, order_item_ids, status, receiver, address, phone_number) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING {ORDER_COLUMNS}"
  );
  let created = sqlx::query_as::<_, Order>(&sql)
    .bind(user_id)
    .bind(order_item_ids)
    .bind(OrderStatus::OrderPending)
    .bind(delivery.receiver.as_deref())
    .bind(delivery.address.as_deref())
    .bind(delivery.phone_number.as_deref())
    .fetch_one(conn)
    .await?;
  Ok(created)
}

#[async_trait]
impl OrderStore for PgStore {
  #[instrument(name = "PgStore::place_order", skip(self, items, delivery), fields(item_count = items.len()))]
  async fn place_order(
    &self,
    user_id: Uuid,
    items: Vec<NewOrderItem>,
    delivery: DeliveryInfo,
  ) -> Result<PlacedOrder> {
    let mut tx = self.pool.begin().await?;

    let mut order_items = Vec::with_capacity(items.len());
    for item in &items {
      order_items.push(create_order_item(&mut *tx, item).await?);
    }
    let ids: Vec<i64> = order_items.iter().map(|i| i.id).collect();
    let order = create_order(&mut *tx, user_id, &ids, &delivery).await?;

    tx.commit().await?;
    info!(order_id = order.id, "Order placed.");
    Ok(PlacedOrder { order, order_items })
  }

  async fn find_order(&self, order_id: i64) -> Result<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
    Ok(sqlx::query_as::<_, Order>(&sql).bind(order_id).fetch_optional(&self.pool).await?)
  }

  async fn find_order_by_item(&self, order_item_id: i64) -> Result<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE $1 = ANY(order_item_ids) LIMIT 1");
    Ok(
      sqlx::query_as::<_, Order>(&sql)
        .bind(order_item_id)
        .fetch_optional(&self.pool)
        .await?,
    )
  }

  #[instrument(name = "PgStore::find_orders_by_user", skip(self))]
  async fn find_orders_by_user(&self, user_id: Uuid) -> Result<Vec<OrderDetail>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC");
    let orders = sqlx::query_as::<_, Order>(&sql).bind(user_id).fetch_all(&self.pool).await?;
    if orders.is_empty() {
      return Ok(Vec::new());
    }

    let item_ids: Vec<i64> = orders.iter().flat_map(|o| o.order_item_ids.iter().copied()).collect();
    let items = sqlx::query_as::<_, OrderItemDetail>(
      "SELECT oi.id, oi.product_id, oi.price, oi.quantity, oi.amount, p.name, p.image_url \
       FROM order_items AS oi JOIN products AS p ON p.id = oi.product_id \
       WHERE oi.id = ANY($1)",
    )
    .bind(&item_ids)
    .fetch_all(&self.pool)
    .await?;

    Ok(assemble_details(orders, items))
  }

  #[instrument(name = "PgStore::update_order_status", skip(self), fields(status = status.code()))]
  async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order> {
    let sql = format!("UPDATE orders SET status = $2, updated_at = now() WHERE id = $1 RETURNING {ORDER_COLUMNS}");
    sqlx::query_as::<_, Order>(&sql)
      .bind(order_id)
      .bind(status)
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("order {} not found", order_id)))
  }

  async fn find_comment_by_order_item(&self, order_item_id: i64) -> Result<Option<Comment>> {
    let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE order_item_id = $1");
    Ok(
      sqlx::query_as::<_, Comment>(&sql)
        .bind(order_item_id)
        .fetch_optional(&self.pool)
        .await?,
    )
  }

  async fn save_comment(&self, user_id: Uuid, comment: NewComment) -> Result<Comment> {
    let order_item_id = comment.order_item_id;
    let sql = format!(
      "INSERT INTO comments (user_id, order_item_id, rating, contents) VALUES ($1, $2, $3, $4) \
       ON CONFLICT (order_item_id) DO UPDATE \
       SET rating = EXCLUDED.rating, contents = EXCLUDED.contents, updated_at = now() \
       WHERE comments.user_id = EXCLUDED.user_id \
       RETURNING {COMMENT_COLUMNS}"
    );
    sqlx::query_as::<_, Comment>(&sql)
      .bind(user_id)
      .bind(order_item_id)
      .bind(comment.rating)
      .bind(comment.contents)
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| {
        warn!(order_item_id, "Comment belongs to another user.");
        AppError::Forbidden("userId is not matched".to_string())
      })
  }

  async fn find_cart_by_user(&self, user_id: Uuid) -> Result<Vec<CartLine>> {
    Ok(
      sqlx::query_as::<_, CartLine>(
        "SELECT c.id, c.user_id, c.product_id, c.quantity, c.amount, p.price, p.name, p.image_url \
         FROM cart AS c JOIN products AS p ON p.id = c.product_id \
         WHERE c.user_id = $1 ORDER BY c.id",
      )
      .bind(user_id)
      .fetch_all(&self.pool)
      .await?,
    )
  }

  async fn close(&self) {
    self.pool.close().await;
    info!("Database pool closed.");
  }
}
