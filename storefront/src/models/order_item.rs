// storefront/src/models/order_item.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One purchased line. `price` and `amount` are snapshots taken at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub id: i64,
  pub product_id: i64,
  pub price: i64,
  pub quantity: i32,
  pub amount: i64,
}

/// A line as submitted at checkout. `amount` is optional; when present it
/// must agree with `price * quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
  pub product_id: i64,
  pub price: i64,
  pub quantity: i32,
  #[serde(default)]
  pub amount: Option<i64>,
}

impl NewOrderItem {
  pub fn computed_amount(&self) -> i64 {
    line_amount(self.price, self.quantity)
  }

  /// `price * quantity`, or `None` when it does not fit in an `i64`.
  pub fn checked_amount(&self) -> Option<i64> {
    self.price.checked_mul(i64::from(self.quantity))
  }
}

/// An order item joined with the product fields the order list shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetail {
  #[sqlx(flatten)]
  #[serde(flatten)]
  pub item: OrderItem,
  pub name: String,
  pub image_url: Option<String>,
}

/// Anything that carries a stored line amount.
pub trait LineAmount {
  fn line_amount(&self) -> i64;
}

impl LineAmount for OrderItem {
  fn line_amount(&self) -> i64 {
    self.amount
  }
}

impl LineAmount for OrderItemDetail {
  fn line_amount(&self) -> i64 {
    self.item.amount
  }
}

/// Sum of stored amounts. Never recomputed from price and quantity.
/// Saturates instead of overflowing.
pub fn order_total<T: LineAmount>(items: &[T]) -> i64 {
  items
    .iter()
    .map(LineAmount::line_amount)
    .fold(0i64, i64::saturating_add)
}

/// Live amount for one line, saturating at the `i64` bounds.
pub fn line_amount(price: i64, quantity: i32) -> i64 {
  price.saturating_mul(i64::from(quantity))
}
