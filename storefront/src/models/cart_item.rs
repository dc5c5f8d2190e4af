// storefront/src/models/cart_item.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::order_item::line_amount;

/// A cart row joined with the product's name, image and current price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  pub id: i64,
  pub user_id: Uuid,
  pub product_id: i64,
  pub quantity: i32,
  pub amount: i64,
  pub price: i64,
  pub name: String,
  pub image_url: Option<String>,
}

impl CartLine {
  /// Display-only recompute from the current price; the stored `amount` is left alone.
  pub fn live_amount(&self) -> i64 {
    line_amount(self.price, self.quantity)
  }
}
