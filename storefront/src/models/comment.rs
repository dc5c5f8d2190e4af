// storefront/src/models/comment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MAX_RATING: i16 = 5;

/// A review of one order item. `contents` is stored as the client sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
  pub id: i64,
  pub user_id: Uuid,
  pub order_item_id: i64,
  pub rating: i16,
  pub contents: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
  pub order_item_id: i64,
  pub rating: i16,
  #[serde(default)]
  pub contents: Option<String>,
}
