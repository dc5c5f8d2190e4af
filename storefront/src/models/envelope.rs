// storefront/src/models/envelope.rs

use serde::{Deserialize, Serialize};

pub const MSG_SUCCESS: &str = "Success";
pub const MSG_NO_SESSION: &str = "no Session";
pub const MSG_NO_ORDER_ITEM_ID: &str = "no orderItemID";
pub const MSG_NO_COMMENT: &str = "no Comment";
pub const MSG_USER_MISMATCH: &str = "userId is not matched";

/// Body shape of every HTTP response: `{ "items": ..., "message": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub items: Option<T>,
  pub message: String,
}

impl<T> Envelope<T> {
  pub fn success(items: T) -> Self {
    Self {
      items: Some(items),
      message: MSG_SUCCESS.to_string(),
    }
  }

  pub fn with_message(items: Option<T>, message: impl Into<String>) -> Self {
    Self {
      items,
      message: message.into(),
    }
  }
}
