// storefront/src/client/api.rs

//! Client side of the order endpoints.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Envelope, Order, OrderDetail, OrderStatus};
use crate::web::handlers::order_handlers::UpdateOrderStatusRequest;

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("http error: {0}")]
  Transport(#[from] reqwest::Error),

  /// The server answered with a non-2xx status; `message` is the envelope's message.
  #[error("request rejected with status {status}: {message}")]
  Rejected { status: u16, message: String },

  #[error("unexpected response: {0}")]
  UnexpectedResponse(String),
}

#[async_trait]
pub trait OrderApi: Send + Sync {
  /// The caller's orders, newest first.
  async fn fetch_orders(&self) -> Result<Vec<OrderDetail>, ClientError>;

  async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order, ClientError>;
}

/// `OrderApi` over HTTP, identifying the user through the session header.
#[derive(Debug, Clone)]
pub struct HttpOrderApi {
  http: Client,
  base_url: String,
  session_header: String,
  user_id: Uuid,
}

impl HttpOrderApi {
  pub fn new(base_url: impl Into<String>, session_header: impl Into<String>, user_id: Uuid) -> Self {
    Self::with_client(Client::new(), base_url, session_header, user_id)
  }

  pub fn with_client(
    http: Client,
    base_url: impl Into<String>,
    session_header: impl Into<String>,
    user_id: Uuid,
  ) -> Self {
    Self {
      http,
      base_url: base_url.into().trim_end_matches('/').to_string(),
      session_header: session_header.into(),
      user_id,
    }
  }

  fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
    request.header(self.session_header.as_str(), self.user_id.to_string())
  }
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
  let status = response.status();
  if !status.is_success() {
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Envelope<serde_json::Value>>(&text)
      .map(|e| e.message)
      .unwrap_or(text);
    return Err(ClientError::Rejected {
      status: status.as_u16(),
      message,
    });
  }

  let envelope: Envelope<T> = response.json().await?;
  envelope
    .items
    .ok_or_else(|| ClientError::UnexpectedResponse(format!("no items in response: {}", envelope.message)))
}

#[async_trait]
impl OrderApi for HttpOrderApi {
  async fn fetch_orders(&self) -> Result<Vec<OrderDetail>, ClientError> {
    let url = format!("{}/orders", self.base_url);
    let response = self.authorized(self.http.get(&url)).send().await?;
    read_envelope(response).await
  }

  async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order, ClientError> {
    let url = format!("{}/order-status", self.base_url);
    let body = UpdateOrderStatusRequest {
      id: order_id,
      status: status.code(),
    };
    let response = self.authorized(self.http.patch(&url)).json(&body).send().await?;
    read_envelope(response).await
  }
}
