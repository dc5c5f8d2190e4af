// storefront/src/services/session.rs

//! Answers "which user is this request" and nothing else.
//!
//! Session issuance lives outside this service; a provider only resolves an
//! incoming request to the user it belongs to.

use actix_web::HttpRequest;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
  pub user_id: Uuid,
}

pub trait SessionProvider: Send + Sync {
  fn session(&self, req: &HttpRequest) -> Option<Session>;
}

/// Reads the user id from a request header, e.g. one set by an upstream auth proxy.
#[derive(Debug, Clone)]
pub struct HeaderSessionProvider {
  header_name: String,
}

impl HeaderSessionProvider {
  pub fn new(header_name: impl Into<String>) -> Self {
    Self {
      header_name: header_name.into(),
    }
  }

  pub fn header_name(&self) -> &str {
    &self.header_name
  }
}

impl SessionProvider for HeaderSessionProvider {
  #[instrument(name = "session::from_header", skip_all, fields(header = %self.header_name))]
  fn session(&self, req: &HttpRequest) -> Option<Session> {
    let raw = req.headers().get(self.header_name.as_str())?.to_str().ok()?;
    match Uuid::parse_str(raw.trim()) {
      Ok(user_id) => Some(Session { user_id }),
      Err(e) => {
        debug!(error = %e, "Session header is not a valid user id.");
        None
      }
    }
  }
}
