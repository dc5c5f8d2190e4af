// storefront/src/web/extractors.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::envelope::MSG_NO_SESSION;
use crate::state::AppState;

/// The user resolved by the configured `SessionProvider`.
///
/// Handlers that answer unauthenticated requests with a neutral payload take
/// `Option<SessionUser>`; the others fail with 403.
#[derive(Debug, Clone, Copy)]
pub struct SessionUser {
  pub user_id: Uuid,
}

impl FromRequest for SessionUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let Some(app_state) = req.app_data::<web::Data<AppState>>() else {
      return ready(Err(AppError::Internal("application state is not configured".to_string())));
    };
    match app_state.sessions.session(req) {
      Some(session) => ready(Ok(SessionUser {
        user_id: session.user_id,
      })),
      None => {
        warn!(path = %req.path(), "Request without a session.");
        ready(Err(AppError::Forbidden(MSG_NO_SESSION.to_string())))
      }
    }
  }
}
