// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::envelope::MSG_NO_SESSION;
use crate::models::{CartLine, Envelope};
use crate::state::AppState;
use crate::web::extractors::SessionUser;

#[instrument(name = "handler::get_cart", skip(app_state, session))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  session: Option<SessionUser>,
) -> Result<HttpResponse, AppError> {
  let Some(session) = session else {
    return Ok(HttpResponse::Ok().json(Envelope::<Vec<CartLine>>::with_message(Some(Vec::new()), MSG_NO_SESSION)));
  };
  let lines = app_state.store.find_cart_by_user(session.user_id).await?;
  info!(user_id = %session.user_id, count = lines.len(), "Cart fetched.");
  Ok(HttpResponse::Ok().json(Envelope::success(lines)))
}
