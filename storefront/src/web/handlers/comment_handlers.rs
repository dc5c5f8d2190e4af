// storefront/src/web/handlers/comment_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::envelope::{MSG_NO_COMMENT, MSG_NO_ORDER_ITEM_ID, MSG_NO_SESSION, MSG_USER_MISMATCH};
use crate::models::{Comment, Envelope, NewComment};
use crate::pipelines::contexts::SaveCommentCtxData;
use crate::state::AppState;
use crate::web::extractors::SessionUser;
use orderflow::{ContextData, PipelineResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentQuery {
  pub order_item_id: Option<i64>,
}

#[instrument(name = "handler::get_comment", skip(app_state, session, query), fields(order_item_id = ?query.order_item_id))]
pub async fn get_comment_handler(
  app_state: web::Data<AppState>,
  session: Option<SessionUser>,
  query: web::Query<CommentQuery>,
) -> Result<HttpResponse, AppError> {
  let Some(session) = session else {
    return Ok(HttpResponse::Ok().json(Envelope::<Vec<Comment>>::with_message(Some(Vec::new()), MSG_NO_SESSION)));
  };
  let Some(order_item_id) = query.order_item_id else {
    return Ok(HttpResponse::Ok().json(Envelope::<Vec<Comment>>::with_message(
      Some(Vec::new()),
      MSG_NO_ORDER_ITEM_ID,
    )));
  };

  let body = match app_state.store.find_comment_by_order_item(order_item_id).await? {
    Some(comment) if comment.user_id == session.user_id => Envelope::success(comment),
    Some(_) => {
      warn!(user_id = %session.user_id, order_item_id, "Comment requested by a non-owner.");
      Envelope::with_message(None, MSG_USER_MISMATCH)
    }
    None => Envelope::with_message(None, MSG_NO_COMMENT),
  };
  Ok(HttpResponse::Ok().json(body))
}

#[instrument(
  name = "handler::save_comment",
  skip(app_state, session, payload),
  fields(order_item_id = payload.order_item_id, rating = payload.rating)
)]
pub async fn save_comment_handler(
  app_state: web::Data<AppState>,
  session: SessionUser,
  payload: web::Json<NewComment>,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(SaveCommentCtxData::new(
    app_state.get_ref().clone(),
    session.user_id,
    payload.into_inner(),
  ));

  match app_state.flows.run(ctx_data.clone()).await {
    Ok(PipelineResult::Completed) => {
      let saved = ctx_data
        .read()
        .saved
        .clone()
        .ok_or_else(|| AppError::Internal("comment pipeline completed without a comment".to_string()))?;
      info!(comment_id = saved.id, "Comment stored.");
      Ok(HttpResponse::Ok().json(Envelope::success(saved)))
    }
    Ok(PipelineResult::Stopped) => Err(AppError::Internal("comment pipeline was halted".to_string())),
    Err(app_err) => {
      warn!(user_id = %session.user_id, error = %app_err, "Comment rejected.");
      Err(app_err)
    }
  }
}
