// storefront/src/web/routes.rs

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{cart_handlers, comment_handlers, order_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Registers every route plus the JSON and query error handlers, so malformed
/// input is answered with the same envelope as any other validation error.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(
      web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
      web::QueryConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::resource("/orders")
        .route(web::get().to(order_handlers::list_orders_handler))
        .route(web::post().to(order_handlers::place_order_handler)),
    )
    .route(
      "/order-status",
      web::patch().to(order_handlers::update_order_status_handler),
    )
    .route("/cart", web::get().to(cart_handlers::get_cart_handler))
    .service(
      web::resource("/comment")
        .route(web::get().to(comment_handlers::get_comment_handler))
        .route(web::post().to(comment_handlers::save_comment_handler)),
    );
}
