// tests/http_api_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::*;
use serde_json::{json, Value};
use storefront::models::{NewComment, OrderStatus};
use storefront::store::OrderStore;
use storefront::web::configure_app_routes;
use uuid::Uuid;

macro_rules! init_app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

#[actix_web::test]
async fn test_health() {
  let (state, _store) = memory_state();
  let app = init_app!(state);
  let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn test_place_order_snapshots_amount_and_starts_pending() {
  let (state, store) = memory_state();
  let app = init_app!(state);
  let user = Uuid::new_v4();
  let product = store.insert_product("mug", None, 1000);

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(session(user))
    .set_json(json!({
      "items": [{ "productId": product, "price": 1000, "quantity": 2 }],
      "orderInfo": { "receiver": "  Lee ", "address": "", "phoneNumber": null }
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Success");
  assert_eq!(body["items"]["status"], 0);
  assert_eq!(body["items"]["userId"], user.to_string());
  assert_eq!(body["items"]["receiver"], "Lee");
  assert_eq!(body["items"]["address"], Value::Null);
  assert_eq!(body["items"]["orderItems"][0]["amount"], 2000);

  let orders = store.find_orders_by_user(user).await.unwrap();
  assert_eq!(orders.len(), 1);
  assert_eq!(orders[0].total_amount(), 2000);
}

#[actix_web::test]
async fn test_place_order_without_delivery_info_leaves_it_null() {
  let (state, store) = memory_state();
  let app = init_app!(state);
  let user = Uuid::new_v4();
  let product = store.insert_product("mug", None, 1000);

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(session(user))
    .set_json(json!({ "items": [{ "productId": product, "price": 1000, "quantity": 1 }] }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["items"]["receiver"], Value::Null);
  assert_eq!(body["items"]["address"], Value::Null);
  assert_eq!(body["items"]["phoneNumber"], Value::Null);
}

#[actix_web::test]
async fn test_place_order_without_session_is_rejected() {
  let (state, store) = memory_state();
  let app = init_app!(state);
  let product = store.insert_product("mug", None, 1000);

  let req = test::TestRequest::post()
    .uri("/orders")
    .set_json(json!({ "items": [{ "productId": product, "price": 1000, "quantity": 1 }] }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "items": [], "message": "no Session" }));
}

#[actix_web::test]
async fn test_place_order_rejects_invalid_input() {
  let (state, store) = memory_state();
  let app = init_app!(state);
  let user = Uuid::new_v4();
  let product = store.insert_product("mug", None, 1000);

  for items in [
    json!([]),
    json!([{ "productId": product, "price": 1000, "quantity": 0 }]),
    json!([{ "productId": product, "price": 1000, "quantity": 21 }]),
    json!([{ "productId": product, "price": 1000, "quantity": 2, "amount": 1500 }]),
  ] {
    let req = test::TestRequest::post()
      .uri("/orders")
      .insert_header(session(user))
      .set_json(json!({ "items": items }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "items: {}", items);
  }

  let malformed = test::TestRequest::post()
    .uri("/orders")
    .insert_header(session(user))
    .insert_header(("content-type", "application/json"))
    .set_payload("{ not json")
    .to_request();
  assert_eq!(test::call_service(&app, malformed).await.status(), StatusCode::BAD_REQUEST);

  assert!(store.find_orders_by_user(user).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_place_order_rejects_amounts_that_overflow() {
  let (state, store) = memory_state();
  let app = init_app!(state);
  let user = Uuid::new_v4();
  let product = store.insert_product("mug", None, 1000);

  for items in [
    json!([{ "productId": product, "price": i64::MAX / 2 + 1, "quantity": 2 }]),
    json!([
      { "productId": product, "price": i64::MAX, "quantity": 1 },
      { "productId": product, "price": 1, "quantity": 1 }
    ]),
  ] {
    let req = test::TestRequest::post()
      .uri("/orders")
      .insert_header(session(user))
      .set_json(json!({ "items": items }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "items: {}", items);
  }

  assert!(store.find_orders_by_user(user).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_persistence_failure_answers_failed() {
  let (state, store) = memory_state();
  let app = init_app!(state);
  let product = store.insert_product("mug", None, 1000);
  store.close().await;

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(session(Uuid::new_v4()))
    .set_json(json!({ "items": [{ "productId": product, "price": 1000, "quantity": 1 }] }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Failed");
}

#[actix_web::test]
async fn test_cart_requires_session_only_for_contents() {
  let (state, store) = memory_state();
  let app = init_app!(state);
  let user = Uuid::new_v4();
  let product = store.insert_product("mug", Some("/mug.png"), 1200);
  store.add_cart_line(user, product, 2).unwrap();

  let anonymous = test::call_service(&app, test::TestRequest::get().uri("/cart").to_request()).await;
  assert_eq!(anonymous.status(), StatusCode::OK);
  let body: Value = test::read_body_json(anonymous).await;
  assert_eq!(body, json!({ "items": [], "message": "no Session" }));

  let req = test::TestRequest::get().uri("/cart").insert_header(session(user)).to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["message"], "Success");
  assert_eq!(body["items"][0]["name"], "mug");
  assert_eq!(body["items"][0]["imageUrl"], "/mug.png");
  assert_eq!(body["items"][0]["price"], 1200);
  assert_eq!(body["items"][0]["amount"], 2400);
}

#[actix_web::test]
async fn test_update_status_then_read_returns_written_status() {
  let (state, store) = memory_state();
  let app = init_app!(state);
  let user = Uuid::new_v4();
  let placed = seed_order(&store, user, 1000, 1).await;

  let req = test::TestRequest::patch()
    .uri("/order-status")
    .insert_header(session(user))
    .set_json(json!({ "id": placed.order.id, "status": 5 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["items"]["status"], 5);

  let req = test::TestRequest::get().uri("/orders").insert_header(session(user)).to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["items"][0]["id"], placed.order.id);
  assert_eq!(body["items"][0]["status"], 5);
  assert_eq!(body["items"][0]["orderItems"][0]["name"], "tumbler");
}

#[actix_web::test]
async fn test_update_status_rejections() {
  let (state, store) = memory_state();
  let app = init_app!(state);
  let owner = Uuid::new_v4();
  let placed = seed_order(&store, owner, 1000, 1).await;
  let id = placed.order.id;

  let cases = [
    (None, json!({ "id": id, "status": -1 }), StatusCode::FORBIDDEN),
    (Some(Uuid::new_v4()), json!({ "id": id, "status": -1 }), StatusCode::FORBIDDEN),
    (Some(owner), json!({ "id": id + 1000, "status": -1 }), StatusCode::NOT_FOUND),
    (Some(owner), json!({ "id": id, "status": 2 }), StatusCode::BAD_REQUEST),
    (Some(owner), json!({ "id": id, "status": 11 }), StatusCode::BAD_REQUEST),
    (Some(owner), json!({ "id": id, "status": 6 }), StatusCode::CONFLICT),
  ];
  for (user, payload, expected) in cases {
    let mut req = test::TestRequest::patch().uri("/order-status").set_json(payload.clone());
    if let Some(user) = user {
      req = req.insert_header(session(user));
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), expected, "payload {} as {:?}", payload, user);
  }

  let unchanged = store.find_order(id).await.unwrap().unwrap();
  assert_eq!(unchanged.status, OrderStatus::OrderPending);
  assert_eq!(unchanged.updated_at, placed.order.updated_at);
}

#[actix_web::test]
async fn test_cancelled_order_cannot_be_paid() {
  let (state, store) = memory_state();
  let app = init_app!(state);
  let owner = Uuid::new_v4();
  let placed = seed_order(&store, owner, 1000, 1).await;
  store
    .update_order_status(placed.order.id, OrderStatus::Cancelled)
    .await
    .unwrap();

  let req = test::TestRequest::patch()
    .uri("/order-status")
    .insert_header(session(owner))
    .set_json(json!({ "id": placed.order.id, "status": 5 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "cannot change status from cancelled to shipping-in-progress");
}

#[actix_web::test]
async fn test_same_status_is_an_idempotent_no_op() {
  let (state, store) = memory_state();
  let app = init_app!(state);
  let owner = Uuid::new_v4();
  let placed = seed_order(&store, owner, 1000, 1).await;

  let req = test::TestRequest::patch()
    .uri("/order-status")
    .insert_header(session(owner))
    .set_json(json!({ "id": placed.order.id, "status": 0 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["items"]["status"], 0);

  let stored = store.find_order(placed.order.id).await.unwrap().unwrap();
  assert_eq!(stored.updated_at, placed.order.updated_at);
}

#[actix_web::test]
async fn test_get_comment_messages() {
  let (state, store) = memory_state();
  let app = init_app!(state);
  let owner = Uuid::new_v4();
  let placed = seed_order(&store, owner, 1000, 1).await;
  let item_id = placed.order_items[0].id;
  store
    .save_comment(
      owner,
      NewComment {
        order_item_id: item_id,
        rating: 5,
        contents: Some("{\"blocks\":[]}".to_string()),
      },
    )
    .await
    .unwrap();

  let uri = format!("/comment?orderItemId={}", item_id);

  let anonymous: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;
  assert_eq!(anonymous, json!({ "items": [], "message": "no Session" }));

  let no_id: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get()
      .uri("/comment")
      .insert_header(session(owner))
      .to_request(),
  )
  .await;
  assert_eq!(no_id, json!({ "items": [], "message": "no orderItemID" }));

  let stranger: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get()
      .uri(&uri)
      .insert_header(session(Uuid::new_v4()))
      .to_request(),
  )
  .await;
  assert_eq!(stranger, json!({ "items": null, "message": "userId is not matched" }));

  let own: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get().uri(&uri).insert_header(session(owner)).to_request(),
  )
  .await;
  assert_eq!(own["message"], "Success");
  assert_eq!(own["items"]["rating"], 5);
  assert_eq!(own["items"]["contents"], "{\"blocks\":[]}");

  let missing: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get()
      .uri(&format!("/comment?orderItemId={}", item_id + 1000))
      .insert_header(session(owner))
      .to_request(),
  )
  .await;
  assert_eq!(missing, json!({ "items": null, "message": "no Comment" }));
}

#[actix_web::test]
async fn test_save_comment_requires_delivered_order_owned_by_caller() {
  let (state, store) = memory_state();
  let app = init_app!(state);
  let owner = Uuid::new_v4();
  let placed = seed_order(&store, owner, 1000, 1).await;
  let item_id = placed.order_items[0].id;

  let post = |user: Uuid, rating: i16| {
    test::TestRequest::post()
      .uri("/comment")
      .insert_header(session(user))
      .set_json(json!({ "orderItemId": item_id, "rating": rating, "contents": "nice" }))
      .to_request()
  };

  let early = test::call_service(&app, post(owner, 4)).await;
  assert_eq!(early.status(), StatusCode::BAD_REQUEST);

  deliver(&store, placed.order.id).await;

  assert_eq!(test::call_service(&app, post(owner, 6)).await.status(), StatusCode::BAD_REQUEST);
  assert_eq!(
    test::call_service(&app, post(Uuid::new_v4(), 4)).await.status(),
    StatusCode::FORBIDDEN
  );

  let saved = test::call_service(&app, post(owner, 4)).await;
  assert_eq!(saved.status(), StatusCode::OK);
  let body: Value = test::read_body_json(saved).await;
  assert_eq!(body["items"]["rating"], 4);

  let updated: Value = test::call_and_read_body_json(&app, post(owner, 2)).await;
  assert_eq!(updated["items"]["id"], body["items"]["id"]);
  assert_eq!(updated["items"]["rating"], 2);
}
