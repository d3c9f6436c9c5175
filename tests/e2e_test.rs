use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use rusty_lending_ddd::api::extract::SHARER_USER_ID_HEADER;
use rusty_lending_ddd::api::handlers::AppState;
use rusty_lending_ddd::api::router::create_router;
use rusty_lending_ddd::api::types::*;
use rusty_lending_ddd::domain::{ItemId, Status, UserId};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

mod common;

use common::{TestContext, create_test_context, register_owner_booker_item};

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

/// インメモリストア一式の上に実際のAPIルーターを組み立てる
fn setup_e2e_app(ctx: &TestContext) -> axum::Router {
    let app_state = Arc::new(AppState {
        service_deps: ctx.deps.clone(),
    });
    create_router(app_state)
}

async fn send(
    app: &axum::Router,
    request: Request<Body>,
) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn json_request(
    method: &str,
    uri: &str,
    sharer: Option<UserId>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = sharer {
        builder = builder.header(SHARER_USER_ID_HEADER, user_id.value().to_string());
    }
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn booking_request_body(item_id: ItemId, start_days: i64, end_days: i64) -> serde_json::Value {
    let now = Utc::now();
    json!({
        "item_id": item_id.value(),
        "start": now + Duration::days(start_days),
        "end": now + Duration::days(end_days),
    })
}

// ============================================================================
// E2Eテスト: 正常系フロー
// ============================================================================

#[tokio::test]
async fn test_e2e_full_booking_flow() {
    let ctx = create_test_context();
    let (owner_id, booker_id, item_id) = register_owner_booker_item(&ctx);
    let app = setup_e2e_app(&ctx);

    // Step 1: 予約リクエスト（POST /bookings）
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/bookings",
            Some(booker_id),
            Some(booking_request_body(item_id, 1, 2)),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let created: BookingResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(created.status, "WAITING");
    assert_eq!(created.item_id, item_id.value());
    assert_eq!(created.booker_id, booker_id.value());
    let booking_id = created.booking_id;

    // Step 2: 所有者が承認（PATCH /bookings/:id?approved=true）
    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/bookings/{}?approved=true", booking_id),
            Some(owner_id),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let approved: BookingResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(approved.status, "APPROVED");

    // Step 3: 予約者が詳細取得（GET /bookings/:id）
    let (status, body) = send(
        &app,
        json_request(
            "GET",
            &format!("/bookings/{}", booking_id),
            Some(booker_id),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let fetched: BookingResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched.booking_id, booking_id);
    assert_eq!(fetched.status, "APPROVED");

    // Step 4: 予約者の一覧（GET /bookings?state=FUTURE）
    let (status, body) = send(
        &app,
        json_request("GET", "/bookings?state=FUTURE", Some(booker_id), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let listed: Vec<BookingResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].booking_id, booking_id);

    // Step 5: 所有者側の一覧（GET /bookings/owner）
    let (status, body) = send(
        &app,
        json_request("GET", "/bookings/owner", Some(owner_id), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let listed: Vec<BookingResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_e2e_item_view_and_comment_flow() {
    let ctx = create_test_context();
    let (owner_id, booker_id, item_id) = register_owner_booker_item(&ctx);
    let app = setup_e2e_app(&ctx);

    // 昨日終わった予約を承認済みにしておく
    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/bookings",
            Some(booker_id),
            Some(booking_request_body(item_id, -2, -1)),
        ),
    )
    .await;
    let created: BookingResponse = serde_json::from_slice(&body).unwrap();

    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/bookings/{}?approved=true", created.booking_id),
            Some(owner_id),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // 予約者がコメントを残す（POST /items/:id/comment）
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/items/{}/comment", item_id.value()),
            Some(booker_id),
            Some(json!({ "text": "Worked perfectly" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let comment: CommentResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(comment.text, "Worked perfectly");
    assert_eq!(comment.author_name, "booker");

    // 所有者のアイテム詳細にはlast_bookingとコメントが見える
    let (status, body) = send(
        &app,
        json_request(
            "GET",
            &format!("/items/{}", item_id.value()),
            Some(owner_id),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let item: ItemResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        item.last_booking.map(|s| s.booking_id),
        Some(created.booking_id)
    );
    assert!(item.next_booking.is_none());
    assert_eq!(item.comments.len(), 1);

    // 予約者から見るとlast/nextは見えないがコメントは見える
    let (_, body) = send(
        &app,
        json_request(
            "GET",
            &format!("/items/{}", item_id.value()),
            Some(booker_id),
            None,
        ),
    )
    .await;
    let item: ItemResponse = serde_json::from_slice(&body).unwrap();
    assert!(item.last_booking.is_none());
    assert_eq!(item.comments.len(), 1);

    // 所有者のアイテム一覧（GET /items）
    let (status, body) = send(&app, json_request("GET", "/items", Some(owner_id), None)).await;
    assert_eq!(status, StatusCode::OK);
    let items: Vec<ItemResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].last_booking.is_some());
}

// ============================================================================
// E2Eテスト: エラー応答
// ============================================================================

#[tokio::test]
async fn test_e2e_missing_sharer_header_is_bad_request() {
    let ctx = create_test_context();
    let (_, _, item_id) = register_owner_booker_item(&ctx);
    let app = setup_e2e_app(&ctx);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/bookings",
            None,
            Some(booking_request_body(item_id, 1, 2)),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "VALIDATION");
    assert!(error.message.contains(SHARER_USER_ID_HEADER));
}

#[tokio::test]
async fn test_e2e_unknown_state_is_bad_request() {
    let ctx = create_test_context();
    let (_, booker_id, _) = register_owner_booker_item(&ctx);
    let app = setup_e2e_app(&ctx);

    let (status, body) = send(
        &app,
        json_request("GET", "/bookings?state=SOON", Some(booker_id), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "VALIDATION");
    assert!(error.message.contains("Unknown state"));
}

#[tokio::test]
async fn test_e2e_error_status_mapping() {
    let ctx = create_test_context();
    let (owner_id, booker_id, item_id) = register_owner_booker_item(&ctx);
    let app = setup_e2e_app(&ctx);

    // 予約を1件作っておく
    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/bookings",
            Some(booker_id),
            Some(booking_request_body(item_id, 1, 2)),
        ),
    )
    .await;
    let created: BookingResponse = serde_json::from_slice(&body).unwrap();

    // 未知のユーザーは404 USER_NOT_FOUND
    let (status, body) = send(
        &app,
        json_request("GET", "/bookings", Some(UserId::new()), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "USER_NOT_FOUND");

    // 存在しない予約は404 BOOKING_NOT_FOUND
    let (status, body) = send(
        &app,
        json_request(
            "GET",
            &format!("/bookings/{}", uuid::Uuid::new_v4()),
            Some(booker_id),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "BOOKING_NOT_FOUND");

    // 第三者の閲覧は403 ACCESS_DENIED
    let stranger = UserId::new();
    ctx.user_directory.add_user(stranger, "stranger");
    let (status, body) = send(
        &app,
        json_request(
            "GET",
            &format!("/bookings/{}", created.booking_id),
            Some(stranger),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "ACCESS_DENIED");

    // 承認後の再承認は400 VALIDATION、メッセージに現ステータス
    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/bookings/{}?approved=true", created.booking_id),
            Some(owner_id),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/bookings/{}?approved=false", created.booking_id),
            Some(owner_id),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "VALIDATION");
    assert!(error.message.contains(Status::Approved.as_str()));

    // 自分のアイテムは予約できない（400）
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/bookings",
            Some(owner_id),
            Some(booking_request_body(item_id, 3, 4)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_e2e_health_check() {
    let ctx = create_test_context();
    let app = setup_e2e_app(&ctx);

    let (status, body) = send(&app, json_request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}
