use crate::application::ServiceDependencies;
use crate::application::booking::{
    add_booking as execute_add_booking, booking_by_id as execute_booking_by_id,
    bookings_by_booker as execute_bookings_by_booker,
    bookings_by_owner as execute_bookings_by_owner, decide_booking as execute_decide_booking,
};
use crate::application::item::{
    add_comment as execute_add_comment, item_with_bookings as execute_item_with_bookings,
    items_for_owner as execute_items_for_owner,
};
use crate::domain::{BookingId, ItemId, commands::*};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    extract::SharerId,
    types::{
        ApprovalQuery, BookingCreateRequest, BookingResponse, CommentCreateRequest,
        CommentResponse, ItemResponse, ListBookingsQuery, parse_state_filter,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Booking handlers
// ============================================================================

/// POST /bookings - 予約をリクエスト
///
/// 行為者（X-Sharer-User-Id）が予約者になる。
///
/// 強制されるビジネスルール:
/// - 予約者・アイテムが存在すること
/// - 所有者は自分のアイテムを予約できないこと
/// - アイテムが予約受付中であること
/// - start < end であること
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    SharerId(booker_id): SharerId,
    Json(req): Json<BookingCreateRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let cmd = req.to_command(booker_id);

    let booking = execute_add_booking(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// PATCH /bookings/:id?approved= - 予約を承認または拒否
///
/// 強制されるビジネスルール:
/// - 予約が存在すること
/// - 行為者がアイテムの所有者であること
/// - 予約がWAITING状態であること（2回目の呼び出しは必ず失敗する）
pub async fn decide_booking(
    State(state): State<Arc<AppState>>,
    SharerId(actor_id): SharerId,
    Path(booking_id): Path<Uuid>,
    Query(query): Query<ApprovalQuery>,
) -> Result<Json<BookingResponse>, ApiError> {
    let cmd = DecideBooking {
        actor_id,
        booking_id: BookingId::from_uuid(booking_id),
        approved: query.approved,
        decided_at: chrono::Utc::now(),
    };

    let booking = execute_decide_booking(&state.service_deps, cmd).await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// GET /bookings/:id - 予約詳細を取得
///
/// 予約者と所有者だけが閲覧できる。それ以外は403。
pub async fn get_booking_by_id(
    State(state): State<Arc<AppState>>,
    SharerId(actor_id): SharerId,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = execute_booking_by_id(
        &state.service_deps,
        actor_id,
        BookingId::from_uuid(booking_id),
    )
    .await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// GET /bookings?state= - 予約者としての一覧
///
/// stateは6分類（ALL/CURRENT/PAST/FUTURE/WAITING/REJECTED）。省略時はALL。
/// 結果は常に開始時刻の降順。
pub async fn list_bookings_for_booker(
    State(state): State<Arc<AppState>>,
    SharerId(booker_id): SharerId,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let filter = parse_state_filter(query.state.as_deref()).map_err(ApiError::validation)?;

    let bookings = execute_bookings_by_booker(&state.service_deps, booker_id, filter).await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /bookings/owner?state= - 所有アイテムに対する予約一覧
pub async fn list_bookings_for_owner(
    State(state): State<Arc<AppState>>,
    SharerId(owner_id): SharerId,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let filter = parse_state_filter(query.state.as_deref()).map_err(ApiError::validation)?;

    let bookings = execute_bookings_by_owner(&state.service_deps, owner_id, filter).await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

// ============================================================================
// Item view handlers
// ============================================================================

/// GET /items/:id - アイテム詳細（予約情報・コメント付き）
///
/// last/next予約は行為者が所有者の場合のみ付く。コメントは常に付く。
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    SharerId(actor_id): SharerId,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemResponse>, ApiError> {
    let view =
        execute_item_with_bookings(&state.service_deps, actor_id, ItemId::from_uuid(item_id))
            .await?;

    Ok(Json(ItemResponse::from(view)))
}

/// GET /items - 行為者が所有するアイテム一覧（予約情報・コメント付き）
pub async fn list_items_for_owner(
    State(state): State<Arc<AppState>>,
    SharerId(owner_id): SharerId,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let views = execute_items_for_owner(&state.service_deps, owner_id).await?;

    Ok(Json(views.into_iter().map(ItemResponse::from).collect()))
}

/// POST /items/:id/comment - コメントを投稿
///
/// 強制されるビジネスルール:
/// - 投稿者・アイテムが存在すること
/// - 投稿者が過去に完了したAPPROVED予約を持つこと
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    SharerId(author_id): SharerId,
    Path(item_id): Path<Uuid>,
    Json(req): Json<CommentCreateRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let cmd = AddComment {
        author_id,
        item_id: ItemId::from_uuid(item_id),
        text: req.text,
        created_at: chrono::Utc::now(),
    };

    let comment = execute_add_comment(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}
