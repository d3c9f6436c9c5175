use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::item::{BookingSlot, CommentView, ItemView};
use crate::domain::{Booking, ItemId, State, UserId, commands::CreateBooking};

/// 予約作成リクエスト（POST /bookings）
#[derive(Debug, Deserialize)]
pub struct BookingCreateRequest {
    pub item_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BookingCreateRequest {
    pub fn to_command(&self, booker_id: UserId) -> CreateBooking {
        CreateBooking {
            booker_id,
            item_id: ItemId::from_uuid(self.item_id),
            start: self.start,
            end: self.end,
            requested_at: Utc::now(),
        }
    }
}

/// 承認クエリパラメータ（PATCH /bookings/:id?approved=）
#[derive(Debug, Deserialize)]
pub struct ApprovalQuery {
    pub approved: bool,
}

/// 予約一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    /// 6分類のフィルタ。省略時はALL
    pub state: Option<String>,
}

/// 予約レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking_id: Uuid,
    pub item_id: Uuid,
    pub booker_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            booking_id: booking.booking_id.value(),
            item_id: booking.item_id.value(),
            booker_id: booking.booker_id.value(),
            start: booking.period.start(),
            end: booking.period.end(),
            status: booking.status.as_str().to_string(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// アイテムビューに添付される予約の要約
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingSlotResponse {
    pub booking_id: Uuid,
    pub booker_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<BookingSlot> for BookingSlotResponse {
    fn from(slot: BookingSlot) -> Self {
        Self {
            booking_id: slot.booking_id.value(),
            booker_id: slot.booker_id.value(),
            start: slot.start,
            end: slot.end,
        }
    }
}

/// コメント作成リクエスト（POST /items/:id/comment）
#[derive(Debug, Deserialize)]
pub struct CommentCreateRequest {
    pub text: String,
}

/// コメントレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub comment_id: Uuid,
    pub text: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        Self {
            comment_id: view.comment_id.value(),
            text: view.text,
            author_name: view.author_name,
            created_at: view.created_at,
        }
    }
}

/// アイテムレスポンス（GET /items/:id と GET /items）
///
/// last/nextは要求者が所有者の場合のみ埋まる。
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemResponse {
    pub item_id: Uuid,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub last_booking: Option<BookingSlotResponse>,
    pub next_booking: Option<BookingSlotResponse>,
    pub comments: Vec<CommentResponse>,
}

impl From<ItemView> for ItemResponse {
    fn from(view: ItemView) -> Self {
        Self {
            item_id: view.item_id.value(),
            name: view.name,
            description: view.description,
            available: view.available,
            last_booking: view.last_booking.map(BookingSlotResponse::from),
            next_booking: view.next_booking.map(BookingSlotResponse::from),
            comments: view.comments.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// stateクエリパラメータのパースとバリデーション
///
/// 未知の値はInvalidArgument（HTTP 400）として呼び出し側に返る。
pub fn parse_state_filter(state: Option<&str>) -> Result<State, String> {
    match state {
        None => Ok(State::All),
        Some(s) => s.parse::<State>(),
    }
}
