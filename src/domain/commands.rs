use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, ItemId, UserId};

/// コマンド：予約をリクエストする
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBooking {
    pub booker_id: UserId,
    pub item_id: ItemId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub requested_at: DateTime<Utc>,
}

/// コマンド：予約を承認または拒否する
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecideBooking {
    pub actor_id: UserId,
    pub booking_id: BookingId,
    pub approved: bool,
    pub decided_at: DateTime<Utc>,
}

/// コマンド：アイテムにコメントを残す
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddComment {
    pub author_id: UserId,
    pub item_id: ItemId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
