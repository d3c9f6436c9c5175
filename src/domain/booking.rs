#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, BookingPeriod, ItemId, UserId};

/// 予約ステータス（永続化される値）
///
/// クエリ用の分類（`State`）とは別物であり、保存時に混在させてはならない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// 承認待ち（初期状態）
    Waiting,
    /// 承認済み（終端状態）
    Approved,
    /// 拒否（終端状態）
    Rejected,
}

impl Status {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Waiting => "WAITING",
            Status::Approved => "APPROVED",
            Status::Rejected => "REJECTED",
        }
    }

    /// 終端状態か（APPROVED / REJECTED からの遷移は存在しない）
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Waiting)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(Status::Waiting),
            "APPROVED" => Ok(Status::Approved),
            "REJECTED" => Ok(Status::Rejected),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// 遷移エラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// 既に処理済み（WAITING以外からの遷移は不可）
    AlreadyDecided { current: Status },
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::AlreadyDecided { current } => write!(
                f,
                "The booking has already been processed. Current status: {}",
                current
            ),
        }
    }
}

impl std::error::Error for TransitionError {}

/// 予約集約
///
/// `item_owner_id`は作成時点のアイテム所有者のスナップショット。
/// アイテムコンテキストへはIDのみで参照するため、所有者側のクエリと
/// 認可判定はこのスナップショットに対して行う。
/// 作成後に変わり得るのは`status`（と`updated_at`）だけである。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: BookingId,
    pub item_id: ItemId,
    pub item_owner_id: UserId,
    pub booker_id: UserId,
    pub period: BookingPeriod,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// 新しい予約リクエストを作成する（WAITING状態）
    pub fn request(
        item_id: ItemId,
        item_owner_id: UserId,
        booker_id: UserId,
        period: BookingPeriod,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            booking_id: BookingId::new(),
            item_id,
            item_owner_id,
            booker_id,
            period,
            status: Status::Waiting,
            created_at: requested_at,
            updated_at: requested_at,
        }
    }

    /// 承認または拒否する
    ///
    /// 唯一の状態遷移：WAITING → APPROVED / REJECTED。
    /// 終端状態からの再処理は`TransitionError::AlreadyDecided`。
    pub fn decide(self, approved: bool, decided_at: DateTime<Utc>) -> Result<Self, TransitionError> {
        if self.status != Status::Waiting {
            return Err(TransitionError::AlreadyDecided {
                current: self.status,
            });
        }

        let status = if approved {
            Status::Approved
        } else {
            Status::Rejected
        };

        Ok(Self {
            status,
            updated_at: decided_at,
            ..self
        })
    }
}
