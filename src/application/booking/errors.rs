use crate::domain::{BookingId, ItemId, UserId};
use thiserror::Error;

/// 予約管理アプリケーション層のエラー
///
/// 3分類：リソース不在（NotFound系）、関係性の欠如（AccessDenied）、
/// ビジネスルール違反（Validation）。どれも呼び出し側の入力か状態が
/// 原因であり、リトライや内部回復は行わない。
#[derive(Debug, Error)]
pub enum BookingApplicationError {
    /// ユーザーが存在しない
    #[error("User {0} not found")]
    UserNotFound(UserId),

    /// アイテムが存在しない
    #[error("Item {0} not found")]
    ItemNotFound(ItemId),

    /// 予約が存在しない
    #[error("Booking {0} not found")]
    BookingNotFound(BookingId),

    /// 操作に必要な関係（予約者でも所有者でもない）を持たない
    ///
    /// NotFoundとは区別して返す。ステータスコードから存在を
    /// 推測されないようにするためではなく、意味が異なるため。
    #[error("Access denied")]
    AccessDenied,

    /// ビジネスルール違反。理由を人間可読な文字列で持つ
    #[error("{0}")]
    Validation(String),

    /// BookingStoreのエラー
    #[error("Booking store error")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// CommentStoreのエラー
    #[error("Comment store error")]
    CommentStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// UserDirectoryのエラー
    #[error("User directory error")]
    UserDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ItemDirectoryのエラー
    #[error("Item directory error")]
    ItemDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookingApplicationError>;
