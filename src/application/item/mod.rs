mod comment_service;
mod item_view_service;

/// アイテムビュー側も予約アプリケーションと同じエラー分類を使う
pub type Result<T> = super::booking::Result<T>;

#[allow(unused_imports)]
pub use comment_service::add_comment;
#[allow(unused_imports)]
pub use item_view_service::{BookingSlot, CommentView, ItemView, item_with_bookings, items_for_owner};
