#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CommentId, ItemId, UserId};

/// コメント
///
/// 過去に完了したAPPROVED予約を持つユーザーだけが残せる。
/// その判定はアプリケーション層（`add_comment`）の責務であり、
/// コメント自体は作成後に変化しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: CommentId,
    pub item_id: ItemId,
    pub author_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(item_id: ItemId, author_id: UserId, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            comment_id: CommentId::new(),
            item_id,
            author_id,
            text,
            created_at,
        }
    }
}
