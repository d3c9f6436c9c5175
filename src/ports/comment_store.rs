use crate::domain::{Comment, ItemId};
use async_trait::async_trait;
use std::collections::HashMap;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// コメントストアポート
#[allow(dead_code)]
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// コメントを保存する
    async fn save(&self, comment: &Comment) -> Result<Comment>;

    /// アイテムのコメント一覧を取得する
    async fn find_by_item(&self, item_id: ItemId) -> Result<Vec<Comment>>;

    /// 複数アイテムのコメントをアイテムIDごとにまとめて取得する
    ///
    /// 所有者向けアイテム一覧のバッチ構築用。
    async fn find_by_items(&self, item_ids: &[ItemId]) -> Result<HashMap<ItemId, Vec<Comment>>>;
}
