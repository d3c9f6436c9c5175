use crate::domain::{ItemId, UserId};
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// アイテムレコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    /// 予約受付中かどうか。falseのアイテムへの予約はInvalidArgument
    pub available: bool,
    pub owner_id: UserId,
}

/// アイテムディレクトリポート
///
/// 予約コンテキストとアイテム管理コンテキストの境界を維持する。
/// アイテムのCRUDはこのコアの管轄外で、ここでは読み取りのみ行う。
#[allow(dead_code)]
#[async_trait]
pub trait ItemDirectory: Send + Sync {
    /// アイテムを取得する
    async fn get(&self, item_id: ItemId) -> Result<Option<ItemRecord>>;

    /// 所有者のアイテム一覧を取得する
    ///
    /// 所有者向けアイテム一覧ビュー（last/next予約付き）に使用される。
    async fn find_by_owner(&self, owner_id: UserId) -> Result<Vec<ItemRecord>>;
}
