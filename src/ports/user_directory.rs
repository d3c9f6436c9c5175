use crate::domain::UserId;
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ユーザーレコード
///
/// 予約コンテキストが必要とする最小限の情報のみを持つ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: UserId,
    pub name: String,
}

/// ユーザーディレクトリポート
///
/// 予約コンテキストとユーザー管理コンテキストの境界を維持する。
/// 予約コンテキストはUserIdと表示名のみを知り、それ以外の詳細は知らない。
#[allow(dead_code)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// ユーザーが存在するか確認する
    ///
    /// 各ライフサイクル操作の冒頭のバリデーションに使用される。
    async fn exists(&self, user_id: UserId) -> Result<bool>;

    /// ユーザーを取得する
    ///
    /// コメントビューで投稿者名を表示するために使用される。
    async fn get(&self, user_id: UserId) -> Result<Option<UserRecord>>;
}
