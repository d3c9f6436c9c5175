use crate::ports::{BookingStore, CommentStore, ItemDirectory, UserDirectory};
use std::sync::Arc;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
///
/// このパターンにより：
/// - すべての依存が明示的
/// - データと振る舞いの分離
/// - テストが明確
#[derive(Clone)]
#[allow(dead_code)]
pub struct ServiceDependencies {
    pub booking_store: Arc<dyn BookingStore>,
    pub comment_store: Arc<dyn CommentStore>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub item_directory: Arc<dyn ItemDirectory>,
}
