use crate::domain::UserId;
use crate::ports::user_directory::{Result, UserDirectory as UserDirectoryTrait, UserRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// UserDirectoryのモック実装
///
/// ユーザーレコードを保持することで状態を持ったテストをサポート。
/// 本物のユーザー管理コンテキストが接続されるまでの間、本番の
/// 組み立てでもこの実装を使う。
#[allow(dead_code)]
pub struct UserDirectory {
    users: Mutex<HashMap<UserId, UserRecord>>,
}

#[allow(dead_code)]
impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// ユーザーを登録する
    pub fn add_user(&self, user_id: UserId, name: impl Into<String>) {
        self.users.lock().unwrap().insert(
            user_id,
            UserRecord {
                user_id,
                name: name.into(),
            },
        );
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectoryTrait for UserDirectory {
    async fn exists(&self, user_id: UserId) -> Result<bool> {
        Ok(self.users.lock().unwrap().contains_key(&user_id))
    }

    async fn get(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }
}
