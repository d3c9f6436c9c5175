use crate::domain::{ItemId, UserId};
use crate::ports::item_directory::{ItemDirectory as ItemDirectoryTrait, ItemRecord, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// ItemDirectoryのモック実装
///
/// アイテムレコードを保持することで状態を持ったテストをサポート。
#[allow(dead_code)]
pub struct ItemDirectory {
    items: Mutex<HashMap<ItemId, ItemRecord>>,
}

#[allow(dead_code)]
impl ItemDirectory {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }

    /// アイテムを登録する
    pub fn add_item(&self, item: ItemRecord) {
        self.items.lock().unwrap().insert(item.item_id, item);
    }

    /// アイテムの予約受付フラグを変更する
    pub fn set_available(&self, item_id: ItemId, available: bool) {
        if let Some(item) = self.items.lock().unwrap().get_mut(&item_id) {
            item.available = available;
        }
    }
}

impl Default for ItemDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemDirectoryTrait for ItemDirectory {
    async fn get(&self, item_id: ItemId) -> Result<Option<ItemRecord>> {
        Ok(self.items.lock().unwrap().get(&item_id).cloned())
    }

    async fn find_by_owner(&self, owner_id: UserId) -> Result<Vec<ItemRecord>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|item| item.owner_id == owner_id)
            .cloned()
            .collect())
    }
}
