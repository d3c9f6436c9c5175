#![allow(dead_code)]

use chrono::{DateTime, Utc};
use rusty_lending_ddd::adapters::mock::{ItemDirectory, UserDirectory};
use rusty_lending_ddd::application::ServiceDependencies;
use rusty_lending_ddd::domain::{
    Booking, BookingFilter, BookingId, BookingParty, Comment, ItemId, Status, UserId,
};
use rusty_lending_ddd::ports::{
    ItemRecord, booking_store, booking_store::BookingStore, comment_store,
    comment_store::CommentStore,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================================
// インメモリストア実装（テスト用）
// ============================================================================

/// インメモリBookingStore実装
///
/// 1つのMutexの下で各操作を実行するため、操作単位の原子性は
/// PostgreSQL実装と同等になる。
pub struct InMemoryBookingStore {
    bookings: Mutex<HashMap<BookingId, Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用：任意のステータスの予約を直接差し込む
    pub fn insert_raw(&self, booking: Booking) {
        self.bookings
            .lock()
            .unwrap()
            .insert(booking.booking_id, booking);
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn save(&self, booking: &Booking) -> booking_store::Result<Booking> {
        self.bookings
            .lock()
            .unwrap()
            .insert(booking.booking_id, booking.clone());
        Ok(booking.clone())
    }

    async fn transition_status(
        &self,
        booking_id: BookingId,
        from: Status,
        to: Status,
        at: DateTime<Utc>,
    ) -> booking_store::Result<Option<Booking>> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.get_mut(&booking_id) {
            Some(booking) if booking.status == from => {
                booking.status = to;
                booking.updated_at = at;
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn find_by_id(&self, booking_id: BookingId) -> booking_store::Result<Option<Booking>> {
        Ok(self.bookings.lock().unwrap().get(&booking_id).cloned())
    }

    async fn find_matching(
        &self,
        party: BookingParty,
        filter: BookingFilter,
    ) -> booking_store::Result<Vec<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| party.matches(b) && filter.matches(b))
            .cloned()
            .collect())
    }

    async fn has_finished_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> booking_store::Result<bool> {
        Ok(self.bookings.lock().unwrap().values().any(|b| {
            b.booker_id == booker_id
                && b.item_id == item_id
                && b.status == Status::Approved
                && b.period.ends_before(now)
        }))
    }

    async fn approved_ending_before(
        &self,
        item_ids: &[ItemId],
        now: DateTime<Utc>,
    ) -> booking_store::Result<HashMap<ItemId, Vec<Booking>>> {
        let mut grouped: HashMap<ItemId, Vec<Booking>> = HashMap::new();
        for booking in self.bookings.lock().unwrap().values() {
            if item_ids.contains(&booking.item_id)
                && booking.status == Status::Approved
                && booking.period.ends_before(now)
            {
                grouped
                    .entry(booking.item_id)
                    .or_default()
                    .push(booking.clone());
            }
        }
        Ok(grouped)
    }

    async fn approved_starting_after(
        &self,
        item_ids: &[ItemId],
        now: DateTime<Utc>,
    ) -> booking_store::Result<HashMap<ItemId, Vec<Booking>>> {
        let mut grouped: HashMap<ItemId, Vec<Booking>> = HashMap::new();
        for booking in self.bookings.lock().unwrap().values() {
            if item_ids.contains(&booking.item_id)
                && booking.status == Status::Approved
                && booking.period.starts_after(now)
            {
                grouped
                    .entry(booking.item_id)
                    .or_default()
                    .push(booking.clone());
            }
        }
        Ok(grouped)
    }
}

/// インメモリCommentStore実装
pub struct InMemoryCommentStore {
    comments: Mutex<Vec<Comment>>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self {
            comments: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryCommentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn save(&self, comment: &Comment) -> comment_store::Result<Comment> {
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment.clone())
    }

    async fn find_by_item(&self, item_id: ItemId) -> comment_store::Result<Vec<Comment>> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.item_id == item_id)
            .cloned()
            .collect())
    }

    async fn find_by_items(
        &self,
        item_ids: &[ItemId],
    ) -> comment_store::Result<HashMap<ItemId, Vec<Comment>>> {
        let mut grouped: HashMap<ItemId, Vec<Comment>> = HashMap::new();
        for comment in self.comments.lock().unwrap().iter() {
            if item_ids.contains(&comment.item_id) {
                grouped
                    .entry(comment.item_id)
                    .or_default()
                    .push(comment.clone());
            }
        }
        Ok(grouped)
    }
}

// ============================================================================
// テストセットアップ
// ============================================================================

/// テスト一式の依存関係
pub struct TestContext {
    pub deps: ServiceDependencies,
    pub booking_store: Arc<InMemoryBookingStore>,
    pub comment_store: Arc<InMemoryCommentStore>,
    pub user_directory: Arc<UserDirectory>,
    pub item_directory: Arc<ItemDirectory>,
}

/// インメモリ実装一式でServiceDependenciesを組み立てる
pub fn create_test_context() -> TestContext {
    let booking_store = Arc::new(InMemoryBookingStore::new());
    let comment_store = Arc::new(InMemoryCommentStore::new());
    let user_directory = Arc::new(UserDirectory::new());
    let item_directory = Arc::new(ItemDirectory::new());

    let deps = ServiceDependencies {
        booking_store: booking_store.clone(),
        comment_store: comment_store.clone(),
        user_directory: user_directory.clone(),
        item_directory: item_directory.clone(),
    };

    TestContext {
        deps,
        booking_store,
        comment_store,
        user_directory,
        item_directory,
    }
}

/// 所有者・予約者・予約受付中のアイテムを登録する
pub fn register_owner_booker_item(ctx: &TestContext) -> (UserId, UserId, ItemId) {
    let owner_id = UserId::new();
    let booker_id = UserId::new();
    let item_id = ItemId::new();

    ctx.user_directory.add_user(owner_id, "owner");
    ctx.user_directory.add_user(booker_id, "booker");
    ctx.item_directory.add_item(ItemRecord {
        item_id,
        name: "cordless drill".to_string(),
        description: "18V cordless drill".to_string(),
        available: true,
        owner_id,
    });

    (owner_id, booker_id, item_id)
}
