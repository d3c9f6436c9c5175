use crate::application::deps::ServiceDependencies;
use crate::application::booking::BookingApplicationError;
use crate::domain::{Booking, BookingId, Comment, ItemId, UserId};
use crate::ports::ItemRecord;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::Result;

/// アイテムビューに添付する予約の要約
///
/// last/nextはAPPROVED予約からのみ選ばれる。存在しないことは
/// `Option`で表現し、番兵値は使わない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSlot {
    pub booking_id: BookingId,
    pub booker_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<&Booking> for BookingSlot {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.booking_id,
            booker_id: booking.booker_id,
            start: booking.period.start(),
            end: booking.period.end(),
        }
    }
}

/// コメントビュー（投稿者名付き）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment_id: crate::domain::CommentId,
    pub text: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

/// 予約情報・コメント付きアイテムビュー
///
/// last/nextは要求者がアイテムの所有者のときだけ埋まる。
/// コメントは誰に対しても見える。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub last_booking: Option<BookingSlot>,
    pub next_booking: Option<BookingSlot>,
    pub comments: Vec<CommentView>,
}

/// 候補から「直近の予約」を選ぶ：終了時刻が最大のもの
///
/// 同値の場合の選択は未規定。どの最大要素を返してもよい。
fn pick_last(bookings: &[Booking]) -> Option<BookingSlot> {
    bookings
        .iter()
        .max_by_key(|b| b.period.end())
        .map(BookingSlot::from)
}

/// 候補から「次の予約」を選ぶ：開始時刻が最小のもの
fn pick_next(bookings: &[Booking]) -> Option<BookingSlot> {
    bookings
        .iter()
        .min_by_key(|b| b.period.start())
        .map(BookingSlot::from)
}

/// コメント群を投稿者名付きのビューへ変換する
///
/// 投稿者名はユーザーディレクトリからユニークなIDごとに1回だけ引く。
async fn build_comment_views(
    deps: &ServiceDependencies,
    comments: &[Comment],
) -> Result<Vec<CommentView>> {
    let mut names: HashMap<UserId, String> = HashMap::new();
    for comment in comments {
        if names.contains_key(&comment.author_id) {
            continue;
        }
        let name = deps
            .user_directory
            .get(comment.author_id)
            .await
            .map_err(BookingApplicationError::UserDirectoryError)?
            .map(|user| user.name)
            .unwrap_or_default();
        names.insert(comment.author_id, name);
    }

    Ok(comments
        .iter()
        .map(|comment| CommentView {
            comment_id: comment.comment_id,
            text: comment.text.clone(),
            author_name: names.get(&comment.author_id).cloned().unwrap_or_default(),
            created_at: comment.created_at,
        })
        .collect())
}

fn base_view(item: &ItemRecord, comments: Vec<CommentView>) -> ItemView {
    ItemView {
        item_id: item.item_id,
        name: item.name.clone(),
        description: item.description.clone(),
        available: item.available,
        last_booking: None,
        next_booking: None,
        comments,
    }
}

/// アイテム詳細ビューを取得する
///
/// ビジネスルール：
/// - アイテムが存在すること
/// - last/next予約は要求者が所有者の場合のみ添付する。
///   予約者を含む他の誰が見ても付かない
/// - コメントは常に添付する
pub async fn item_with_bookings(
    deps: &ServiceDependencies,
    actor_id: UserId,
    item_id: ItemId,
) -> Result<ItemView> {
    // 1. アイテムの存在確認
    let item = deps
        .item_directory
        .get(item_id)
        .await
        .map_err(BookingApplicationError::ItemDirectoryError)?
        .ok_or(BookingApplicationError::ItemNotFound(item_id))?;

    // 2. コメント（全員に見える）
    let comments = deps
        .comment_store
        .find_by_item(item_id)
        .await
        .map_err(BookingApplicationError::CommentStoreError)?;
    let comment_views = build_comment_views(deps, &comments).await?;

    let mut view = base_view(&item, comment_views);

    // 3. last/nextは所有者にのみ見せる
    if item.owner_id == actor_id {
        let now = Utc::now();
        let ids = [item_id];

        let last_map = deps
            .booking_store
            .approved_ending_before(&ids, now)
            .await
            .map_err(BookingApplicationError::StoreError)?;
        let next_map = deps
            .booking_store
            .approved_starting_after(&ids, now)
            .await
            .map_err(BookingApplicationError::StoreError)?;

        view.last_booking = last_map.get(&item_id).and_then(|v| pick_last(v));
        view.next_booking = next_map.get(&item_id).and_then(|v| pick_next(v));
    }

    Ok(view)
}

/// 所有者のアイテム一覧ビューを取得する
///
/// ビジネスルール：
/// - 所有者が存在すること
/// - last/nextとコメントはバッチクエリでアイテムIDごとに一括取得し、
///   1パスで組み立てる。アイテムN件に対してN回の往復は行わない
pub async fn items_for_owner(
    deps: &ServiceDependencies,
    owner_id: UserId,
) -> Result<Vec<ItemView>> {
    // 1. 所有者の存在確認
    let owner_exists = deps
        .user_directory
        .exists(owner_id)
        .await
        .map_err(BookingApplicationError::UserDirectoryError)?;

    if !owner_exists {
        return Err(BookingApplicationError::UserNotFound(owner_id));
    }

    // 2. アイテムとバッチ入力の取得
    let items = deps
        .item_directory
        .find_by_owner(owner_id)
        .await
        .map_err(BookingApplicationError::ItemDirectoryError)?;

    let item_ids: Vec<ItemId> = items.iter().map(|item| item.item_id).collect();
    let now = Utc::now();

    let last_map = deps
        .booking_store
        .approved_ending_before(&item_ids, now)
        .await
        .map_err(BookingApplicationError::StoreError)?;
    let next_map = deps
        .booking_store
        .approved_starting_after(&item_ids, now)
        .await
        .map_err(BookingApplicationError::StoreError)?;
    let comments_map = deps
        .comment_store
        .find_by_items(&item_ids)
        .await
        .map_err(BookingApplicationError::CommentStoreError)?;

    // 3. 1パスで組み立てる。要求者は所有者本人なのでlast/nextを常に添付する
    let mut views = Vec::with_capacity(items.len());
    for item in &items {
        let comments = comments_map
            .get(&item.item_id)
            .map(|c| c.as_slice())
            .unwrap_or_default();
        let comment_views = build_comment_views(deps, comments).await?;

        let mut view = base_view(item, comment_views);
        view.last_booking = last_map.get(&item.item_id).and_then(|v| pick_last(v));
        view.next_booking = next_map.get(&item.item_id).and_then(|v| pick_next(v));
        views.push(view);
    }

    Ok(views)
}
