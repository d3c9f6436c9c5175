use crate::domain::{
    Booking, BookingFilter, BookingId, BookingParty, ItemId, Status, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 予約ストアポート
///
/// 唯一の正となる予約の永続化窓口。グローバルな可変状態は持たず、
/// デプロイ形態ごとに実装が1つ入る（本番はPostgreSQL、テストはインメモリ）。
#[allow(dead_code)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// 予約を保存する（insertまたはupdate）
    ///
    /// 同一`booking_id`が既にあれば全フィールドを上書きする（upsert）。
    async fn save(&self, booking: &Booking) -> Result<Booking>;

    /// ステータスを`from`から`to`へアトミックに遷移させる
    ///
    /// 現在のステータスが`from`と一致する場合のみ更新し、更新後の予約を返す。
    /// 一致しない、または予約が存在しない場合は`None`。
    /// 同じ予約への並行承認で両方が成功することはない、という
    /// 終端状態の不変条件はこのcompare-and-setが支える。
    async fn transition_status(
        &self,
        booking_id: BookingId,
        from: Status,
        to: Status,
        at: DateTime<Utc>,
    ) -> Result<Option<Booking>>;

    /// IDで予約を取得する
    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>>;

    /// 述語に一致する予約を取得する
    ///
    /// `party`がID条件（予約者／所有者）、`filter`が時間・ステータス条件。
    /// 返却順序は未規定。一覧の並び替えはアプリケーション層の責務。
    async fn find_matching(
        &self,
        party: BookingParty,
        filter: BookingFilter,
    ) -> Result<Vec<Booking>>;

    /// 指定ユーザーが指定アイテムで完了済みのAPPROVED予約を持つか
    ///
    /// コメント投稿資格（過去に借りたことがあるか）の判定に使用される。
    async fn has_finished_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<bool>;

    /// `now`より前に終了したAPPROVED予約をアイテムIDごとにまとめて取得する
    ///
    /// 「直近の予約（last）」計算のバッチ入力。N件のアイテムに対して
    /// N回の問い合わせを行わないための一括クエリ。グループ内の順序は未規定。
    async fn approved_ending_before(
        &self,
        item_ids: &[ItemId],
        now: DateTime<Utc>,
    ) -> Result<HashMap<ItemId, Vec<Booking>>>;

    /// `now`より後に開始するAPPROVED予約をアイテムIDごとにまとめて取得する
    ///
    /// 「次の予約（next）」計算のバッチ入力。
    async fn approved_starting_after(
        &self,
        item_ids: &[ItemId],
        now: DateTime<Utc>,
    ) -> Result<HashMap<ItemId, Vec<Booking>>>;
}
