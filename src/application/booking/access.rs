use crate::domain::{Booking, UserId};
use crate::ports::ItemRecord;

/// 認可ガード
///
/// すべてのライフサイクル操作を行為者の関係性で制限する純粋関数群。
/// 関係は「予約者」「所有者」「どちらでもない」の3通りしかない。

/// 承認・拒否できるか：行為者がアイテムの所有者であること
///
/// ステータスには関知しない。WAITING以外の再処理の拒否は
/// 別のルール（ライフサイクル側）が担う。
pub fn can_decide(booking: &Booking, actor_id: UserId) -> bool {
    booking.item_owner_id == actor_id
}

/// 閲覧できるか：行為者が予約者または所有者であること
pub fn can_view(booking: &Booking, actor_id: UserId) -> bool {
    booking.booker_id == actor_id || booking.item_owner_id == actor_id
}

/// 自分のアイテムか：所有者は自分のアイテムを予約できない
pub fn is_own_item(item: &ItemRecord, actor_id: UserId) -> bool {
    item.owner_id == actor_id
}
