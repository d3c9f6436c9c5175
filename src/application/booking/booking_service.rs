use crate::application::deps::ServiceDependencies;
use crate::domain::{
    Booking, BookingId, BookingParty, BookingPeriod, State, Status, UserId, commands::*,
};
use chrono::Utc;

use super::access;
use super::errors::{BookingApplicationError, Result};

/// ストアの失敗から現在のステータスを特定できなかった場合の再読込ヘルパー
///
/// compare-and-setが外れたとき、呼び出し側へ返すメッセージには
/// その時点の実際のステータスを含める必要がある。
async fn reload_status(deps: &ServiceDependencies, booking_id: BookingId) -> Result<Status> {
    let booking = deps
        .booking_store
        .find_by_id(booking_id)
        .await
        .map_err(BookingApplicationError::StoreError)?
        .ok_or(BookingApplicationError::BookingNotFound(booking_id))?;

    Ok(booking.status)
}

/// 予約をリクエストする
///
/// ビジネスルール：
/// - 予約者が存在すること
/// - アイテムが存在すること
/// - 所有者は自分のアイテムを予約できないこと
/// - アイテムが予約受付中（available）であること
/// - 期間が正しい向きであること（境界層でも検証されるが、ここで再確認する）
///
/// 成功するとWAITING状態の予約が作成される。
/// 既存予約との期間重複は意図的にチェックしない。
pub async fn add_booking(deps: &ServiceDependencies, cmd: CreateBooking) -> Result<Booking> {
    // 1. 予約者の存在確認
    let booker_exists = deps
        .user_directory
        .exists(cmd.booker_id)
        .await
        .map_err(BookingApplicationError::UserDirectoryError)?;

    if !booker_exists {
        return Err(BookingApplicationError::UserNotFound(cmd.booker_id));
    }

    // 2. アイテムの存在確認
    let item = deps
        .item_directory
        .get(cmd.item_id)
        .await
        .map_err(BookingApplicationError::ItemDirectoryError)?
        .ok_or(BookingApplicationError::ItemNotFound(cmd.item_id))?;

    // 3. 所有者本人による予約の拒否
    if access::is_own_item(&item, cmd.booker_id) {
        return Err(BookingApplicationError::Validation(
            "Owner cannot be the same as booker".to_string(),
        ));
    }

    // 4. 予約受付中か
    if !item.available {
        return Err(BookingApplicationError::Validation(
            "Item is not available for booking".to_string(),
        ));
    }

    // 5. 期間の再検証
    let period = BookingPeriod::try_new(cmd.start, cmd.end)
        .map_err(|e| BookingApplicationError::Validation(e.to_string()))?;

    // 6. WAITING状態で作成して保存
    let booking = Booking::request(
        item.item_id,
        item.owner_id,
        cmd.booker_id,
        period,
        cmd.requested_at,
    );

    let saved = deps
        .booking_store
        .save(&booking)
        .await
        .map_err(BookingApplicationError::StoreError)?;

    Ok(saved)
}

/// 予約を承認または拒否する
///
/// ビジネスルール（この順でチェックする）：
/// - 予約が存在すること
/// - 行為者がアイテムの所有者であること
/// - 予約がWAITING状態であること（エラーメッセージに現ステータスを含める）
///
/// 遷移はストアのcompare-and-setで行う。並行して二重に承認された場合、
/// 後から来た側は遷移後のステータスを観測してValidationで失敗する。
pub async fn decide_booking(deps: &ServiceDependencies, cmd: DecideBooking) -> Result<Booking> {
    // 1. 予約の存在確認
    let booking = deps
        .booking_store
        .find_by_id(cmd.booking_id)
        .await
        .map_err(BookingApplicationError::StoreError)?
        .ok_or(BookingApplicationError::BookingNotFound(cmd.booking_id))?;

    // 2. 認可（所有者のみ）
    if !access::can_decide(&booking, cmd.actor_id) {
        return Err(BookingApplicationError::AccessDenied);
    }

    // 3. WAITINGであること
    if booking.status != Status::Waiting {
        return Err(BookingApplicationError::Validation(format!(
            "The booking has already been processed. Current status: {}",
            booking.status
        )));
    }

    let target = if cmd.approved {
        Status::Approved
    } else {
        Status::Rejected
    };

    // 4. アトミックな遷移。外れた場合は実際のステータスで失敗を報告する
    match deps
        .booking_store
        .transition_status(cmd.booking_id, Status::Waiting, target, cmd.decided_at)
        .await
        .map_err(BookingApplicationError::StoreError)?
    {
        Some(updated) => Ok(updated),
        None => {
            let current = reload_status(deps, cmd.booking_id).await?;
            Err(BookingApplicationError::Validation(format!(
                "The booking has already been processed. Current status: {}",
                current
            )))
        }
    }
}

/// 予約をIDで取得する
///
/// ビジネスルール：
/// - 行為者が存在すること
/// - 予約が存在すること
/// - 行為者が予約者または所有者であること
pub async fn booking_by_id(
    deps: &ServiceDependencies,
    actor_id: UserId,
    booking_id: BookingId,
) -> Result<Booking> {
    // 1. 行為者の存在確認
    let actor_exists = deps
        .user_directory
        .exists(actor_id)
        .await
        .map_err(BookingApplicationError::UserDirectoryError)?;

    if !actor_exists {
        return Err(BookingApplicationError::UserNotFound(actor_id));
    }

    // 2. 予約の存在確認
    let booking = deps
        .booking_store
        .find_by_id(booking_id)
        .await
        .map_err(BookingApplicationError::StoreError)?
        .ok_or(BookingApplicationError::BookingNotFound(booking_id))?;

    // 3. 認可（予約者または所有者）
    if !access::can_view(&booking, actor_id) {
        return Err(BookingApplicationError::AccessDenied);
    }

    Ok(booking)
}

/// 予約者としての予約一覧を取得する
pub async fn bookings_by_booker(
    deps: &ServiceDependencies,
    booker_id: UserId,
    state: State,
) -> Result<Vec<Booking>> {
    list_bookings(deps, BookingParty::Booker(booker_id), booker_id, state).await
}

/// 所有アイテムに対する予約一覧を取得する
pub async fn bookings_by_owner(
    deps: &ServiceDependencies,
    owner_id: UserId,
    state: State,
) -> Result<Vec<Booking>> {
    list_bookings(deps, BookingParty::Owner(owner_id), owner_id, state).await
}

/// 一覧取得の共通経路
///
/// 6分類の述語は`State::filter_at`が一箇所で組み立て、予約者側と
/// 所有者側の違いはID条件（`BookingParty`）だけになる。
/// 並び順（開始時刻の降順）はどのクエリ経路を通っても、取得後に
/// ここで一律に適用する横断的な事後条件である。
async fn list_bookings(
    deps: &ServiceDependencies,
    party: BookingParty,
    actor_id: UserId,
    state: State,
) -> Result<Vec<Booking>> {
    // 1. 行為者の存在確認
    let actor_exists = deps
        .user_directory
        .exists(actor_id)
        .await
        .map_err(BookingApplicationError::UserDirectoryError)?;

    if !actor_exists {
        return Err(BookingApplicationError::UserNotFound(actor_id));
    }

    // 2. (state, now) → 述語
    let filter = state.filter_at(Utc::now());

    // 3. 取得して開始時刻の降順に並べる
    let mut bookings = deps
        .booking_store
        .find_matching(party, filter)
        .await
        .map_err(BookingApplicationError::StoreError)?;

    bookings.sort_by(|a, b| b.period.start().cmp(&a.period.start()));

    Ok(bookings)
}
