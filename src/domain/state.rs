#![allow(dead_code)]

use chrono::{DateTime, Utc};

use super::booking::{Booking, Status};

/// クエリ分類（State）
///
/// 一覧取得専用の導出タグであり、保存されることはない。
/// `Status`（永続化されるライフサイクル値）と混同しないこと。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::All => "ALL",
            State::Current => "CURRENT",
            State::Past => "PAST",
            State::Future => "FUTURE",
            State::Waiting => "WAITING",
            State::Rejected => "REJECTED",
        }
    }

    /// (state, now) から述語を構築する
    ///
    /// 6分類のポリシーはここにのみ存在する。予約者側・所有者側の
    /// どちらのクエリでも同じ述語が適用され、違いはID条件だけである。
    pub fn filter_at(self, now: DateTime<Utc>) -> BookingFilter {
        match self {
            State::All => BookingFilter::Any,
            State::Current => BookingFilter::Current { at: now },
            State::Past => BookingFilter::Past { before: now },
            State::Future => BookingFilter::Future { after: now },
            State::Waiting => BookingFilter::WithStatus(Status::Waiting),
            State::Rejected => BookingFilter::WithStatus(Status::Rejected),
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for State {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(State::All),
            "CURRENT" => Ok(State::Current),
            "PAST" => Ok(State::Past),
            "FUTURE" => Ok(State::Future),
            "WAITING" => Ok(State::Waiting),
            "REJECTED" => Ok(State::Rejected),
            _ => Err(format!("Unknown state: {}", s)),
        }
    }
}

/// クエリ側の述語（誰に対して絞るか）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingParty {
    /// 予約者IDで絞る
    Booker(crate::domain::UserId),
    /// アイテム所有者IDで絞る
    Owner(crate::domain::UserId),
}

impl BookingParty {
    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            BookingParty::Booker(id) => booking.booker_id == *id,
            BookingParty::Owner(id) => booking.item_owner_id == *id,
        }
    }
}

/// 時間・ステータス述語
///
/// ストア実装（インメモリ／PostgreSQL）はどちらもこの値を解釈する。
/// 片方にだけ条件を足すような実装は不可。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingFilter {
    /// 絞り込みなし
    Any,
    /// start <= at <= end（両端を含む閉区間）
    Current { at: DateTime<Utc> },
    /// end < before（厳密）
    Past { before: DateTime<Utc> },
    /// start > after（厳密）
    Future { after: DateTime<Utc> },
    /// ステータス一致。時間条件は無視する
    WithStatus(Status),
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            BookingFilter::Any => true,
            BookingFilter::Current { at } => booking.period.covers(*at),
            BookingFilter::Past { before } => booking.period.ends_before(*before),
            BookingFilter::Future { after } => booking.period.starts_after(*after),
            BookingFilter::WithStatus(status) => booking.status == *status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingPeriod, ItemId, UserId};
    use chrono::Duration;

    fn booking_with_window(
        start_offset: Duration,
        end_offset: Duration,
        status: Status,
        now: DateTime<Utc>,
    ) -> Booking {
        let period = BookingPeriod::try_new(now + start_offset, now + end_offset).unwrap();
        let mut booking = Booking::request(ItemId::new(), UserId::new(), UserId::new(), period, now);
        booking.status = status;
        booking
    }

    #[test]
    fn test_state_parse_round_trip() {
        for state in [
            State::All,
            State::Current,
            State::Past,
            State::Future,
            State::Waiting,
            State::Rejected,
        ] {
            let parsed: State = state.as_str().parse().unwrap();
            assert_eq!(parsed, state);
        }
    }

    #[test]
    fn test_state_parse_unknown_fails() {
        let err = "SOMETIMES".parse::<State>().unwrap_err();
        assert!(err.contains("Unknown state"));
    }

    #[test]
    fn test_all_matches_everything() {
        let now = Utc::now();
        let filter = State::All.filter_at(now);
        let b = booking_with_window(
            Duration::days(-2),
            Duration::days(-1),
            Status::Rejected,
            now,
        );
        assert!(filter.matches(&b));
    }

    #[test]
    fn test_current_includes_both_boundaries() {
        let now = Utc::now();
        let filter = State::Current.filter_at(now);

        // ちょうど今終わる予約も今始まる予約も CURRENT
        let ending_now = booking_with_window(
            Duration::days(-1),
            Duration::zero(),
            Status::Approved,
            now,
        );
        assert!(filter.matches(&ending_now));

        let starting_now =
            booking_with_window(Duration::zero(), Duration::days(1), Status::Approved, now);
        assert!(filter.matches(&starting_now));
    }

    #[test]
    fn test_past_and_future_are_strict() {
        let now = Utc::now();

        let ending_now = booking_with_window(
            Duration::days(-1),
            Duration::zero(),
            Status::Approved,
            now,
        );
        assert!(!State::Past.filter_at(now).matches(&ending_now));

        let starting_now =
            booking_with_window(Duration::zero(), Duration::days(1), Status::Approved, now);
        assert!(!State::Future.filter_at(now).matches(&starting_now));

        let past = booking_with_window(
            Duration::days(-2),
            Duration::days(-1),
            Status::Approved,
            now,
        );
        assert!(State::Past.filter_at(now).matches(&past));
        assert!(!State::Future.filter_at(now).matches(&past));
        assert!(!State::Current.filter_at(now).matches(&past));

        let future =
            booking_with_window(Duration::days(1), Duration::days(2), Status::Approved, now);
        assert!(State::Future.filter_at(now).matches(&future));
        assert!(!State::Past.filter_at(now).matches(&future));
    }

    #[test]
    fn test_status_filters_ignore_time() {
        let now = Utc::now();

        // 過去の承認待ち予約はWAITINGフィルタに一致し、時間条件は見ない
        let past_waiting = booking_with_window(
            Duration::days(-2),
            Duration::days(-1),
            Status::Waiting,
            now,
        );
        assert!(State::Waiting.filter_at(now).matches(&past_waiting));
        assert!(!State::Rejected.filter_at(now).matches(&past_waiting));

        let future_rejected =
            booking_with_window(Duration::days(1), Duration::days(2), Status::Rejected, now);
        assert!(State::Rejected.filter_at(now).matches(&future_rejected));
    }

    #[test]
    fn test_party_predicates() {
        let now = Utc::now();
        let booker = UserId::new();
        let owner = UserId::new();
        let period =
            BookingPeriod::try_new(now + Duration::days(1), now + Duration::days(2)).unwrap();
        let booking = Booking::request(ItemId::new(), owner, booker, period, now);

        assert!(BookingParty::Booker(booker).matches(&booking));
        assert!(!BookingParty::Booker(owner).matches(&booking));
        assert!(BookingParty::Owner(owner).matches(&booking));
        assert!(!BookingParty::Owner(booker).matches(&booking));
    }
}
