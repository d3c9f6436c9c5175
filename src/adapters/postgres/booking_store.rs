use crate::domain::{
    Booking, BookingFilter, BookingId, BookingParty, BookingPeriod, ItemId, Status, UserId,
};
use crate::ports::booking_store::{BookingStore as BookingStoreTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "booking_id, item_id, item_owner_id, booker_id, start_at, end_at, status, created_at, updated_at";

/// PostgreSQLの行データをBookingに変換する
///
/// ステータス文字列と期間はドメイン側の検証を通して復元する。
/// CHECK制約があるため通常は失敗しないが、失敗はデータ破損として扱う。
fn map_row_to_booking(row: &PgRow) -> Result<Booking> {
    let status_str: &str = row.get("status");
    let status = Status::from_str(status_str).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    let period = BookingPeriod::try_new(row.get("start_at"), row.get("end_at")).map_err(|e| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        )) as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(Booking {
        booking_id: BookingId::from_uuid(row.get("booking_id")),
        item_id: ItemId::from_uuid(row.get("item_id")),
        item_owner_id: UserId::from_uuid(row.get("item_owner_id")),
        booker_id: UserId::from_uuid(row.get("booker_id")),
        period,
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// 行の集合をアイテムIDごとにグループ化する
fn group_by_item(rows: Vec<PgRow>) -> Result<HashMap<ItemId, Vec<Booking>>> {
    let mut grouped: HashMap<ItemId, Vec<Booking>> = HashMap::new();
    for row in &rows {
        let booking = map_row_to_booking(row)?;
        grouped.entry(booking.item_id).or_default().push(booking);
    }
    Ok(grouped)
}

/// BookingStoreのPostgreSQL実装
///
/// クエリはすべて単文で、1操作 = 1つのread-check-write列になる。
/// ステータス遷移は`WHERE status = $from`付きUPDATEで行ロックに委ねる。
#[allow(dead_code)]
pub struct BookingStore {
    pool: PgPool,
}

#[allow(dead_code)]
impl BookingStore {
    /// PostgreSQLコネクションプールから新しいBookingStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStoreTrait for BookingStore {
    /// 予約を保存する（upsert）
    ///
    /// INSERT ... ON CONFLICT UPDATEを使用して冪等性を保証する。
    async fn save(&self, booking: &Booking) -> Result<Booking> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                booking_id,
                item_id,
                item_owner_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (booking_id)
            DO UPDATE SET
                item_id = EXCLUDED.item_id,
                item_owner_id = EXCLUDED.item_owner_id,
                booker_id = EXCLUDED.booker_id,
                start_at = EXCLUDED.start_at,
                end_at = EXCLUDED.end_at,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(booking.booking_id.value())
        .bind(booking.item_id.value())
        .bind(booking.item_owner_id.value())
        .bind(booking.booker_id.value())
        .bind(booking.period.start())
        .bind(booking.period.end())
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(booking.clone())
    }

    /// ステータスのcompare-and-set
    ///
    /// 並行更新で`WHERE status = $from`が外れた側は0行更新となり`None`を返す。
    async fn transition_status(
        &self,
        booking_id: BookingId,
        from: Status,
        to: Status,
        at: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE bookings
            SET status = $3, updated_at = $4
            WHERE booking_id = $1 AND status = $2
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking_id.value())
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = $1"
        ))
        .bind(booking_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    /// 述語に一致する予約を取得する
    ///
    /// ID条件のカラムと時間・ステータス条件を`BookingFilter`から導く。
    /// 6分類の意味はdomain::stateに定義されたものと同一でなければならない。
    async fn find_matching(
        &self,
        party: BookingParty,
        filter: BookingFilter,
    ) -> Result<Vec<Booking>> {
        let (id_column, id_value) = match party {
            BookingParty::Booker(user_id) => ("booker_id", user_id.value()),
            BookingParty::Owner(user_id) => ("item_owner_id", user_id.value()),
        };

        let rows = match filter {
            BookingFilter::Any => {
                sqlx::query(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings WHERE {id_column} = $1"
                ))
                .bind(id_value)
                .fetch_all(&self.pool)
                .await?
            }
            // 閉区間：ちょうど今終わる予約もCURRENT
            BookingFilter::Current { at } => {
                sqlx::query(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings \
                     WHERE {id_column} = $1 AND start_at <= $2 AND end_at >= $2"
                ))
                .bind(id_value)
                .bind(at)
                .fetch_all(&self.pool)
                .await?
            }
            BookingFilter::Past { before } => {
                sqlx::query(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings \
                     WHERE {id_column} = $1 AND end_at < $2"
                ))
                .bind(id_value)
                .bind(before)
                .fetch_all(&self.pool)
                .await?
            }
            BookingFilter::Future { after } => {
                sqlx::query(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings \
                     WHERE {id_column} = $1 AND start_at > $2"
                ))
                .bind(id_value)
                .bind(after)
                .fetch_all(&self.pool)
                .await?
            }
            BookingFilter::WithStatus(status) => {
                sqlx::query(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings \
                     WHERE {id_column} = $1 AND status = $2"
                ))
                .bind(id_value)
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(map_row_to_booking).collect()
    }

    async fn has_finished_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT booking_id FROM bookings
            WHERE booker_id = $1 AND item_id = $2 AND status = 'APPROVED' AND end_at < $3
            LIMIT 1
            "#,
        )
        .bind(booker_id.value())
        .bind(item_id.value())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    async fn approved_ending_before(
        &self,
        item_ids: &[ItemId],
        now: DateTime<Utc>,
    ) -> Result<HashMap<ItemId, Vec<Booking>>> {
        let ids: Vec<Uuid> = item_ids.iter().map(|id| id.value()).collect();

        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE item_id = ANY($1) AND status = 'APPROVED' AND end_at < $2"
        ))
        .bind(&ids)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        group_by_item(rows)
    }

    async fn approved_starting_after(
        &self,
        item_ids: &[ItemId],
        now: DateTime<Utc>,
    ) -> Result<HashMap<ItemId, Vec<Booking>>> {
        let ids: Vec<Uuid> = item_ids.iter().map(|id| id.value()).collect();

        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE item_id = ANY($1) AND status = 'APPROVED' AND start_at > $2"
        ))
        .bind(&ids)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        group_by_item(rows)
    }
}
