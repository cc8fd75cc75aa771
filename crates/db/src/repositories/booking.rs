use crate::models::{DbBooking, DbBookingDetails};
use chrono::{NaiveDate, NaiveTime};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_confirmed_booking_ids(
    pool: &Pool<Postgres>,
    expert_id: Uuid,
    booking_date: NaiveDate,
    booking_time: NaiveTime,
) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id
        FROM bookings
        WHERE expert_id = $1 AND booking_date = $2 AND booking_time = $3 AND status = 'confirmed'
        "#,
    )
    .bind(expert_id)
    .bind(booking_date)
    .bind(booking_time)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

pub async fn get_booked_times(
    pool: &Pool<Postgres>,
    expert_id: Uuid,
    booking_date: NaiveDate,
) -> Result<Vec<NaiveTime>> {
    let times = sqlx::query_scalar::<_, NaiveTime>(
        r#"
        SELECT booking_time
        FROM bookings
        WHERE expert_id = $1 AND booking_date = $2 AND status = 'confirmed'
        "#,
    )
    .bind(expert_id)
    .bind(booking_date)
    .fetch_all(pool)
    .await?;

    Ok(times)
}

/// Inserts a confirmed booking. A concurrent confirmed booking for the same
/// slot surfaces as a unique violation on `uniq_bookings_confirmed_slot`.
pub async fn create_booking(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    expert_id: Uuid,
    service_id: i64,
    booking_date: NaiveDate,
    booking_time: NaiveTime,
) -> Result<DbBooking> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (user_id, expert_id, service_id, booking_date, booking_time, status)
        VALUES ($1, $2, $3, $4, $5, 'confirmed')
        RETURNING id, user_id, expert_id, service_id, booking_date, booking_time, status,
                  created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(expert_id)
    .bind(service_id)
    .bind(booking_date)
    .bind(booking_time)
    .fetch_one(pool)
    .await?;

    Ok(booking)
}

pub async fn cancel_booking(pool: &Pool<Postgres>, id: i64, user_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE bookings
        SET status = 'cancelled', updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_expert_bookings(
    pool: &Pool<Postgres>,
    expert_id: Uuid,
) -> Result<Vec<DbBookingDetails>> {
    let rows = sqlx::query_as::<_, DbBookingDetails>(
        r#"
        SELECT b.id, b.user_id, b.expert_id, b.service_id, b.booking_date, b.booking_time,
               b.status, b.created_at, b.updated_at,
               s.name AS service_name, u.name AS counterpart_name
        FROM bookings b
        LEFT JOIN services s ON s.id = b.service_id
        LEFT JOIN users u ON u.id = b.user_id
        WHERE b.expert_id = $1 AND b.status = 'confirmed'
        ORDER BY b.booking_date ASC, b.booking_time ASC
        "#,
    )
    .bind(expert_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_user_bookings(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Vec<DbBookingDetails>> {
    let rows = sqlx::query_as::<_, DbBookingDetails>(
        r#"
        SELECT b.id, b.user_id, b.expert_id, b.service_id, b.booking_date, b.booking_time,
               b.status, b.created_at, b.updated_at,
               s.name AS service_name, u.name AS counterpart_name
        FROM bookings b
        LEFT JOIN services s ON s.id = b.service_id
        LEFT JOIN users u ON u.id = b.expert_id
        WHERE b.user_id = $1 AND b.status = 'confirmed'
        ORDER BY b.booking_date ASC, b.booking_time ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
