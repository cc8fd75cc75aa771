use crate::models::DbAvailability;
use chrono::NaiveTime;
use eyre::Result;
use slotbook_core::models::availability::AvailabilityWindow;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

pub async fn get_availability_by_expert(
    pool: &Pool<Postgres>,
    expert_id: Uuid,
) -> Result<Vec<DbAvailability>> {
    let rows = sqlx::query_as::<_, DbAvailability>(
        r#"
        SELECT id, expert_id, day_of_week, start_time, end_time, created_at, updated_at
        FROM availability
        WHERE expert_id = $1
        ORDER BY day_of_week ASC, start_time ASC
        "#,
    )
    .bind(expert_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Windows of one weekday, in insertion order.
pub async fn get_availability_for_day(
    pool: &Pool<Postgres>,
    expert_id: Uuid,
    day_of_week: i16,
) -> Result<Vec<DbAvailability>> {
    let rows = sqlx::query_as::<_, DbAvailability>(
        r#"
        SELECT id, expert_id, day_of_week, start_time, end_time, created_at, updated_at
        FROM availability
        WHERE expert_id = $1 AND day_of_week = $2
        ORDER BY id ASC
        "#,
    )
    .bind(expert_id)
    .bind(day_of_week)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn delete_availability_by_expert(
    conn: &mut PgConnection,
    expert_id: Uuid,
) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM availability
        WHERE expert_id = $1
        "#,
    )
    .bind(expert_id)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn create_availability(
    conn: &mut PgConnection,
    expert_id: Uuid,
    day_of_week: i16,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<DbAvailability> {
    let row = sqlx::query_as::<_, DbAvailability>(
        r#"
        INSERT INTO availability (expert_id, day_of_week, start_time, end_time)
        VALUES ($1, $2, $3, $4)
        RETURNING id, expert_id, day_of_week, start_time, end_time, created_at, updated_at
        "#,
    )
    .bind(expert_id)
    .bind(day_of_week)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(conn)
    .await?;

    Ok(row)
}

/// Swaps all of an expert's windows for `windows` in one transaction, so a
/// failing insert leaves the previous set in place.
pub async fn replace_availability(
    pool: &Pool<Postgres>,
    expert_id: Uuid,
    windows: &[AvailabilityWindow],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    delete_availability_by_expert(&mut tx, expert_id).await?;
    for window in windows {
        create_availability(
            &mut tx,
            expert_id,
            window.day_of_week,
            window.start_time.into(),
            window.end_time.into(),
        )
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
