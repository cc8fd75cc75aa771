use crate::models::{DbService, DbServiceWithExpert};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn list_active_services(pool: &Pool<Postgres>) -> Result<Vec<DbServiceWithExpert>> {
    let services = sqlx::query_as::<_, DbServiceWithExpert>(
        r#"
        SELECT s.id, s.expert_id, s.name, s.price, s.duration, s.description,
               s.is_active, s.created_at, s.updated_at, u.name AS expert_name
        FROM services s
        LEFT JOIN users u ON u.id = s.expert_id
        WHERE s.is_active = TRUE
        ORDER BY s.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(services)
}

pub async fn list_expert_services(
    pool: &Pool<Postgres>,
    expert_id: Uuid,
) -> Result<Vec<DbService>> {
    let services = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, expert_id, name, price, duration, description, is_active, created_at, updated_at
        FROM services
        WHERE expert_id = $1 AND is_active = TRUE
        ORDER BY created_at DESC
        "#,
    )
    .bind(expert_id)
    .fetch_all(pool)
    .await?;

    Ok(services)
}

pub async fn get_service_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, expert_id, name, price, duration, description, is_active, created_at, updated_at
        FROM services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn create_service(
    pool: &Pool<Postgres>,
    expert_id: Uuid,
    name: &str,
    price: f64,
    duration: i32,
    description: Option<&str>,
) -> Result<DbService> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        INSERT INTO services (expert_id, name, price, duration, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, expert_id, name, price, duration, description, is_active,
                  created_at, updated_at
        "#,
    )
    .bind(expert_id)
    .bind(name)
    .bind(price)
    .bind(duration)
    .bind(description)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Service created: id={}, expert_id={}", service.id, expert_id);
    Ok(service)
}

/// Updates a service owned by `expert_id`. `None` when nothing matched.
pub async fn update_service(
    pool: &Pool<Postgres>,
    id: i64,
    expert_id: Uuid,
    name: &str,
    price: f64,
    duration: i32,
    description: Option<&str>,
) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        UPDATE services
        SET name = $3, price = $4, duration = $5, description = $6, updated_at = NOW()
        WHERE id = $1 AND expert_id = $2
        RETURNING id, expert_id, name, price, duration, description, is_active,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(expert_id)
    .bind(name)
    .bind(price)
    .bind(duration)
    .bind(description)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn deactivate_service(pool: &Pool<Postgres>, id: i64, expert_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE services
        SET is_active = FALSE, updated_at = NOW()
        WHERE id = $1 AND expert_id = $2
        "#,
    )
    .bind(id)
    .bind(expert_id)
    .execute(pool)
    .await?;

    Ok(())
}
