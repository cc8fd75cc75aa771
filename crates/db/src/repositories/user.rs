use crate::models::DbUser;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_user_role(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Option<String>> {
    let role = sqlx::query_scalar::<_, String>(
        r#"
        SELECT role
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(role)
}

pub async fn upsert_user(
    pool: &Pool<Postgres>,
    id: Uuid,
    email: &str,
    name: &str,
    role: &str,
) -> Result<DbUser> {
    tracing::debug!("Upserting user: id={}, role={}", id, role);

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, email, name, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO UPDATE
        SET email = EXCLUDED.email,
            name = EXCLUDED.name,
            role = EXCLUDED.role,
            updated_at = NOW()
        RETURNING id, email, name, role, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(name)
    .bind(role)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn create_expert_profile_if_missing(pool: &Pool<Postgres>, user_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO expert_profiles (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}
