use anyhow::Result;
use sqlx::PgPool;

use crate::models::InteractionKind;

/// Record a browsing action. Callers treat failures as non-fatal.
pub async fn track(
    pool: &PgPool,
    user_id: i64,
    target_user_id: i64,
    action_type: InteractionKind,
    metadata: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_interactions (user_id, target_user_id, action_type, metadata)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(target_user_id)
    .bind(action_type.as_str())
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}
