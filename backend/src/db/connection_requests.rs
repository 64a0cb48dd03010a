use sqlx::PgPool;
use sqlx::postgres::PgExecutor;

use crate::models::{ConnectionRequest, ConnectionStatus};

/// Serializes request writes for an unordered user pair. Two opposite
/// `send_request` calls must not both pass the existence checks before
/// either commits (the mutual-connect race); the advisory lock is taken
/// inside the surrounding transaction and released with it.
pub async fn lock_pair<'e>(executor: impl PgExecutor<'e>, a: i64, b: i64) -> sqlx::Result<()> {
    let key = format!("speaking_connect:{}:{}", a.min(b), a.max(b));
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(key)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn get_request<'e>(
    executor: impl PgExecutor<'e>,
    request_id: i64,
) -> sqlx::Result<Option<ConnectionRequest>> {
    sqlx::query_as::<_, ConnectionRequest>(
        r#"
        SELECT *
        FROM speaking_connection_requests
        WHERE id = $1
        "#,
    )
    .bind(request_id)
    .fetch_optional(executor)
    .await
}

/// The request from `sender_id` to `receiver_id`, whatever its status.
pub async fn get_directional<'e>(
    executor: impl PgExecutor<'e>,
    sender_id: i64,
    receiver_id: i64,
) -> sqlx::Result<Option<ConnectionRequest>> {
    sqlx::query_as::<_, ConnectionRequest>(
        r#"
        SELECT *
        FROM speaking_connection_requests
        WHERE sender_id = $1 AND receiver_id = $2
        "#,
    )
    .bind(sender_id)
    .bind(receiver_id)
    .fetch_optional(executor)
    .await
}

/// The pending request between the two users in either direction, if any.
pub async fn find_pending_between(
    pool: &PgPool,
    user_a: i64,
    user_b: i64,
) -> sqlx::Result<Option<ConnectionRequest>> {
    sqlx::query_as::<_, ConnectionRequest>(
        r#"
        SELECT *
        FROM speaking_connection_requests
        WHERE ((sender_id = $1 AND receiver_id = $2)
            OR (sender_id = $2 AND receiver_id = $1))
          AND status = 'pending'
        LIMIT 1
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .fetch_optional(pool)
    .await
}

pub async fn insert_request<'e>(
    executor: impl PgExecutor<'e>,
    sender_id: i64,
    receiver_id: i64,
    message: Option<&str>,
) -> sqlx::Result<ConnectionRequest> {
    sqlx::query_as::<_, ConnectionRequest>(
        r#"
        INSERT INTO speaking_connection_requests (sender_id, receiver_id, status, message)
        VALUES ($1, $2, 'pending', $3)
        RETURNING *
        "#,
    )
    .bind(sender_id)
    .bind(receiver_id)
    .bind(message)
    .fetch_one(executor)
    .await
}

pub async fn set_status<'e>(
    executor: impl PgExecutor<'e>,
    request_id: i64,
    status: ConnectionStatus,
) -> sqlx::Result<Option<ConnectionRequest>> {
    sqlx::query_as::<_, ConnectionRequest>(
        r#"
        UPDATE speaking_connection_requests
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(request_id)
    .bind(status.as_str())
    .fetch_optional(executor)
    .await
}

pub async fn list_sent(pool: &PgPool, user_id: i64) -> sqlx::Result<Vec<ConnectionRequest>> {
    sqlx::query_as::<_, ConnectionRequest>(
        r#"
        SELECT *
        FROM speaking_connection_requests
        WHERE sender_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn list_received(pool: &PgPool, user_id: i64) -> sqlx::Result<Vec<ConnectionRequest>> {
    sqlx::query_as::<_, ConnectionRequest>(
        r#"
        SELECT *
        FROM speaking_connection_requests
        WHERE receiver_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
