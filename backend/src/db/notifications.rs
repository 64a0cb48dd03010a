use anyhow::Result;
use sqlx::PgPool;

use crate::models::{NotificationLog, NotificationStatus, PushSubscription};

/// Idempotent device registration keyed on (user, player id); a repeat
/// subscribe refreshes the row instead of duplicating it.
pub async fn upsert_subscription(
    pool: &PgPool,
    user_id: i64,
    player_id: &str,
) -> Result<PushSubscription> {
    let subscription = sqlx::query_as::<_, PushSubscription>(
        r#"
        INSERT INTO speaking_push_subscriptions (user_id, player_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, player_id) DO UPDATE SET updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(player_id)
    .fetch_one(pool)
    .await?;

    Ok(subscription)
}

pub async fn player_ids_for(pool: &PgPool, user_id: i64) -> Result<Vec<String>> {
    let player_ids = sqlx::query_scalar::<_, String>(
        r#"
        SELECT player_id
        FROM speaking_push_subscriptions
        WHERE user_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(player_ids)
}

/// Append one audit row. Rows are never updated afterwards.
pub async fn insert_log(
    pool: &PgPool,
    sender_id: i64,
    receiver_id: i64,
    player_ids_sent: &[String],
    status: NotificationStatus,
    error_message: Option<&str>,
) -> Result<NotificationLog> {
    let log = sqlx::query_as::<_, NotificationLog>(
        r#"
        INSERT INTO speaking_notification_logs
            (sender_id, receiver_id, player_ids_sent, status, error_message)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(sender_id)
    .bind(receiver_id)
    .bind(player_ids_sent)
    .bind(status.as_str())
    .bind(error_message)
    .fetch_one(pool)
    .await?;

    Ok(log)
}

/// Sender/receiver pairs whose most recent dispatch inside the window
/// failed. Used by the out-of-band notification checker.
pub async fn recent_failed_pairs(pool: &PgPool, window_hours: i64) -> Result<Vec<(i64, i64)>> {
    let pairs = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT sender_id, receiver_id
        FROM (
            SELECT DISTINCT ON (sender_id, receiver_id)
                sender_id, receiver_id, status
            FROM speaking_notification_logs
            WHERE created_at > NOW() - make_interval(hours => $1::INT)
            ORDER BY sender_id, receiver_id, created_at DESC
        ) latest
        WHERE status = 'failed'
        "#,
    )
    .bind(window_hours)
    .fetch_all(pool)
    .await?;

    Ok(pairs)
}
