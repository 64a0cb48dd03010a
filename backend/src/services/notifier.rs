use serde_json::json;
use sqlx::PgPool;

use crate::constants::{NO_DEVICES_ERROR, PUSH_CONNECTION_REQUEST_TYPE};
use crate::db;
use crate::models::NotificationStatus;
use crate::services::onesignal::{PushResult, PushSender};

/// The three ways a dispatch can end. All of them are normal returns;
/// this component never propagates an error to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Sent { devices: usize },
    NoDevices,
    Failed { error: String },
}

/// Push body naming the sender.
pub fn connect_message(sender_name: &str) -> String {
    format!("{sender_name} wants to connect with you for speaking practice")
}

/// Audit status for a provider result.
pub fn log_status(result: &PushResult) -> (NotificationStatus, Option<String>) {
    if result.success {
        (NotificationStatus::Success, None)
    } else {
        let error = result
            .error
            .clone()
            .unwrap_or_else(|| "Push provider rejected the request".to_string());
        (NotificationStatus::Failed, Some(error))
    }
}

/// Resolve the receiver's devices, call the provider, and append exactly
/// one log row for the attempt. Internal faults are logged as failed
/// attempts and folded into a `Failed` outcome.
pub async fn notify_connection_request<P: PushSender>(
    pool: &PgPool,
    push: &P,
    sender_id: i64,
    receiver_id: i64,
) -> NotificationOutcome {
    match try_dispatch(pool, push, sender_id, receiver_id).await {
        Ok(outcome) => outcome,
        Err(err) => {
            let message = format!("{err:#}");
            tracing::error!(
                sender_id,
                receiver_id,
                "notification dispatch failed: {message}"
            );
            if let Err(log_err) = db::notifications::insert_log(
                pool,
                sender_id,
                receiver_id,
                &[],
                NotificationStatus::Failed,
                Some(&message),
            )
            .await
            {
                tracing::error!("failed to record notification log: {log_err:#}");
            }
            NotificationOutcome::Failed { error: message }
        }
    }
}

async fn try_dispatch<P: PushSender>(
    pool: &PgPool,
    push: &P,
    sender_id: i64,
    receiver_id: i64,
) -> anyhow::Result<NotificationOutcome> {
    let sender = db::users::get_user_by_id(pool, sender_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("sender {sender_id} not found"))?;

    let player_ids = db::notifications::player_ids_for(pool, receiver_id).await?;

    if player_ids.is_empty() {
        db::notifications::insert_log(
            pool,
            sender_id,
            receiver_id,
            &[],
            NotificationStatus::Failed,
            Some(NO_DEVICES_ERROR),
        )
        .await?;
        return Ok(NotificationOutcome::NoDevices);
    }

    let message = connect_message(&sender.name);
    let data = json!({
        "sender_id": sender_id,
        "type": PUSH_CONNECTION_REQUEST_TYPE,
    });

    let result = push.send_push(&player_ids, &message, data).await;
    let (status, error) = log_status(&result);

    db::notifications::insert_log(
        pool,
        sender_id,
        receiver_id,
        &player_ids,
        status,
        error.as_deref(),
    )
    .await?;

    Ok(match status {
        NotificationStatus::Success => NotificationOutcome::Sent {
            devices: player_ids.len(),
        },
        NotificationStatus::Failed => NotificationOutcome::Failed {
            error: error.unwrap_or_else(|| "Push provider rejected the request".to_string()),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn message_names_the_sender() {
        assert_eq!(
            connect_message("Rima"),
            "Rima wants to connect with you for speaking practice"
        );
    }

    #[test]
    fn provider_success_logs_success_with_no_error() {
        let result = PushResult {
            success: true,
            response: Some(Value::Null),
            error: None,
        };
        assert_eq!(log_status(&result), (NotificationStatus::Success, None));
    }

    #[test]
    fn provider_failure_keeps_its_error_text() {
        let result = PushResult::failure("invalid player ids");
        let (status, error) = log_status(&result);
        assert_eq!(status, NotificationStatus::Failed);
        assert_eq!(error.as_deref(), Some("invalid player ids"));
    }

    #[test]
    fn provider_failure_without_detail_gets_a_stock_error() {
        let result = PushResult {
            success: false,
            response: None,
            error: None,
        };
        let (_, error) = log_status(&result);
        assert_eq!(error.as_deref(), Some("Push provider rejected the request"));
    }
}
