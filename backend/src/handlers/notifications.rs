use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::constants::{
    DEFAULT_CONNECT_MESSAGE, NO_DEVICES_ERROR, NOTIFICATION_RATE_LIMIT_PER_MINUTE,
    RATE_LIMIT_WINDOW_SECONDS,
};
use crate::error::AppError;
use crate::handlers::auth::AuthUser;
use crate::services::connect::SendRequestError;
use crate::services::notifier::NotificationOutcome;
use crate::services::{connect, notifier};
use crate::{AppState, constants, db};

// Rate limiting structure for notification sends
#[derive(Debug)]
struct NotificationRateLimiter {
    requests: HashMap<i64, Vec<Instant>>,
    max_requests_per_minute: u32,
}

impl NotificationRateLimiter {
    fn new(max_requests_per_minute: u32) -> Self {
        Self {
            requests: HashMap::new(),
            max_requests_per_minute,
        }
    }

    fn can_make_request(&mut self, sender_id: i64) -> bool {
        let now = Instant::now();
        let window_start = now - Duration::from_secs(RATE_LIMIT_WINDOW_SECONDS);

        let requests = self.requests.entry(sender_id).or_default();

        // Remove old requests
        requests.retain(|&time| time > window_start);

        if requests.len() < self.max_requests_per_minute as usize {
            requests.push(now);
            true
        } else {
            false
        }
    }
}

static NOTIFICATION_RATE_LIMITER: Lazy<Arc<Mutex<NotificationRateLimiter>>> = Lazy::new(|| {
    Arc::new(Mutex::new(NotificationRateLimiter::new(
        NOTIFICATION_RATE_LIMIT_PER_MINUTE,
    )))
});

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub player_id: String,
}

/// POST /speaking/subscribe — idempotent device registration.
pub async fn subscribe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<Value>, AppError> {
    if !constants::is_valid_player_id(&req.player_id) {
        return Err(AppError::Validation("Invalid player ID".to_string()));
    }

    let subscription =
        db::notifications::upsert_subscription(&state.pool, user_id, req.player_id.trim()).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Subscription saved successfully",
        "data": subscription,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SendNotificationRequest {
    pub target_user_id: i64,
}

/// POST /speaking/notification — push-initiated connect. Makes sure a
/// pending request exists between the pair, then dispatches a push to the
/// target's devices.
pub async fn send_notification(
    State(state): State<AppState>,
    AuthUser(sender_id): AuthUser,
    Json(req): Json<SendNotificationRequest>,
) -> Result<Response, AppError> {
    let receiver_id = req.target_user_id;

    if sender_id == receiver_id {
        return Err(AppError::BadRequest(
            "Cannot send notification to yourself".to_string(),
        ));
    }

    {
        let mut limiter = NOTIFICATION_RATE_LIMITER.lock().await;
        if !limiter.can_make_request(sender_id) {
            return Err(AppError::RateLimited(
                "Too many notification attempts. Please try again later.".to_string(),
            ));
        }
    }

    if db::users::get_user_by_id(&state.pool, receiver_id)
        .await?
        .is_none()
    {
        return Err(AppError::Validation("Invalid target user".to_string()));
    }

    // A push that can actually be delivered is always backed by a pending
    // request between the pair; the no-devices path creates nothing and
    // lets the dispatcher log the failed attempt.
    let has_devices = !db::notifications::player_ids_for(&state.pool, receiver_id)
        .await?
        .is_empty();
    if has_devices {
        let pending =
            db::connection_requests::find_pending_between(&state.pool, sender_id, receiver_id)
                .await
                .map_err(AppError::Database)?;
        if pending.is_none() {
            match connect::send_request(
                &state.pool,
                sender_id,
                receiver_id,
                Some(DEFAULT_CONNECT_MESSAGE.to_string()),
            )
            .await
            {
                Ok(_)
                | Err(SendRequestError::Duplicate(_))
                | Err(SendRequestError::SelfRequest) => {}
                Err(SendRequestError::Database(e)) => return Err(AppError::Database(e)),
            }
        }
    }

    let outcome =
        notifier::notify_connection_request(&state.pool, &state.push, sender_id, receiver_id).await;

    let response = match outcome {
        NotificationOutcome::Sent { devices } => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Notification sent successfully",
                "sent_to_devices": devices,
            })),
        ),
        NotificationOutcome::NoDevices => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "message": NO_DEVICES_ERROR,
            })),
        ),
        NotificationOutcome::Failed { error } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "message": "Failed to send notification",
                "error": error,
            })),
        ),
    };

    Ok(response.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limiter_blocks_after_the_cap() {
        let mut limiter = NotificationRateLimiter::new(2);
        assert!(limiter.can_make_request(1));
        assert!(limiter.can_make_request(1));
        assert!(!limiter.can_make_request(1));
        // A different sender has their own window.
        assert!(limiter.can_make_request(2));
    }
}
