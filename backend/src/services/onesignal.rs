use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

use crate::constants::{ONESIGNAL_API_URL, PUSH_NOTIFICATION_HEADING};
use crate::utils::config::PushConfig;

/// Provider outcome. Mirrors the delivery API's envelope; `success` is the
/// only field callers branch on.
#[derive(Debug, Clone)]
pub struct PushResult {
    pub success: bool,
    pub response: Option<Value>,
    pub error: Option<String>,
}

impl PushResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
        }
    }
}

/// The external push-delivery collaborator. Implementations must tolerate
/// empty token lists and convert transport failures into a failed
/// `PushResult` instead of returning an error.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send_push(&self, player_ids: &[String], message: &str, data: Value) -> PushResult;
}

/// OneSignal REST client. Credentials and the request timeout come from
/// the injected [`PushConfig`]; nothing is read from ambient state.
#[derive(Debug, Clone)]
pub struct OneSignalService {
    client: reqwest::Client,
    app_id: String,
    rest_api_key: String,
    api_url: String,
    app_url: String,
}

impl OneSignalService {
    pub fn new(push: &PushConfig, app_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(push.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            app_id: push.app_id.clone(),
            rest_api_key: push.rest_api_key.clone(),
            api_url: ONESIGNAL_API_URL.to_string(),
            app_url: app_url.trim_end_matches('/').to_string(),
        }
    }
}

/// The notification body sent to OneSignal. Clicking the push lands the
/// receiver on their partners page.
pub fn build_payload(
    app_id: &str,
    app_url: &str,
    player_ids: &[String],
    message: &str,
    data: &Value,
) -> Value {
    let mut payload = json!({
        "app_id": app_id,
        "include_player_ids": player_ids,
        "contents": { "en": message },
        "headings": { "en": PUSH_NOTIFICATION_HEADING },
        "url": format!("{app_url}/speaking/partners"),
    });

    if data.as_object().is_some_and(|m| !m.is_empty()) {
        payload["data"] = data.clone();
    }

    payload
}

#[async_trait]
impl PushSender for OneSignalService {
    async fn send_push(&self, player_ids: &[String], message: &str, data: Value) -> PushResult {
        if player_ids.is_empty() {
            return PushResult::failure("No player IDs provided");
        }

        let payload = build_payload(&self.app_id, &self.app_url, player_ids, message, &data);

        let response = self
            .client
            .post(&self.api_url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", self.rest_api_key),
            )
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                let body = resp.json::<Value>().await.ok();
                PushResult {
                    success: true,
                    response: body,
                    error: None,
                }
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                tracing::error!(
                    status = %status,
                    body = %body,
                    "OneSignal API error"
                );
                PushResult {
                    success: false,
                    response: serde_json::from_str(&body).ok(),
                    error: Some(body),
                }
            }
            Err(err) => {
                tracing::error!("OneSignal request failed: {err}");
                PushResult::failure(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_tokens_message_and_click_url() {
        let players = vec!["p1".to_string(), "p2".to_string()];
        let payload = build_payload(
            "app-123",
            "https://speakmate.example",
            &players,
            "Rima wants to connect with you for speaking practice",
            &json!({ "sender_id": 9, "type": "speaking_connection_request" }),
        );

        assert_eq!(payload["app_id"], "app-123");
        assert_eq!(payload["include_player_ids"].as_array().unwrap().len(), 2);
        assert_eq!(
            payload["contents"]["en"],
            "Rima wants to connect with you for speaking practice"
        );
        assert_eq!(payload["headings"]["en"], PUSH_NOTIFICATION_HEADING);
        assert_eq!(payload["url"], "https://speakmate.example/speaking/partners");
        assert_eq!(payload["data"]["sender_id"], 9);
    }

    #[test]
    fn empty_metadata_is_omitted_from_the_payload() {
        let players = vec!["p1".to_string()];
        let payload = build_payload("app", "https://x", &players, "hi", &json!({}));
        assert!(payload.get("data").is_none());
    }

    #[tokio::test]
    async fn empty_player_list_fails_without_a_network_call() {
        let config = PushConfig {
            app_id: "app".to_string(),
            rest_api_key: "key".to_string(),
            timeout_secs: 1,
        };
        let service = OneSignalService::new(&config, "https://x");
        let result = service.send_push(&[], "hi", json!({})).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("No player IDs provided"));
    }
}
