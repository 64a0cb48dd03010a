use anyhow::Result;
use std::env;

use crate::constants::{DEFAULT_APP_URL, DEFAULT_PUSH_TIMEOUT_SECS, DEFAULT_SERVER_PORT};

/// Push-provider credentials and limits, injected into the OneSignal
/// client rather than read ambiently.
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub app_id: String,
    pub rest_api_key: String,
    pub timeout_secs: u64,
}

impl PushConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            app_id: env::var("ONESIGNAL_APP_ID")
                .map_err(|_| anyhow::anyhow!("ONESIGNAL_APP_ID must be set"))?,
            rest_api_key: env::var("ONESIGNAL_REST_API_KEY")
                .map_err(|_| anyhow::anyhow!("ONESIGNAL_REST_API_KEY must be set"))?,
            timeout_secs: env::var("PUSH_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_PUSH_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_PUSH_TIMEOUT_SECS),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub app_url: String,
    pub push: PushConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_SERVER_PORT),
            app_url: env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string()),
            push: PushConfig::from_env()?,
        })
    }
}
