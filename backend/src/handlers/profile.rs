use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::handlers::auth::AuthUser;
use crate::models::{CONTACT_PLATFORMS, ProfileUpdate};
use crate::services::completion;
use crate::{AppState, db};

/// GET /speaking/profile — the owner's profile, contact links and
/// completion report. A user without a profile gets nulls, not a 404.
pub async fn show_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, AppError> {
    let profile = db::profiles::get_profile(&state.pool, user_id).await?;
    let contact_links = db::profiles::get_contact_links(&state.pool, user_id).await?;

    let completion = profile
        .as_ref()
        .map(|p| completion::profile_completion(p, &contact_links));

    Ok(Json(json!({
        "profile": profile,
        "contact_links": contact_links,
        "completion": completion,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ProfilePayload {
    #[serde(flatten)]
    pub fields: ProfileUpdate,
    pub contact_links: Option<BTreeMap<String, String>>,
}

/// POST /speaking/profile — partial upsert. Fields that are not sent keep
/// their stored values; contact links, when present, are replaced
/// wholesale.
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfilePayload>,
) -> Result<Json<Value>, AppError> {
    if let Some(links) = &payload.contact_links {
        for platform in links.keys() {
            if !CONTACT_PLATFORMS.contains(&platform.as_str()) {
                return Err(AppError::Validation(format!(
                    "Unknown contact platform: {platform}"
                )));
            }
        }
    }

    let profile = db::profiles::upsert_profile(&state.pool, user_id, &payload.fields).await?;

    if let Some(links) = payload.contact_links {
        let entries: Vec<(String, String)> = links
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();
        db::profiles::replace_contact_links(&state.pool, user_id, &entries).await?;
    }

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully.",
        "profile": profile,
    })))
}

#[derive(Debug, Deserialize)]
pub struct PresenceRequest {
    pub is_online: Option<bool>,
    pub is_available: Option<bool>,
}

/// PATCH /speaking/profile/status — stamps last_active_at; a missing
/// profile is a quiet no-op, as on the original status endpoint.
pub async fn update_presence(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<PresenceRequest>,
) -> Result<Json<Value>, AppError> {
    let profile =
        db::profiles::update_presence(&state.pool, user_id, req.is_online, req.is_available)
            .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Status updated successfully.",
        "profile": profile,
    })))
}
