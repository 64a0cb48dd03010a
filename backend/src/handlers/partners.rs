use std::collections::BTreeMap;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::constants::FAVORITES_PAGE_SIZE;
use crate::error::AppError;
use crate::handlers::auth::AuthUser;
use crate::models::{
    ConnectionStatus, ContactLink, ContactVisibility, FavoriteCategory, InteractionKind,
    PartnerCard, PartnerKind,
};
use crate::services::connect::{ConnectOutcome, SendRequestError};
use crate::services::notifier::NotificationOutcome;
use crate::services::{connect, matching, notifier};
use crate::{AppState, db};

const VALID_TABS: [&str; 3] = ["received", "sent", "favorites"];

/// These action endpoints accept an empty body; when one is present it
/// must be valid JSON.
fn parse_optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
    if body.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| AppError::BadRequest(format!("Invalid JSON body: {err}")))
}

/// GET /speaking/partners — defaults to the received tab.
pub async fn index_default(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, AppError> {
    Ok(Json(tabs_payload(&state, user_id, "received").await?))
}

/// GET /speaking/partners/{tab} — unknown tabs fall back to received.
pub async fn index(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(tab): Path<String>,
) -> Result<Json<Value>, AppError> {
    let active_tab = if VALID_TABS.contains(&tab.as_str()) {
        tab.as_str()
    } else {
        "received"
    };
    Ok(Json(tabs_payload(&state, user_id, active_tab).await?))
}

/// Build the three partner collections. Counterparts without a speaking
/// profile are skipped, matching the browse behavior elsewhere.
async fn tabs_payload(state: &AppState, user_id: i64, active_tab: &str) -> Result<Value, AppError> {
    let pool = &state.pool;

    let sent = db::connection_requests::list_sent(pool, user_id)
        .await
        .map_err(AppError::Database)?;
    let received = db::connection_requests::list_received(pool, user_id)
        .await
        .map_err(AppError::Database)?;
    let favorites = db::favorites::list_for_user(pool, user_id).await?;

    let mut counterpart_ids: Vec<i64> = sent
        .iter()
        .map(|r| r.receiver_id)
        .chain(received.iter().map(|r| r.sender_id))
        .chain(favorites.iter().map(|f| f.favorite_user_id))
        .collect();
    counterpart_ids.sort_unstable();
    counterpart_ids.dedup();

    let profiles = db::profiles::profiles_with_names_for(pool, &counterpart_ids).await?;
    let links = db::profiles::contact_links_for(pool, &counterpart_ids).await?;
    let no_links: Vec<ContactLink> = Vec::new();

    let sent_cards: Vec<PartnerCard> = sent
        .iter()
        .filter_map(|request| {
            profiles.get(&request.receiver_id).map(|p| {
                PartnerCard::project(
                    &p.profile,
                    &p.name,
                    links.get(&request.receiver_id).unwrap_or(&no_links),
                    ContactVisibility::PublicOnly,
                )
                .with_request(request, PartnerKind::SentRequest)
            })
        })
        .collect();

    let received_cards: Vec<PartnerCard> = received
        .iter()
        .filter_map(|request| {
            profiles.get(&request.sender_id).map(|p| {
                PartnerCard::project(
                    &p.profile,
                    &p.name,
                    links.get(&request.sender_id).unwrap_or(&no_links),
                    ContactVisibility::PublicOnly,
                )
                .with_request(request, PartnerKind::ReceivedRequest)
            })
        })
        .collect();

    let favorite_cards: Vec<PartnerCard> = favorites
        .iter()
        .filter_map(|favorite| {
            profiles.get(&favorite.favorite_user_id).map(|p| {
                PartnerCard::project(
                    &p.profile,
                    &p.name,
                    links.get(&favorite.favorite_user_id).unwrap_or(&no_links),
                    ContactVisibility::PublicOnly,
                )
                .with_favorite(favorite)
            })
        })
        .collect();

    Ok(json!({
        "sent_requests": sent_cards,
        "received_requests": received_cards,
        "favorites": favorite_cards,
        "active_tab": active_tab,
    }))
}

/// GET /speaking/partners/view/{partner_id}
pub async fn show(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(partner_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let partner = db::profiles::get_profile_with_name(&state.pool, partner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Speaking partner not found.".to_string()))?;

    if let Err(err) =
        db::interactions::track(&state.pool, user_id, partner_id, InteractionKind::View, None).await
    {
        tracing::warn!("failed to track view interaction: {err:#}");
    }

    let own_profile = db::profiles::get_profile(&state.pool, user_id).await?;
    let compatibility_score =
        matching::compatibility_between(own_profile.as_ref(), Some(&partner.profile));

    let is_favorited = db::favorites::is_favorited(&state.pool, user_id, partner_id).await?;
    let partner_links = db::profiles::get_contact_links(&state.pool, partner_id).await?;

    let card = PartnerCard::project(
        &partner.profile,
        &partner.name,
        &partner_links,
        ContactVisibility::PublicOnly,
    );

    Ok(Json(json!({
        "partner": card,
        "compatibility_score": compatibility_score,
        "is_favorited": is_favorited,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct FavoriteRequest {
    pub category: Option<String>,
    pub notes: Option<String>,
}

/// POST /speaking/partners/view/{partner_id}/favorite — idempotent.
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(partner_id): Path<i64>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    if user_id == partner_id {
        return Err(AppError::Validation(
            "You cannot favorite yourself.".to_string(),
        ));
    }

    let req: FavoriteRequest = parse_optional_body(&body)?;
    let category = match req.category.as_deref() {
        None => FavoriteCategory::General,
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::Validation(format!("Unknown favorite category: {raw}")))?,
    };

    if db::users::get_user_by_id(&state.pool, partner_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Speaking partner not found.".to_string()));
    }

    let inserted =
        db::favorites::add_favorite(&state.pool, user_id, partner_id, category, req.notes.as_deref())
            .await?;

    if inserted.is_some() {
        if let Err(err) = db::interactions::track(
            &state.pool,
            user_id,
            partner_id,
            InteractionKind::Favorite,
            None,
        )
        .await
        {
            tracing::warn!("failed to track favorite interaction: {err:#}");
        }
    }

    Ok(Json(json!({
        "success": true,
        "message": "Added to favorites successfully.",
    })))
}

/// DELETE /speaking/partners/view/{partner_id}/favorite — removing a
/// missing favorite still succeeds.
pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(partner_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    db::favorites::remove_favorite(&state.pool, user_id, partner_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Removed from favorites successfully.",
    })))
}

#[derive(Debug, Deserialize)]
pub struct FavoritesQuery {
    pub category: Option<String>,
    pub page: Option<i64>,
}

/// GET /speaking/favorites?category=&page= — paginated favorites joined
/// with the target profiles, plus the category picker mapping.
pub async fn favorites(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<FavoritesQuery>,
) -> Result<Json<Value>, AppError> {
    let category = match query.category.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<FavoriteCategory>()
                .map_err(|_| AppError::Validation(format!("Unknown favorite category: {raw}")))?,
        ),
    };
    let page = query.page.unwrap_or(1).max(1);

    let (rows, total) = db::favorites::list_page(&state.pool, user_id, category, page).await?;

    let target_ids: Vec<i64> = rows.iter().map(|f| f.favorite_user_id).collect();
    let profiles = db::profiles::profiles_with_names_for(&state.pool, &target_ids).await?;
    let links = db::profiles::contact_links_for(&state.pool, &target_ids).await?;
    let no_links: Vec<ContactLink> = Vec::new();

    let cards: Vec<PartnerCard> = rows
        .iter()
        .filter_map(|favorite| {
            profiles.get(&favorite.favorite_user_id).map(|p| {
                PartnerCard::project(
                    &p.profile,
                    &p.name,
                    links.get(&favorite.favorite_user_id).unwrap_or(&no_links),
                    ContactVisibility::PublicOnly,
                )
                .with_favorite(favorite)
            })
        })
        .collect();

    let categories: BTreeMap<&str, &str> =
        FavoriteCategory::available_categories().into_iter().collect();

    Ok(Json(json!({
        "favorites": cards,
        "page": page,
        "per_page": FAVORITES_PAGE_SIZE,
        "total": total,
        "category": query.category.unwrap_or_else(|| "all".to_string()),
        "categories": categories,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct ConnectRequestBody {
    pub message: Option<String>,
}

/// POST /speaking/partners/view/{partner_id}/connect
pub async fn connect_partner(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(partner_id): Path<i64>,
    body: Bytes,
) -> Result<Response, AppError> {
    let message = parse_optional_body::<ConnectRequestBody>(&body)?.message;

    match connect::send_request(&state.pool, user_id, partner_id, message).await {
        Ok(ConnectOutcome::Created(request)) => {
            // Fire the push; delivery failures never fail the request.
            let outcome =
                notifier::notify_connection_request(&state.pool, &state.push, user_id, partner_id)
                    .await;
            if let NotificationOutcome::Failed { error } = &outcome {
                tracing::warn!("connection request push failed: {error}");
            }

            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": "Connection request sent successfully!",
                    "connection": request,
                })),
            )
                .into_response())
        }
        Ok(ConnectOutcome::AutoConnected(request)) => Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Automatically connected! You both wanted to connect.",
                "auto_connected": true,
                "connection": request,
            })),
        )
            .into_response()),
        Err(SendRequestError::SelfRequest) => Err(AppError::BadRequest(
            "You cannot send a connection request to yourself.".to_string(),
        )),
        Err(SendRequestError::Duplicate(existing)) => Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Connection request already sent.",
                "connection": existing,
            })),
        )
            .into_response()),
        Err(SendRequestError::Database(err)) => Err(AppError::Database(err)),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PATCH /speaking/connections/{connection_id}/status
pub async fn update_connection_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(connection_id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let status: ConnectionStatus = req
        .status
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid status value: {}", req.status)))?;

    let connection = connect::change_status(&state.pool, connection_id, user_id, status).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Connection status updated successfully.",
        "connection": connection,
    })))
}
