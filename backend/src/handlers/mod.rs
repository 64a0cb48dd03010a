pub mod auth;
pub mod notifications;
pub mod partners;
pub mod profile;

pub use auth::AuthUser;

use axum::Router;
use axum::routing::{get, patch, post};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Push subscriptions and push-initiated connects
        .route("/speaking/subscribe", post(notifications::subscribe))
        .route("/speaking/notification", post(notifications::send_notification))
        // Own profile
        .route(
            "/speaking/profile",
            get(profile::show_profile).post(profile::update_profile),
        )
        .route("/speaking/profile/status", patch(profile::update_presence))
        // Partner tabs
        .route("/speaking/partners", get(partners::index_default))
        .route("/speaking/partners/{tab}", get(partners::index))
        // Partner detail and actions
        .route("/speaking/partners/view/{partner_id}", get(partners::show))
        .route(
            "/speaking/partners/view/{partner_id}/favorite",
            post(partners::add_favorite).delete(partners::remove_favorite),
        )
        .route(
            "/speaking/partners/view/{partner_id}/connect",
            post(partners::connect_partner),
        )
        .route(
            "/speaking/connections/{connection_id}/status",
            patch(partners::update_connection_status),
        )
        // Paginated favorites
        .route("/speaking/favorites", get(partners::favorites))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
