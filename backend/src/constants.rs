// =============================================================================
// Speakmate Backend Constants
// =============================================================================
// This file contains all constants used throughout the backend to enable
// easy tuning and configuration from a single location.

// =============================================================================
// COMPATIBILITY SCORING
// =============================================================================

/// Points for an exact purpose-of-practice match
pub const PURPOSE_MATCH_POINTS: i32 = 30;

/// Points for an exact city match
pub const CITY_MATCH_POINTS: i32 = 25;

/// Points for an exact district match when the cities differ
pub const DISTRICT_MATCH_POINTS: i32 = 15;

/// Points for an exact skill-level match
pub const SKILL_MATCH_POINTS: i32 = 20;

/// Points per shared interest
pub const INTEREST_POINTS_EACH: i32 = 3;

/// Cap on points earned from shared interests
pub const INTEREST_POINTS_CAP: i32 = 15;

/// Points when both expected scores are present and equal
pub const EXPECTED_SCORE_MATCH_POINTS: i32 = 10;

/// Upper bound on the total compatibility score
pub const MAX_COMPATIBILITY_SCORE: i32 = 100;

// =============================================================================
// PROFILE COMPLETION POINTS
// =============================================================================

pub const COMPLETION_BASIC_INFO_POINTS: i32 = 20;
pub const COMPLETION_EDUCATION_LOCATION_POINTS: i32 = 15;
pub const COMPLETION_CONTACT_INFO_POINTS: i32 = 10;
pub const COMPLETION_INTERESTS_POINTS: i32 = 5;
pub const COMPLETION_PROFILE_PICTURE_POINTS: i32 = 10;

/// Highest value as the voice intro is the USP
pub const COMPLETION_VOICE_INTRO_POINTS: i32 = 25;
pub const COMPLETION_YOUTUBE_VIDEO_POINTS: i32 = 5;

// =============================================================================
// PAGINATION
// =============================================================================

/// Page size for favorites listings
pub const FAVORITES_PAGE_SIZE: i64 = 12;

// =============================================================================
// PUSH NOTIFICATIONS
// =============================================================================

/// OneSignal REST endpoint for creating notifications
pub const ONESIGNAL_API_URL: &str = "https://onesignal.com/api/v1/notifications";

/// Heading shown on connection-request push notifications
pub const PUSH_NOTIFICATION_HEADING: &str = "Speaking Practice Request";

/// Metadata type tag attached to connection-request pushes
pub const PUSH_CONNECTION_REQUEST_TYPE: &str = "speaking_connection_request";

/// Stock message stored on requests created through the notification flow
pub const DEFAULT_CONNECT_MESSAGE: &str =
    "I want to practice english speaking with you.. please accept connection request";

/// Log error recorded when the receiver has no registered devices
pub const NO_DEVICES_ERROR: &str = "User has not enabled notifications";

/// Timeout for calls to the push provider if not configured
pub const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 10;

/// Maximum accepted length of a OneSignal player id
pub const MAX_PLAYER_ID_LENGTH: usize = 255;

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Maximum notification sends per sender per window
pub const NOTIFICATION_RATE_LIMIT_PER_MINUTE: u32 = 10;

/// Rate limit window duration in seconds
pub const RATE_LIMIT_WINDOW_SECONDS: u64 = 60;

// =============================================================================
// NOTIFICATION CHECKER CONFIGURATION
// =============================================================================

/// How often the notification checker scans for failed deliveries
pub const NOTIFICATION_CHECKER_INTERVAL_SECS: u64 = 300;

/// How far back the notification checker looks for failed deliveries
pub const NOTIFICATION_RETRY_WINDOW_HOURS: i64 = 24;

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Default server port if not specified in environment
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default public URL used as the click-through target on pushes
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";

// =============================================================================
// HELPER FUNCTIONS FOR VALIDATION
// =============================================================================

/// Validates a OneSignal player id: non-blank and within the column limit
pub fn is_valid_player_id(player_id: &str) -> bool {
    let trimmed = player_id.trim();
    !trimmed.is_empty() && trimmed.len() <= MAX_PLAYER_ID_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_validation() {
        assert!(is_valid_player_id("abc-123"));
        assert!(!is_valid_player_id(""));
        assert!(!is_valid_player_id("   "));
        assert!(!is_valid_player_id(&"x".repeat(MAX_PLAYER_ID_LENGTH + 1)));
    }
}
