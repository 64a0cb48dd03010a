use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Kind of browsing action tracked for audit/analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    View,
    Favorite,
    Message,
    Block,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Favorite => "favorite",
            Self::Message => "message",
            Self::Block => "block",
        }
    }
}

impl std::str::FromStr for InteractionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Self::View),
            "favorite" => Ok(Self::Favorite),
            "message" => Ok(Self::Message),
            "block" => Ok(Self::Block),
            other => Err(format!("invalid interaction kind: {other}")),
        }
    }
}

impl TryFrom<String> for InteractionKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Fire-and-forget record of one user acting on another's profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserInteraction {
    pub id: i64,
    pub user_id: i64,
    pub target_user_id: i64,
    #[sqlx(try_from = "String")]
    pub action_type: InteractionKind,
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
