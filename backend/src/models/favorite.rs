use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Bucket a favorite is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteCategory {
    General,
    HighlyCompatible,
    Nearby,
    Recent,
    Custom,
}

impl FavoriteCategory {
    pub const ALL: [Self; 5] = [
        Self::General,
        Self::HighlyCompatible,
        Self::Nearby,
        Self::Recent,
        Self::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::HighlyCompatible => "highly_compatible",
            Self::Nearby => "nearby",
            Self::Recent => "recent",
            Self::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::HighlyCompatible => "Highly Compatible",
            Self::Nearby => "Nearby",
            Self::Recent => "Recent",
            Self::Custom => "Custom",
        }
    }

    /// Fixed value-to-label mapping for category pickers.
    pub fn available_categories() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|c| (c.as_str(), c.label())).collect()
    }
}

impl std::str::FromStr for FavoriteCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Self::General),
            "highly_compatible" => Ok(Self::HighlyCompatible),
            "nearby" => Ok(Self::Nearby),
            "recent" => Ok(Self::Recent),
            "custom" => Ok(Self::Custom),
            other => Err(format!("invalid favorite category: {other}")),
        }
    }
}

impl TryFrom<String> for FavoriteCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for FavoriteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-curated bookmark of another user, independent of connection state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub favorite_user_id: i64,
    #[sqlx(try_from = "String")]
    pub category: FavoriteCategory,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn category_labels_cover_every_variant() {
        let categories = FavoriteCategory::available_categories();
        assert_eq!(categories.len(), 5);
        assert!(categories.contains(&("general", "General")));
        assert!(categories.contains(&("highly_compatible", "Highly Compatible")));
    }

    #[test]
    fn category_parses_from_wire_values() {
        assert_eq!(
            FavoriteCategory::from_str("highly_compatible").unwrap(),
            FavoriteCategory::HighlyCompatible
        );
        assert!(FavoriteCategory::from_str("besties").is_err());
    }
}
