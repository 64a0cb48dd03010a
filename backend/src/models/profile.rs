use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Why the user is practicing. Stored as text, e.g. 'IELTS'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum PracticePurpose {
    IELTS,
    TOEFL,
    Fluency,
    Other,
}

impl PracticePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IELTS => "IELTS",
            Self::TOEFL => "TOEFL",
            Self::Fluency => "Fluency",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for PracticePurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IELTS" => Ok(Self::IELTS),
            "TOEFL" => Ok(Self::TOEFL),
            "Fluency" => Ok(Self::Fluency),
            "Other" => Ok(Self::Other),
            other => Err(format!("invalid purpose of practice: {other}")),
        }
    }
}

impl TryFrom<String> for PracticePurpose {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for PracticePurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-assessed speaking level. Stored as text, e.g. 'Intermediate'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl std::str::FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(Self::Beginner),
            "Intermediate" => Ok(Self::Intermediate),
            "Advanced" => Ok(Self::Advanced),
            other => Err(format!("invalid skill level: {other}")),
        }
    }
}

impl TryFrom<String> for SkillLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's language-practice attributes used for matching and display.
/// Exactly one row per user; unset fields keep their column defaults.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SpeakingProfile {
    pub id: i64,
    pub user_id: i64,
    #[sqlx(try_from = "String")]
    pub purpose_of_practice: PracticePurpose,
    #[sqlx(try_from = "String")]
    pub skill_level: SkillLevel,
    pub expected_score: Option<String>,
    pub education: String,
    pub institution: String,
    pub district: String,
    pub city: String,
    pub career_plan: Option<String>,
    pub profile_picture: Option<String>,
    pub voice_intro_url: Option<String>,
    pub youtube_video_url: Option<String>,
    pub interests: Option<Vec<String>>,
    pub is_online: bool,
    pub is_available: bool,
    pub last_active_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A profile joined with the owning user's display name.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileWithName {
    pub name: String,
    #[sqlx(flatten)]
    pub profile: SpeakingProfile,
}

/// Partial profile update. `None` fields are preserved on upsert.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub purpose_of_practice: Option<PracticePurpose>,
    pub skill_level: Option<SkillLevel>,
    pub expected_score: Option<String>,
    pub education: Option<String>,
    pub institution: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub career_plan: Option<String>,
    pub profile_picture: Option<String>,
    pub voice_intro_url: Option<String>,
    pub youtube_video_url: Option<String>,
    pub interests: Option<Vec<String>>,
}

/// A contact handle attached to a user, replaced wholesale on profile update.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactLink {
    pub id: i64,
    pub user_id: i64,
    pub platform: String,
    pub value: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Platforms accepted for contact links.
pub const CONTACT_PLATFORMS: &[&str] = &["whatsapp", "telegram", "facebook", "email"];

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn purpose_round_trips_through_serde() {
        let json = serde_json::to_string(&PracticePurpose::IELTS).unwrap();
        assert_eq!(json, "\"IELTS\"");
        let back: PracticePurpose = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PracticePurpose::IELTS);
    }

    #[test]
    fn purpose_parses_stored_values() {
        assert_eq!(
            PracticePurpose::from_str("Fluency").unwrap(),
            PracticePurpose::Fluency
        );
        assert!(PracticePurpose::from_str("GRE").is_err());
    }

    #[test]
    fn skill_level_display_matches_storage() {
        assert_eq!(SkillLevel::Intermediate.to_string(), "Intermediate");
        assert_eq!(
            SkillLevel::try_from("Advanced".to_string()).unwrap(),
            SkillLevel::Advanced
        );
    }
}
