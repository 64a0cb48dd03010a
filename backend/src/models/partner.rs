use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::connection::{ConnectionRequest, ConnectionStatus};
use crate::models::favorite::Favorite;
use crate::models::profile::{ContactLink, PracticePurpose, SkillLevel, SpeakingProfile};

/// Which contact links a card may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactVisibility {
    /// Partner-facing cards: only links the owner marked public.
    PublicOnly,
    /// The owner looking at their own data: everything.
    OwnerView,
}

/// Which tab a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerKind {
    SentRequest,
    ReceivedRequest,
    Favorite,
}

/// The one projection from user + profile + contact links to the shape the
/// frontend consumes. Every call site that used to shape this by hand goes
/// through here.
#[derive(Debug, Clone, Serialize)]
pub struct PartnerCard {
    pub id: i64,
    pub name: String,
    pub profile_picture: String,
    pub voice_intro_url: String,
    pub purpose_of_practice: PracticePurpose,
    pub skill_level: SkillLevel,
    pub education: String,
    pub institution: String,
    pub district: String,
    pub city: String,
    pub expected_score: Option<String>,
    pub career_plan: Option<String>,
    pub youtube_video_url: Option<String>,
    pub interests: Vec<String>,
    pub contact_links: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_type: Option<PartnerKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_status: Option<ConnectionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_date: Option<DateTime<Utc>>,
}

impl PartnerCard {
    pub fn project(
        profile: &SpeakingProfile,
        name: &str,
        links: &[ContactLink],
        visibility: ContactVisibility,
    ) -> Self {
        let contact_links = links
            .iter()
            .filter(|l| visibility == ContactVisibility::OwnerView || l.is_public)
            .map(|l| (l.platform.clone(), l.value.clone()))
            .collect();

        Self {
            id: profile.user_id,
            name: name.to_string(),
            profile_picture: profile.profile_picture.clone().unwrap_or_default(),
            voice_intro_url: profile.voice_intro_url.clone().unwrap_or_default(),
            purpose_of_practice: profile.purpose_of_practice,
            skill_level: profile.skill_level,
            education: profile.education.clone(),
            institution: profile.institution.clone(),
            district: profile.district.clone(),
            city: profile.city.clone(),
            expected_score: profile.expected_score.clone(),
            career_plan: profile.career_plan.clone(),
            youtube_video_url: profile.youtube_video_url.clone(),
            interests: profile.interests.clone().unwrap_or_default(),
            contact_links,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
            partner_type: None,
            connection_status: None,
            connection_id: None,
            request_message: None,
            request_date: None,
            favorite_category: None,
            favorite_notes: None,
            favorite_date: None,
        }
    }

    /// Attach connection-request context for the sent/received tabs.
    pub fn with_request(mut self, request: &ConnectionRequest, kind: PartnerKind) -> Self {
        self.partner_type = Some(kind);
        self.connection_status = Some(request.status);
        self.connection_id = Some(request.id);
        self.request_message = request.message.clone();
        self.request_date = Some(request.created_at);
        self
    }

    /// Attach favorite context for the favorites tab.
    pub fn with_favorite(mut self, favorite: &Favorite) -> Self {
        self.partner_type = Some(PartnerKind::Favorite);
        self.favorite_category = Some(favorite.category.as_str().to_string());
        self.favorite_notes = favorite.notes.clone();
        self.favorite_date = Some(favorite.created_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile(user_id: i64) -> SpeakingProfile {
        SpeakingProfile {
            id: user_id,
            user_id,
            purpose_of_practice: PracticePurpose::IELTS,
            skill_level: SkillLevel::Advanced,
            expected_score: Some("7.5".to_string()),
            education: "BSc".to_string(),
            institution: "DU".to_string(),
            district: "Dhanmondi".to_string(),
            city: "Dhaka".to_string(),
            career_plan: None,
            profile_picture: None,
            voice_intro_url: Some("intros/a.mp3".to_string()),
            youtube_video_url: None,
            interests: Some(vec!["travel".to_string()]),
            is_online: false,
            is_available: true,
            last_active_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn link(platform: &str, public: bool) -> ContactLink {
        ContactLink {
            id: 1,
            user_id: 7,
            platform: platform.to_string(),
            value: format!("{platform}-handle"),
            is_public: public,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn public_view_drops_private_contact_links() {
        let profile = sample_profile(7);
        let links = vec![link("whatsapp", false), link("telegram", true)];

        let card = PartnerCard::project(&profile, "Rima", &links, ContactVisibility::PublicOnly);
        assert_eq!(card.contact_links.len(), 1);
        assert!(card.contact_links.contains_key("telegram"));

        let owner = PartnerCard::project(&profile, "Rima", &links, ContactVisibility::OwnerView);
        assert_eq!(owner.contact_links.len(), 2);
    }

    #[test]
    fn unset_media_fields_project_as_empty_strings() {
        let profile = sample_profile(7);
        let card = PartnerCard::project(&profile, "Rima", &[], ContactVisibility::PublicOnly);
        assert_eq!(card.profile_picture, "");
        assert_eq!(card.voice_intro_url, "intros/a.mp3");
        assert!(card.partner_type.is_none());
    }

    #[test]
    fn request_context_lands_on_the_card() {
        let profile = sample_profile(7);
        let request = ConnectionRequest {
            id: 42,
            sender_id: 1,
            receiver_id: 7,
            status: ConnectionStatus::Pending,
            message: Some("hi".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let card = PartnerCard::project(&profile, "Rima", &[], ContactVisibility::PublicOnly)
            .with_request(&request, PartnerKind::SentRequest);
        assert_eq!(card.connection_id, Some(42));
        assert_eq!(card.connection_status, Some(ConnectionStatus::Pending));
        assert_eq!(card.partner_type, Some(PartnerKind::SentRequest));
        assert_eq!(card.request_message.as_deref(), Some("hi"));
    }
}
