use serde::Serialize;

use crate::constants::{
    COMPLETION_BASIC_INFO_POINTS, COMPLETION_CONTACT_INFO_POINTS,
    COMPLETION_EDUCATION_LOCATION_POINTS, COMPLETION_INTERESTS_POINTS,
    COMPLETION_PROFILE_PICTURE_POINTS, COMPLETION_VOICE_INTRO_POINTS,
    COMPLETION_YOUTUBE_VIDEO_POINTS,
};
use crate::models::{ContactLink, SpeakingProfile};

/// How complete a profile is, as shown on the edit page.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionReport {
    pub percentage: i32,
    pub points_earned: i32,
    pub points_total: i32,
    pub completed_fields: Vec<&'static str>,
    pub missing_fields: Vec<&'static str>,
    pub completion_level: &'static str,
}

pub fn profile_completion(profile: &SpeakingProfile, links: &[ContactLink]) -> CompletionReport {
    let sections: [(&'static str, i32, bool); 7] = [
        (
            "basic_info",
            COMPLETION_BASIC_INFO_POINTS,
            profile.expected_score.is_some(),
        ),
        (
            "education_location",
            COMPLETION_EDUCATION_LOCATION_POINTS,
            !profile.education.is_empty() && !profile.city.is_empty(),
        ),
        (
            "contact_info",
            COMPLETION_CONTACT_INFO_POINTS,
            !links.is_empty(),
        ),
        (
            "interests",
            COMPLETION_INTERESTS_POINTS,
            profile.interests.as_ref().is_some_and(|i| !i.is_empty()),
        ),
        (
            "profile_picture",
            COMPLETION_PROFILE_PICTURE_POINTS,
            profile.profile_picture.is_some(),
        ),
        (
            "voice_intro",
            COMPLETION_VOICE_INTRO_POINTS,
            profile.voice_intro_url.is_some(),
        ),
        (
            "youtube_video",
            COMPLETION_YOUTUBE_VIDEO_POINTS,
            profile.youtube_video_url.is_some(),
        ),
    ];

    let mut points_earned = 0;
    let mut points_total = 0;
    let mut completed_fields = Vec::new();
    let mut missing_fields = Vec::new();

    for (name, points, completed) in sections {
        points_total += points;
        if completed {
            points_earned += points;
            completed_fields.push(name);
        } else {
            missing_fields.push(name);
        }
    }

    let percentage = if points_total > 0 {
        (points_earned * 100 + points_total / 2) / points_total
    } else {
        0
    };

    CompletionReport {
        percentage,
        points_earned,
        points_total,
        completed_fields,
        missing_fields,
        completion_level: completion_level(percentage),
    }
}

fn completion_level(percentage: i32) -> &'static str {
    match percentage {
        80..=100 => "excellent",
        60..=79 => "good",
        40..=59 => "fair",
        _ => "getting_started",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PracticePurpose, SkillLevel};
    use chrono::Utc;

    fn bare_profile() -> SpeakingProfile {
        SpeakingProfile {
            id: 1,
            user_id: 1,
            purpose_of_practice: PracticePurpose::IELTS,
            skill_level: SkillLevel::Intermediate,
            expected_score: None,
            education: String::new(),
            institution: String::new(),
            district: String::new(),
            city: String::new(),
            career_plan: None,
            profile_picture: None,
            voice_intro_url: None,
            youtube_video_url: None,
            interests: None,
            is_online: false,
            is_available: true,
            last_active_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn contact_link() -> ContactLink {
        ContactLink {
            id: 1,
            user_id: 1,
            platform: "whatsapp".to_string(),
            value: "+880".to_string(),
            is_public: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn bare_profile_has_everything_missing() {
        let report = profile_completion(&bare_profile(), &[]);
        assert_eq!(report.points_earned, 0);
        assert_eq!(report.percentage, 0);
        assert_eq!(report.completion_level, "getting_started");
        assert_eq!(report.missing_fields.len(), 7);
    }

    #[test]
    fn full_profile_reaches_100_percent() {
        let mut profile = bare_profile();
        profile.expected_score = Some("7.5".to_string());
        profile.education = "BSc".to_string();
        profile.city = "Dhaka".to_string();
        profile.interests = Some(vec!["travel".to_string()]);
        profile.profile_picture = Some("pictures/1.png".to_string());
        profile.voice_intro_url = Some("intros/1.mp3".to_string());
        profile.youtube_video_url = Some("https://youtu.be/x".to_string());

        let report = profile_completion(&profile, &[contact_link()]);
        assert_eq!(report.percentage, 100);
        assert_eq!(report.points_earned, report.points_total);
        assert_eq!(report.completion_level, "excellent");
        assert!(report.missing_fields.is_empty());
    }

    #[test]
    fn voice_intro_carries_the_most_weight() {
        let mut profile = bare_profile();
        profile.voice_intro_url = Some("intros/1.mp3".to_string());

        let report = profile_completion(&profile, &[]);
        assert_eq!(report.points_earned, COMPLETION_VOICE_INTRO_POINTS);
        assert_eq!(report.completed_fields, vec!["voice_intro"]);
    }
}
