use std::collections::HashSet;

use crate::constants::{
    CITY_MATCH_POINTS, DISTRICT_MATCH_POINTS, EXPECTED_SCORE_MATCH_POINTS, INTEREST_POINTS_CAP,
    INTEREST_POINTS_EACH, MAX_COMPATIBILITY_SCORE, PURPOSE_MATCH_POINTS, SKILL_MATCH_POINTS,
};
use crate::models::SpeakingProfile;

/// Deterministic 0-100 similarity rubric between two profiles.
///
/// Purpose 30, city 25 (else district 15, city takes precedence), skill 20,
/// shared interests 3 each capped at 15, equal expected score 10. Expected
/// scores compare as exact strings; there is no numeric tolerance.
pub fn compatibility_score(a: &SpeakingProfile, b: &SpeakingProfile) -> i32 {
    let mut score = 0;

    if a.purpose_of_practice == b.purpose_of_practice {
        score += PURPOSE_MATCH_POINTS;
    }

    if a.city == b.city {
        score += CITY_MATCH_POINTS;
    } else if a.district == b.district {
        score += DISTRICT_MATCH_POINTS;
    }

    if a.skill_level == b.skill_level {
        score += SKILL_MATCH_POINTS;
    }

    if let (Some(mine), Some(theirs)) = (&a.interests, &b.interests) {
        if !mine.is_empty() && !theirs.is_empty() {
            let mine: HashSet<&str> = mine.iter().map(String::as_str).collect();
            let common = theirs
                .iter()
                .map(String::as_str)
                .collect::<HashSet<&str>>()
                .intersection(&mine)
                .count();
            score += (common as i32 * INTEREST_POINTS_EACH).min(INTEREST_POINTS_CAP);
        }
    }

    if let (Some(mine), Some(theirs)) = (&a.expected_score, &b.expected_score) {
        if mine == theirs {
            score += EXPECTED_SCORE_MATCH_POINTS;
        }
    }

    score.min(MAX_COMPATIBILITY_SCORE)
}

/// Total over possibly-missing profiles: an absent side scores 0.
pub fn compatibility_between(a: Option<&SpeakingProfile>, b: Option<&SpeakingProfile>) -> i32 {
    match (a, b) {
        (Some(a), Some(b)) => compatibility_score(a, b),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PracticePurpose, SkillLevel};
    use chrono::Utc;

    fn profile(
        purpose: PracticePurpose,
        city: &str,
        district: &str,
        skill: SkillLevel,
        interests: Option<Vec<&str>>,
        expected_score: Option<&str>,
    ) -> SpeakingProfile {
        SpeakingProfile {
            id: 1,
            user_id: 1,
            purpose_of_practice: purpose,
            skill_level: skill,
            expected_score: expected_score.map(str::to_string),
            education: String::new(),
            institution: String::new(),
            district: district.to_string(),
            city: city.to_string(),
            career_plan: None,
            profile_picture: None,
            voice_intro_url: None,
            youtube_video_url: None,
            interests: interests.map(|i| i.into_iter().map(str::to_string).collect()),
            is_online: false,
            is_available: true,
            last_active_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn dhaka_scenario_scores_78() {
        let a = profile(
            PracticePurpose::IELTS,
            "Dhaka",
            "",
            SkillLevel::Advanced,
            Some(vec!["ml", "travel"]),
            None,
        );
        let b = profile(
            PracticePurpose::IELTS,
            "Dhaka",
            "",
            SkillLevel::Advanced,
            Some(vec!["travel", "music"]),
            None,
        );
        assert_eq!(compatibility_score(&a, &b), 78);
    }

    #[test]
    fn score_is_symmetric() {
        let a = profile(
            PracticePurpose::TOEFL,
            "Dhaka",
            "Mirpur",
            SkillLevel::Beginner,
            Some(vec!["music", "books", "cricket"]),
            Some("100"),
        );
        let b = profile(
            PracticePurpose::IELTS,
            "Chattogram",
            "Mirpur",
            SkillLevel::Beginner,
            Some(vec!["cricket", "music"]),
            Some("7.5"),
        );
        assert_eq!(compatibility_score(&a, &b), compatibility_score(&b, &a));
    }

    #[test]
    fn self_match_with_full_profile_hits_100() {
        let a = profile(
            PracticePurpose::IELTS,
            "Dhaka",
            "Dhanmondi",
            SkillLevel::Advanced,
            Some(vec!["ml", "travel", "music", "books", "cricket"]),
            Some("7.5"),
        );
        assert_eq!(compatibility_score(&a, &a), 100);
    }

    #[test]
    fn district_bonus_only_applies_when_cities_differ() {
        let a = profile(
            PracticePurpose::Other,
            "Dhaka",
            "Mirpur",
            SkillLevel::Beginner,
            None,
            None,
        );
        let same_city = profile(
            PracticePurpose::Fluency,
            "Dhaka",
            "Uttara",
            SkillLevel::Advanced,
            None,
            None,
        );
        // City matched: 25, nothing for the differing districts.
        assert_eq!(compatibility_score(&a, &same_city), 25);

        let same_district = profile(
            PracticePurpose::Fluency,
            "Gazipur",
            "Mirpur",
            SkillLevel::Advanced,
            None,
            None,
        );
        assert_eq!(compatibility_score(&a, &same_district), 15);
    }

    #[test]
    fn interest_points_cap_at_fifteen() {
        let many: Vec<&str> = vec!["a", "b", "c", "d", "e", "f", "g"];
        let a = profile(
            PracticePurpose::IELTS,
            "X",
            "",
            SkillLevel::Beginner,
            Some(many.clone()),
            None,
        );
        let b = profile(
            PracticePurpose::TOEFL,
            "Y",
            "z",
            SkillLevel::Advanced,
            Some(many),
            None,
        );
        // 7 shared interests would be 21 uncapped.
        assert_eq!(compatibility_score(&a, &b), 15);
    }

    #[test]
    fn expected_score_requires_exact_string_equality() {
        let a = profile(
            PracticePurpose::IELTS,
            "X",
            "",
            SkillLevel::Beginner,
            None,
            Some("7.5"),
        );
        let b = profile(
            PracticePurpose::TOEFL,
            "Y",
            "z",
            SkillLevel::Advanced,
            None,
            Some("7.5.0"),
        );
        assert_eq!(compatibility_score(&a, &b), 0);

        let c = profile(
            PracticePurpose::TOEFL,
            "Y",
            "z",
            SkillLevel::Advanced,
            None,
            Some("7.5"),
        );
        assert_eq!(compatibility_score(&a, &c), EXPECTED_SCORE_MATCH_POINTS);
    }

    #[test]
    fn missing_profiles_score_zero() {
        let a = profile(
            PracticePurpose::IELTS,
            "Dhaka",
            "",
            SkillLevel::Advanced,
            None,
            None,
        );
        assert_eq!(compatibility_between(None, Some(&a)), 0);
        assert_eq!(compatibility_between(Some(&a), None), 0);
        assert_eq!(compatibility_between(None, None), 0);
    }

    #[test]
    fn empty_interest_sets_contribute_nothing() {
        let a = profile(
            PracticePurpose::IELTS,
            "X",
            "",
            SkillLevel::Beginner,
            Some(vec![]),
            None,
        );
        let b = profile(
            PracticePurpose::TOEFL,
            "Y",
            "z",
            SkillLevel::Advanced,
            Some(vec!["travel"]),
            None,
        );
        assert_eq!(compatibility_score(&a, &b), 0);
    }
}
