use std::collections::HashMap;

use anyhow::Result;
use sqlx::PgPool;

use crate::models::{ContactLink, ProfileUpdate, ProfileWithName, SpeakingProfile};

pub async fn get_profile(pool: &PgPool, user_id: i64) -> Result<Option<SpeakingProfile>> {
    let profile = sqlx::query_as::<_, SpeakingProfile>(
        r#"
        SELECT *
        FROM speaking_profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

pub async fn get_profile_with_name(
    pool: &PgPool,
    user_id: i64,
) -> Result<Option<ProfileWithName>> {
    let row = sqlx::query_as::<_, ProfileWithName>(
        r#"
        SELECT u.name, p.*
        FROM speaking_profiles p
        JOIN users u ON u.id = p.user_id
        WHERE p.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Profiles (with display names) for a set of users, keyed by user id.
/// Users without a profile are simply absent from the map.
pub async fn profiles_with_names_for(
    pool: &PgPool,
    user_ids: &[i64],
) -> Result<HashMap<i64, ProfileWithName>> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, ProfileWithName>(
        r#"
        SELECT u.name, p.*
        FROM speaking_profiles p
        JOIN users u ON u.id = p.user_id
        WHERE p.user_id = ANY($1)
        "#,
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| (r.profile.user_id, r)).collect())
}

/// Create-or-update keeping every field the caller did not send.
pub async fn upsert_profile(
    pool: &PgPool,
    user_id: i64,
    update: &ProfileUpdate,
) -> Result<SpeakingProfile> {
    let profile = sqlx::query_as::<_, SpeakingProfile>(
        r#"
        INSERT INTO speaking_profiles (
            user_id, purpose_of_practice, skill_level, expected_score,
            education, institution, district, city, career_plan,
            profile_picture, voice_intro_url, youtube_video_url, interests
        )
        VALUES (
            $1,
            COALESCE($2, 'IELTS'),
            COALESCE($3, 'Intermediate'),
            $4,
            COALESCE($5, ''),
            COALESCE($6, ''),
            COALESCE($7, ''),
            COALESCE($8, ''),
            $9, $10, $11, $12, $13
        )
        ON CONFLICT (user_id) DO UPDATE SET
            purpose_of_practice = COALESCE($2, speaking_profiles.purpose_of_practice),
            skill_level = COALESCE($3, speaking_profiles.skill_level),
            expected_score = COALESCE($4, speaking_profiles.expected_score),
            education = COALESCE($5, speaking_profiles.education),
            institution = COALESCE($6, speaking_profiles.institution),
            district = COALESCE($7, speaking_profiles.district),
            city = COALESCE($8, speaking_profiles.city),
            career_plan = COALESCE($9, speaking_profiles.career_plan),
            profile_picture = COALESCE($10, speaking_profiles.profile_picture),
            voice_intro_url = COALESCE($11, speaking_profiles.voice_intro_url),
            youtube_video_url = COALESCE($12, speaking_profiles.youtube_video_url),
            interests = COALESCE($13, speaking_profiles.interests),
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(update.purpose_of_practice.map(|p| p.as_str()))
    .bind(update.skill_level.map(|s| s.as_str()))
    .bind(update.expected_score.as_deref())
    .bind(update.education.as_deref())
    .bind(update.institution.as_deref())
    .bind(update.district.as_deref())
    .bind(update.city.as_deref())
    .bind(update.career_plan.as_deref())
    .bind(update.profile_picture.as_deref())
    .bind(update.voice_intro_url.as_deref())
    .bind(update.youtube_video_url.as_deref())
    .bind(update.interests.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

/// Stamp online/availability flags; a missing profile is a quiet no-op.
pub async fn update_presence(
    pool: &PgPool,
    user_id: i64,
    is_online: Option<bool>,
    is_available: Option<bool>,
) -> Result<Option<SpeakingProfile>> {
    let profile = sqlx::query_as::<_, SpeakingProfile>(
        r#"
        UPDATE speaking_profiles
        SET is_online = COALESCE($2, is_online),
            is_available = COALESCE($3, is_available),
            last_active_at = NOW(),
            updated_at = NOW()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(is_online)
    .bind(is_available)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

pub async fn get_contact_links(pool: &PgPool, user_id: i64) -> Result<Vec<ContactLink>> {
    let links = sqlx::query_as::<_, ContactLink>(
        r#"
        SELECT *
        FROM contact_links
        WHERE user_id = $1
        ORDER BY platform
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(links)
}

/// Contact links for a set of users, grouped by owner.
pub async fn contact_links_for(
    pool: &PgPool,
    user_ids: &[i64],
) -> Result<HashMap<i64, Vec<ContactLink>>> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let links = sqlx::query_as::<_, ContactLink>(
        r#"
        SELECT *
        FROM contact_links
        WHERE user_id = ANY($1)
        ORDER BY platform
        "#,
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<i64, Vec<ContactLink>> = HashMap::new();
    for link in links {
        grouped.entry(link.user_id).or_default().push(link);
    }

    Ok(grouped)
}

/// Replace the user's contact links wholesale. All links are stored
/// private; visibility is decided at projection time.
pub async fn replace_contact_links(
    pool: &PgPool,
    user_id: i64,
    entries: &[(String, String)],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM contact_links WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    for (platform, value) in entries {
        sqlx::query(
            r#"
            INSERT INTO contact_links (user_id, platform, value, is_public)
            VALUES ($1, $2, $3, FALSE)
            "#,
        )
        .bind(user_id)
        .bind(platform)
        .bind(value)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(())
}
