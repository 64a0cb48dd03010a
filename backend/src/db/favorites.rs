use anyhow::Result;
use sqlx::PgPool;

use crate::constants::FAVORITES_PAGE_SIZE;
use crate::models::{Favorite, FavoriteCategory};

/// Idempotent insert. Returns `None` when the pair was already favorited;
/// the existing row is left untouched.
pub async fn add_favorite(
    pool: &PgPool,
    user_id: i64,
    favorite_user_id: i64,
    category: FavoriteCategory,
    notes: Option<&str>,
) -> Result<Option<Favorite>> {
    let favorite = sqlx::query_as::<_, Favorite>(
        r#"
        INSERT INTO favorites (user_id, favorite_user_id, category, notes)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, favorite_user_id) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(favorite_user_id)
    .bind(category.as_str())
    .bind(notes)
    .fetch_optional(pool)
    .await?;

    Ok(favorite)
}

/// Deleting a favorite that does not exist is not an error.
pub async fn remove_favorite(pool: &PgPool, user_id: i64, favorite_user_id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM favorites
        WHERE user_id = $1 AND favorite_user_id = $2
        "#,
    )
    .bind(user_id)
    .bind(favorite_user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn is_favorited(pool: &PgPool, user_id: i64, favorite_user_id: i64) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM favorites
            WHERE user_id = $1 AND favorite_user_id = $2
        )
        "#,
    )
    .bind(user_id)
    .bind(favorite_user_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// All favorites for the partners tab, newest first.
pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Favorite>> {
    let favorites = sqlx::query_as::<_, Favorite>(
        r#"
        SELECT *
        FROM favorites
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(favorites)
}

/// One page of favorites, newest first, optionally filtered by category.
/// Returns the page plus the total matching count.
pub async fn list_page(
    pool: &PgPool,
    user_id: i64,
    category: Option<FavoriteCategory>,
    page: i64,
) -> Result<(Vec<Favorite>, i64)> {
    let offset = (page.max(1) - 1) * FAVORITES_PAGE_SIZE;

    let favorites = sqlx::query_as::<_, Favorite>(
        r#"
        SELECT *
        FROM favorites
        WHERE user_id = $1
          AND ($2::TEXT IS NULL OR category = $2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(user_id)
    .bind(category.map(|c| c.as_str()))
    .bind(FAVORITES_PAGE_SIZE)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM favorites
        WHERE user_id = $1
          AND ($2::TEXT IS NULL OR category = $2)
        "#,
    )
    .bind(user_id)
    .bind(category.map(|c| c.as_str()))
    .fetch_one(pool)
    .await?;

    Ok((favorites, total))
}
