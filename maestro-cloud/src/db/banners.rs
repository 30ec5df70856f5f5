//! Promotion Banner Repository (singleton per restaurant)

use super::RepoResult;
use shared::models::{BannerInput, PromotionBanner};
use sqlx::SqlitePool;

pub async fn find(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Option<PromotionBanner>> {
    let row = sqlx::query_as::<_, PromotionBanner>(
        "SELECT restaurant_id, is_visible, title, subtitle, background_color, text_color, \
         updated_at FROM promotion_banners WHERE restaurant_id = ?",
    )
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn upsert(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: &BannerInput,
    now: i64,
) -> RepoResult<PromotionBanner> {
    let row = sqlx::query_as::<_, PromotionBanner>(
        "INSERT INTO promotion_banners \
         (restaurant_id, is_visible, title, subtitle, background_color, text_color, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT (restaurant_id) DO UPDATE SET \
         is_visible = excluded.is_visible, title = excluded.title, subtitle = excluded.subtitle, \
         background_color = excluded.background_color, text_color = excluded.text_color, \
         updated_at = excluded.updated_at \
         RETURNING restaurant_id, is_visible, title, subtitle, background_color, text_color, \
         updated_at",
    )
    .bind(restaurant_id)
    .bind(data.is_visible)
    .bind(data.title.trim())
    .bind(data.subtitle.as_deref())
    .bind(&data.background_color)
    .bind(&data.text_color)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[tokio::test]
    async fn upsert_keeps_a_single_row() {
        let pool = test_support::pool().await;
        let rid = test_support::restaurant(&pool, "r1").await;
        assert!(find(&pool, rid).await.unwrap().is_none());

        let mut input = BannerInput {
            is_visible: true,
            title: "2x1 en schops".into(),
            subtitle: None,
            background_color: "#000".into(),
            text_color: "#FFFFFF".into(),
        };
        upsert(&pool, rid, &input, 1).await.unwrap();
        input.title = "Happy hour".into();
        input.subtitle = Some("Todos los jueves".into());
        let second = upsert(&pool, rid, &input, 2).await.unwrap();

        assert_eq!(second.title, "Happy hour");
        assert_eq!(second.updated_at, 2);
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM promotion_banners")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
