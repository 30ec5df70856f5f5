//! Unavailable Ingredient Repository
//!
//! A per-restaurant set of ingredient identifiers; returned sorted.

use super::RepoResult;
use sqlx::SqlitePool;
use std::collections::BTreeSet;

pub async fn find_all(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<String>> {
    let rows = sqlx::query_scalar::<_, String>(
        "SELECT ingredient_id FROM unavailable_ingredients WHERE restaurant_id = ? \
         ORDER BY ingredient_id",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Replace the whole set atomically. Blank entries are dropped and
/// duplicates collapse.
pub async fn replace_all(
    pool: &SqlitePool,
    restaurant_id: i64,
    ingredients: &[String],
) -> RepoResult<Vec<String>> {
    let set: BTreeSet<&str> = ingredients
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM unavailable_ingredients WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .execute(&mut *tx)
        .await?;
    for ingredient in &set {
        sqlx::query(
            "INSERT INTO unavailable_ingredients (restaurant_id, ingredient_id) VALUES (?, ?)",
        )
        .bind(restaurant_id)
        .bind(*ingredient)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(set.into_iter().map(str::to_owned).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[tokio::test]
    async fn replace_all_dedups_and_sorts() {
        let pool = test_support::pool().await;
        let rid = test_support::restaurant(&pool, "r1").await;

        let input = vec!["palta".to_string(), "tomate".into(), "palta".into(), "  ".into()];
        let stored = replace_all(&pool, rid, &input).await.unwrap();
        assert_eq!(stored, vec!["palta", "tomate"]);
        assert_eq!(find_all(&pool, rid).await.unwrap(), stored);

        replace_all(&pool, rid, &[]).await.unwrap();
        assert!(find_all(&pool, rid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sets_are_per_restaurant() {
        let pool = test_support::pool().await;
        let r1 = test_support::restaurant(&pool, "r1").await;
        let r2 = test_support::restaurant(&pool, "r2").await;
        replace_all(&pool, r1, &["cebolla".to_string()]).await.unwrap();
        assert!(find_all(&pool, r2).await.unwrap().is_empty());
    }
}
