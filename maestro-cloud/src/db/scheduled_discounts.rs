//! Scheduled Discount Repository

use super::{RepoError, RepoResult};
use shared::models::{ScheduledDiscount, ScheduledDiscountInput};
use sqlx::SqlitePool;
use sqlx::types::Json;

const COLUMNS: &str =
    "id, restaurant_id, category_id, discount, days, start_time, end_time, is_active, created_at";

pub async fn find_all(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<ScheduledDiscount>> {
    let rows = sqlx::query_as::<_, ScheduledDiscount>(&format!(
        "SELECT {COLUMNS} FROM scheduled_discounts WHERE restaurant_id = ? ORDER BY id"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Replace the restaurant's whole discount set in one transaction.
///
/// Inputs must already be validated. A category that is not the
/// restaurant's aborts the write and leaves the previous set in place.
pub async fn replace_all(
    pool: &SqlitePool,
    restaurant_id: i64,
    discounts: &[ScheduledDiscountInput],
    now: i64,
) -> RepoResult<Vec<ScheduledDiscount>> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM scheduled_discounts WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .execute(&mut *tx)
        .await?;

    for d in discounts {
        let owned: Option<i64> =
            sqlx::query_scalar("SELECT id FROM categories WHERE id = ? AND restaurant_id = ?")
                .bind(d.category_id)
                .bind(restaurant_id)
                .fetch_optional(&mut *tx)
                .await?;
        if owned.is_none() {
            return Err(RepoError::NotFound(format!("Category {} not found", d.category_id)));
        }

        sqlx::query(
            "INSERT INTO scheduled_discounts \
             (restaurant_id, category_id, discount, days, start_time, end_time, is_active, \
             created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(restaurant_id)
        .bind(d.category_id)
        .bind(d.discount)
        .bind(Json(&d.days))
        .bind(&d.start_time)
        .bind(&d.end_time)
        .bind(d.is_active)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    find_all(pool, restaurant_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;

    fn input(category_id: i64, discount: f64) -> ScheduledDiscountInput {
        ScheduledDiscountInput {
            category_id,
            discount,
            days: vec![1, 2, 3],
            start_time: "15:00".into(),
            end_time: "18:00".into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn replace_all_swaps_the_set() {
        let pool = test_support::pool().await;
        let rid = test_support::restaurant(&pool, "r1").await;
        let cid = test_support::category(&pool, rid, "Tragos").await;

        let first = replace_all(&pool, rid, &[input(cid, 10.0), input(cid, 20.0)], 1)
            .await
            .unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].days, vec![1, 2, 3]);

        let second = replace_all(&pool, rid, &[input(cid, 50.0)], 2).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].discount, 50.0);

        assert!(replace_all(&pool, rid, &[], 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_replace_keeps_previous_set() {
        let pool = test_support::pool().await;
        let r1 = test_support::restaurant(&pool, "r1").await;
        let r2 = test_support::restaurant(&pool, "r2").await;
        let mine = test_support::category(&pool, r1, "Mia").await;
        let theirs = test_support::category(&pool, r2, "Ajena").await;

        replace_all(&pool, r1, &[input(mine, 15.0)], 1).await.unwrap();
        let err = replace_all(&pool, r1, &[input(mine, 30.0), input(theirs, 30.0)], 2)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));

        let kept = find_all(&pool, r1).await.unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].discount, 15.0);
    }
}
