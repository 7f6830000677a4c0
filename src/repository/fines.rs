//! Fines repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::fine::{Fine, FineStatus},
};

#[derive(Clone)]
pub struct FinesRepository {
    pool: Pool<Postgres>,
}

impl FinesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get fine by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Fine> {
        sqlx::query_as::<_, Fine>("SELECT * FROM fines WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fine with id {} not found", id)))
    }

    /// Fines of a user with the given status
    pub async fn list_by_user_and_status(&self, user_id: i64, status: FineStatus) -> AppResult<Vec<Fine>> {
        let fines = sqlx::query_as::<_, Fine>(
            "SELECT * FROM fines WHERE user_id = $1 AND status = $2 ORDER BY created_at, id",
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(fines)
    }

    /// Mark a pending fine as paid.
    ///
    /// Only a PENDING row is updated; a concurrent payment that got there
    /// first leaves nothing to update and yields a conflict.
    pub async fn mark_paid(&self, id: i64, payment_method: &str, now: DateTime<Utc>) -> AppResult<Fine> {
        sqlx::query_as::<_, Fine>(
            r#"
            UPDATE fines SET status = $1, payment_method = $2, paid_at = $3
            WHERE id = $4 AND status = $5
            RETURNING *
            "#,
        )
        .bind(FineStatus::Paid)
        .bind(payment_method)
        .bind(now)
        .bind(id)
        .bind(FineStatus::Pending)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("Fine {} is already paid", id)))
    }
}
