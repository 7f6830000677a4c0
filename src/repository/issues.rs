//! Issue records repository: circulation writes and report queries

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::{
        book::Book,
        fine::{late_fee, Fine},
        issue::{due_date_for, IssueRecord, IssueRecordDetails},
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT r.id, r.user_id, r.book_id,
           b.title AS book_title, u.name AS user_name,
           r.issue_date, r.due_date, r.return_date
    FROM issue_records r
    JOIN books b ON b.id = r.book_id
    JOIN users u ON u.id = r.user_id
"#;

#[derive(Clone)]
pub struct IssuesRepository {
    pool: Pool<Postgres>,
}

impl IssuesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Issue a book to a user.
    ///
    /// The book row is locked for the duration of the transaction, so two
    /// concurrent issues of the same book cannot both succeed.
    pub async fn issue_book(&self, user_id: i64, book_id: i64, now: DateTime<Utc>) -> AppResult<IssueRecord> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        book.ensure_available()?;

        let record = sqlx::query_as::<_, IssueRecord>(
            r#"
            INSERT INTO issue_records (user_id, book_id, issue_date, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(now)
        .bind(due_date_for(now))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Book {} is not available", book_id))
            } else {
                AppError::Database(e)
            }
        })?;

        sqlx::query("UPDATE books SET availability = FALSE WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(record)
    }

    /// Return a book the user has out.
    ///
    /// A late return records a pending fine of `daily_rate` per started day
    /// in the same transaction.
    pub async fn return_book(
        &self,
        user_id: i64,
        book_id: i64,
        now: DateTime<Utc>,
        daily_rate: Decimal,
    ) -> AppResult<(IssueRecord, Option<Fine>)> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!("Book with id {} not found", book_id)));
        }

        let open = sqlx::query_as::<_, IssueRecord>(
            r#"
            SELECT * FROM issue_records
            WHERE book_id = $1 AND user_id = $2 AND return_date IS NULL
            FOR UPDATE
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("No active issue record found".to_string()))?;

        let record = sqlx::query_as::<_, IssueRecord>(
            "UPDATE issue_records SET return_date = $1 WHERE id = $2 RETURNING *",
        )
        .bind(now)
        .bind(open.id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET availability = TRUE WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        let fine = match late_fee(record.due_date, now, daily_rate) {
            Some(amount) => Some(
                sqlx::query_as::<_, Fine>(
                    r#"
                    INSERT INTO fines (user_id, issue_record_id, amount, status, created_at)
                    VALUES ($1, $2, $3, 'PENDING', $4)
                    RETURNING *
                    "#,
                )
                .bind(user_id)
                .bind(record.id)
                .bind(amount)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?,
            ),
            None => None,
        };

        tx.commit().await?;
        Ok((record, fine))
    }

    /// All issue records with book and borrower names
    pub async fn list_details(&self) -> AppResult<Vec<IssueRecordDetails>> {
        let query = format!("{} ORDER BY r.issue_date, r.id", DETAILS_SELECT);
        let records = sqlx::query_as::<_, IssueRecordDetails>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    /// Issue records of one user, newest first
    pub async fn list_details_for_user(&self, user_id: i64) -> AppResult<Vec<IssueRecordDetails>> {
        let query = format!("{} WHERE r.user_id = $1 ORDER BY r.issue_date DESC, r.id DESC", DETAILS_SELECT);
        let records = sqlx::query_as::<_, IssueRecordDetails>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }
}
