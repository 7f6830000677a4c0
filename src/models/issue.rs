//! Issue record (loan) model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Number of days a book may be kept
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Due date for a book issued at `issue_date`
pub fn due_date_for(issue_date: DateTime<Utc>) -> DateTime<Utc> {
    issue_date + Duration::days(LOAN_PERIOD_DAYS)
}

/// Issue record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

/// Issue record joined with book title and borrower name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecordDetails {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub book_title: String,
    pub user_name: String,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

impl IssueRecordDetails {
    /// An open record whose due date has passed
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.return_date.is_none() && self.due_date < now
    }
}

/// Keep only records that are still out and past due
pub fn overdue_only(records: Vec<IssueRecordDetails>, now: DateTime<Utc>) -> Vec<IssueRecordDetails> {
    records.into_iter().filter(|r| r.is_overdue(now)).collect()
}
