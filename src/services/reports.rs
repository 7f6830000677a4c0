//! Report generation service

use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::issue::overdue_only,
    repository::Repository,
    services::pdf::render_issue_report,
};

pub const ISSUANCE_REPORT_TITLE: &str = "Library Issuance Report";
pub const OVERDUE_REPORT_TITLE: &str = "Library Overdue Report";

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// PDF listing every issue record
    pub async fn generate_issuance_report(&self) -> AppResult<Vec<u8>> {
        let records = self.repository.issues.list_details().await?;
        tracing::debug!("Rendering issuance report with {} records", records.len());
        render_issue_report(ISSUANCE_REPORT_TITLE, &records)
    }

    /// PDF listing books still out past their due date as of `now`
    pub async fn generate_overdue_report(&self, now: DateTime<Utc>) -> AppResult<Vec<u8>> {
        let records = overdue_only(self.repository.issues.list_details().await?, now);
        tracing::debug!("Rendering overdue report with {} records", records.len());
        render_issue_report(OVERDUE_REPORT_TITLE, &records)
    }
}
