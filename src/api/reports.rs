//! PDF report endpoints

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::error::AppResult;

use super::AdminUser;

fn pdf_attachment(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Report of every issue record
#[utoipa::path(
    get,
    path = "/reports/issuance",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PDF report", content_type = "application/pdf"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn issuance_report(
    State(state): State<crate::AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Response> {
    let pdf = state.services.reports.generate_issuance_report().await?;
    Ok(pdf_attachment("issuance-report.pdf", pdf))
}

/// Report of books still out past their due date
#[utoipa::path(
    get,
    path = "/reports/overdue",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PDF report", content_type = "application/pdf"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn overdue_report(
    State(state): State<crate::AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Response> {
    let pdf = state.services.reports.generate_overdue_report(Utc::now()).await?;
    Ok(pdf_attachment("overdue-report.pdf", pdf))
}
