//! Book (catalog entry) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    /// False while an issue record for this book is open
    pub availability: bool,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Fails with a conflict when the book is already out
    pub fn ensure_available(&self) -> AppResult<()> {
        if self.availability {
            Ok(())
        } else {
            Err(AppError::Conflict(format!("Book {} is not available", self.id)))
        }
    }
}

/// Create or update book request.
///
/// Availability is owned by circulation (issue/return) and cannot be set here.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author is required"))]
    pub author: String,
    #[validate(length(max = 100, message = "Category is too long"))]
    pub category: Option<String>,
}
