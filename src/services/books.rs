//! Catalog and circulation service

use chrono::Utc;
use rust_decimal::Decimal;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookRequest},
        issue::IssueRecord,
        user::User,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    daily_fine_rate: Decimal,
}

impl BooksService {
    pub fn new(repository: Repository, daily_fine_rate: Decimal) -> Self {
        Self {
            repository,
            daily_fine_rate,
        }
    }

    /// List all books
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Add a book to the catalog
    pub async fn add_book(&self, book: BookRequest) -> AppResult<Book> {
        let created = self.repository.books.create(&book).await?;
        tracing::info!("Added book id={} title={:?}", created.id, created.title);
        Ok(created)
    }

    /// Update a book's bibliographic fields
    pub async fn update_book(&self, id: i64, book: BookRequest) -> AppResult<Book> {
        self.repository.books.update(id, &book).await
    }

    /// Delete a book and its issue history
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }

    /// Issue a book to the caller
    pub async fn issue_book(&self, caller: &User, book_id: i64) -> AppResult<IssueRecord> {
        let record = self
            .repository
            .issues
            .issue_book(caller.id, book_id, Utc::now())
            .await?;

        tracing::info!(
            "Issued book id={} to user id={}, due {}",
            book_id,
            caller.id,
            record.due_date
        );
        Ok(record)
    }

    /// Return a book the caller has out, assessing a fine when late
    pub async fn return_book(&self, caller: &User, book_id: i64) -> AppResult<IssueRecord> {
        let (record, fine) = self
            .repository
            .issues
            .return_book(caller.id, book_id, Utc::now(), self.daily_fine_rate)
            .await?;

        tracing::info!("Returned book id={} by user id={}", book_id, caller.id);
        if let Some(fine) = fine {
            tracing::info!(
                "Assessed fine id={} of {} to user id={} for late return",
                fine.id,
                fine.amount,
                caller.id
            );
        }
        Ok(record)
    }
}
