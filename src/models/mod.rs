//! Data models for the library server

pub mod book;
pub mod fine;
pub mod issue;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use fine::{Fine, FineStatus};
pub use issue::{IssueRecord, IssueRecordDetails};
pub use user::{Role, User, UserClaims};
