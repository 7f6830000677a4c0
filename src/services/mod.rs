//! Business logic services

pub mod books;
pub mod email;
pub mod payments;
pub mod pdf;
pub mod reports;
pub mod users;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub users: users::UsersService,
    pub books: books::BooksService,
    pub payments: payments::PaymentsService,
    pub reports: reports::ReportsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let email = email::EmailService::new(config.email.clone());

        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone()),
            books: books::BooksService::new(repository.clone(), config.fines.daily_rate),
            payments: payments::PaymentsService::new(repository.clone(), email),
            reports: reports::ReportsService::new(repository.clone()),
            repository,
        }
    }
}
