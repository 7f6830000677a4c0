//! Library Management Server
//!
//! REST JSON API for a library: book catalog, issue and return of books,
//! overdue fines with payment, and PDF circulation reports.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        // Books
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id", put(api::books::update_book))
        .route("/books/:id", delete(api::books::delete_book))
        .route("/books/:id/issue", post(api::books::issue_book))
        .route("/books/:id/return", post(api::books::return_book))
        // Own account
        .route("/users/profile", get(api::users::get_profile))
        .route("/users/profile", put(api::users::update_profile))
        .route("/users/password", put(api::users::change_password))
        .route("/users/issues", get(api::users::get_my_issues))
        // Administration
        .route("/admin/users", get(api::admin::list_users))
        .route("/admin/users/:id", get(api::admin::get_user))
        .route("/admin/users/:id", delete(api::admin::delete_user))
        .route("/admin/users/:id/role", put(api::admin::update_user_role))
        // Payments
        .route("/payments/fines", get(api::payments::get_fines))
        .route("/payments/pay", post(api::payments::pay_fine))
        // Reports
        .route("/reports/issuance", get(api::reports::issuance_report))
        .route("/reports/overdue", get(api::reports::overdue_report))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api", api_routes)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
