//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, books, health, payments, reports, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "1.0.0",
        description = "Library management REST API: catalog, circulation, fines and reports"
    ),
    servers(
        (url = "/api", description = "Library API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::issue_book,
        books::return_book,
        // Users
        users::get_profile,
        users::update_profile,
        users::change_password,
        users::get_my_issues,
        // Admin
        admin::list_users,
        admin::get_user,
        admin::update_user_role,
        admin::delete_user,
        // Payments
        payments::get_fines,
        payments::pay_fine,
        // Reports
        reports::issuance_report,
        reports::overdue_report,
    ),
    components(
        schemas(
            // Auth
            auth::MessageResponse,
            auth::LoginResponse,
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            crate::models::user::UserInfo,
            // Users
            crate::models::user::Role,
            crate::models::user::User,
            crate::models::user::UpdateProfile,
            crate::models::user::ChangePassword,
            crate::models::user::UpdateRole,
            // Books
            crate::models::book::Book,
            crate::models::book::BookRequest,
            crate::models::issue::IssueRecord,
            crate::models::issue::IssueRecordDetails,
            // Payments
            crate::models::fine::Fine,
            crate::models::fine::FineStatus,
            crate::models::fine::PaymentRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "books", description = "Catalog and circulation"),
        (name = "users", description = "Own profile and issue history"),
        (name = "admin", description = "User administration"),
        (name = "payments", description = "Fines and payments"),
        (name = "reports", description = "PDF reports")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
