//! Self-service user endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        issue::IssueRecordDetails,
        user::{ChangePassword, UpdateProfile, User},
    },
};

use super::CurrentUser;

/// Get own profile
#[utoipa::path(
    get,
    path = "/users/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile(CurrentUser(caller): CurrentUser) -> AppResult<Json<User>> {
    Ok(Json(caller))
}

/// Update own name and email
#[utoipa::path(
    put,
    path = "/users/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_profile(
    State(state): State<crate::AppState>,
    CurrentUser(caller): CurrentUser,
    Json(profile): Json<UpdateProfile>,
) -> AppResult<Json<User>> {
    profile.validate()?;

    let updated = state
        .services
        .users
        .update_profile(&caller, &profile.name, &profile.email)
        .await?;
    Ok(Json(updated))
}

/// Change own password
#[utoipa::path(
    put,
    path = "/users/password",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = ChangePassword,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid new password"),
        (status = 401, description = "Current password is incorrect")
    )
)]
pub async fn change_password(
    State(state): State<crate::AppState>,
    CurrentUser(caller): CurrentUser,
    Json(request): Json<ChangePassword>,
) -> AppResult<StatusCode> {
    request.validate()?;

    state
        .services
        .users
        .change_password(&caller, &request.current_password, &request.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Own issue history
#[utoipa::path(
    get,
    path = "/users/issues",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Issue records of the caller", body = Vec<IssueRecordDetails>)
    )
)]
pub async fn get_my_issues(
    State(state): State<crate::AppState>,
    CurrentUser(caller): CurrentUser,
) -> AppResult<Json<Vec<IssueRecordDetails>>> {
    let issues = state.services.users.user_issues(&caller).await?;
    Ok(Json(issues))
}
