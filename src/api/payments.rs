//! Fine payment endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    models::fine::{Fine, PaymentRequest},
};

use super::CurrentUser;

/// Own pending fines
#[utoipa::path(
    get,
    path = "/payments/fines",
    tag = "payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending fines of the caller", body = Vec<Fine>)
    )
)]
pub async fn get_fines(
    State(state): State<crate::AppState>,
    CurrentUser(caller): CurrentUser,
) -> AppResult<Json<Vec<Fine>>> {
    let fines = state.services.payments.get_user_fines(&caller).await?;
    Ok(Json(fines))
}

/// Pay a fine in full
#[utoipa::path(
    post,
    path = "/payments/pay",
    tag = "payments",
    security(("bearer_auth" = [])),
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Fine paid", body = Fine),
        (status = 400, description = "Amount does not match the fine"),
        (status = 404, description = "Fine not found"),
        (status = 409, description = "Fine already paid")
    )
)]
pub async fn pay_fine(
    State(state): State<crate::AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payment): Json<PaymentRequest>,
) -> AppResult<Json<Fine>> {
    payment.validate()?;

    let fine = state.services.payments.process_payment(&caller, payment).await?;
    Ok(Json(fine))
}
