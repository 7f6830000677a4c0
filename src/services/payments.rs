//! Fine payment service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        fine::{Fine, FineStatus, PaymentRequest},
        user::User,
    },
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct PaymentsService {
    repository: Repository,
    email: EmailService,
}

impl PaymentsService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Pending fines of the caller
    pub async fn get_user_fines(&self, caller: &User) -> AppResult<Vec<Fine>> {
        self.repository
            .fines
            .list_by_user_and_status(caller.id, FineStatus::Pending)
            .await
    }

    /// Pay one of the caller's fines in full.
    ///
    /// The confirmation email is sent after the payment is stored and its
    /// outcome never affects the response.
    pub async fn process_payment(&self, caller: &User, payment: PaymentRequest) -> AppResult<Fine> {
        let fine = self.repository.fines.get_by_id(payment.fine_id).await?;

        if fine.user_id != caller.id {
            return Err(AppError::NotFound(format!("Fine with id {} not found", payment.fine_id)));
        }

        fine.ensure_payable(payment.amount)?;

        let paid = self
            .repository
            .fines
            .mark_paid(fine.id, &payment.payment_method, Utc::now())
            .await?;

        tracing::info!(
            "Fine id={} of {} paid by user id={} via {}",
            paid.id,
            paid.amount,
            caller.id,
            payment.payment_method
        );

        let email = self.email.clone();
        let to = caller.email.clone();
        let name = caller.name.clone();
        let receipt = paid.clone();
        tokio::spawn(async move {
            if let Err(e) = email.send_payment_confirmation(&to, &name, &receipt).await {
                tracing::warn!("Payment confirmation for fine id={} not sent: {}", receipt.id, e);
            }
        });

        Ok(paid)
    }
}
