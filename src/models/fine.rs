//! Fine model and payment types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Fine status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum FineStatus {
    Pending,
    Paid,
}

impl FineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FineStatus::Pending => "PENDING",
            FineStatus::Paid => "PAID",
        }
    }
}

impl std::str::FromStr for FineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(FineStatus::Pending),
            "PAID" => Ok(FineStatus::Paid),
            _ => Err(format!("Invalid fine status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for FineStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for FineStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for FineStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Fine model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fine {
    pub id: i64,
    pub user_id: i64,
    /// Issue record whose late return caused the fine
    pub issue_record_id: Option<i64>,
    pub amount: Decimal,
    pub status: FineStatus,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Fine {
    /// Checks that `amount` settles this fine
    pub fn ensure_payable(&self, amount: Decimal) -> AppResult<()> {
        if self.status == FineStatus::Paid {
            return Err(AppError::Conflict(format!("Fine {} is already paid", self.id)));
        }
        if amount != self.amount {
            return Err(AppError::Validation(format!(
                "Payment amount {} does not match fine amount {}",
                amount, self.amount
            )));
        }
        Ok(())
    }
}

/// Fine owed for returning at `returned` a book due at `due`.
///
/// Every started day past the due date is charged `daily_rate`. The total
/// is rounded to cents; a total that rounds to zero is no fine.
pub fn late_fee(due: DateTime<Utc>, returned: DateTime<Utc>, daily_rate: Decimal) -> Option<Decimal> {
    let late_seconds = (returned - due).num_seconds();
    if late_seconds <= 0 || daily_rate <= Decimal::ZERO {
        return None;
    }
    let days_late = (late_seconds + 86_399) / 86_400;
    let amount = (daily_rate * Decimal::from(days_late)).round_dp(2);
    (amount > Decimal::ZERO).then_some(amount)
}

/// Payment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub fine_id: i64,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 50, message = "Payment method is required"))]
    pub payment_method: String,
}
