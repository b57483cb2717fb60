use crate::core::{AppError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Payment lifecycle status
///
/// Rows start as `pending` (column default) and are moved exactly once by
/// the callback handler to `completed` or `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

/// Payment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Generated UUID, also sent to the gateway as AccountReference
    pub payment_id: String,

    /// Payer phone number
    pub number: String,

    pub amount: Decimal,

    /// CheckoutRequestID while pending, M-Pesa receipt number once completed
    pub transaction_id: Option<String>,

    pub status: PaymentStatus,
}

impl Payment {
    /// New pending payment for an accepted STK push
    pub fn pending(
        payment_id: String,
        number: String,
        amount: Decimal,
        checkout_request_id: String,
    ) -> Self {
        Self {
            payment_id,
            number,
            amount,
            transaction_id: Some(checkout_request_id),
            status: PaymentStatus::Pending,
        }
    }
}

/// Raw `payments` row
#[derive(Debug, Clone, FromRow)]
pub struct PaymentRow {
    pub payment_id: String,
    pub number: String,
    pub amount: Decimal,
    pub transaction_id: Option<String>,
    pub status: String,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = AppError;

    fn try_from(row: PaymentRow) -> Result<Self> {
        let status = row.status.parse().map_err(AppError::Internal)?;
        Ok(Payment {
            payment_id: row.payment_id,
            number: row.number,
            amount: row.amount,
            transaction_id: row.transaction_id,
            status,
        })
    }
}

/// POST /pay body
///
/// Both fields are optional at the type level so that a missing field is
/// reported as a validation failure rather than a JSON parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitiatePaymentRequest {
    #[serde(default)]
    pub number: Option<String>,

    #[serde(default)]
    pub amount: Option<Decimal>,
}

impl InitiatePaymentRequest {
    /// Return the phone number and amount, or a validation error if either is missing
    ///
    /// A blank number, a zero/negative amount, or an amount finer than
    /// cents counts as missing.
    pub fn validate(&self) -> Result<(String, Decimal)> {
        let number = self
            .number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        let amount = self
            .amount
            .filter(|a| *a > Decimal::ZERO && a.normalize().scale() <= 2);

        match (number, amount) {
            (Some(number), Some(amount)) => Ok((number.to_string(), amount)),
            _ => Err(AppError::validation("Phone number and amount are required")),
        }
    }
}

/// POST /pay success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePaymentResponse {
    pub message: String,
    pub payment_id: String,
    pub checkout_request_id: String,
}
