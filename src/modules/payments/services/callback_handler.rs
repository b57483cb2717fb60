use super::super::models::StkCallbackEnvelope;
use super::super::repositories::PaymentRepository;
use crate::core::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// What a processed callback did to the stored payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Completed {
        checkout_request_id: String,
        receipt_number: String,
        amount: String,
        phone_number: String,
        rows_affected: u64,
    },
    Failed {
        checkout_request_id: String,
        result_desc: String,
        rows_affected: u64,
    },
}

/// Applies STK push result notifications to stored payments
///
/// Not idempotent: a repeated success notification re-runs the update,
/// which by then matches nothing since transaction_id holds the receipt.
#[derive(Clone)]
pub struct CallbackHandler {
    repository: Arc<dyn PaymentRepository>,
}

impl CallbackHandler {
    pub fn new(repository: Arc<dyn PaymentRepository>) -> Self {
        Self { repository }
    }

    /// Process a raw callback body
    ///
    /// # Errors
    /// * `MalformedCallback` - envelope shape is wrong, or a success callback lacks
    ///   Amount, MpesaReceiptNumber or PhoneNumber
    /// * `Database` - the status update failed
    pub async fn handle_callback(&self, payload: &[u8]) -> Result<CallbackOutcome> {
        let callback = StkCallbackEnvelope::parse(payload)?.body.stk_callback;
        let checkout_request_id = callback.checkout_request_id.clone();

        if callback.is_success() {
            let metadata = callback.metadata()?;
            let amount = metadata.require("Amount")?;
            let receipt_number = metadata.require("MpesaReceiptNumber")?;
            let phone_number = metadata.require("PhoneNumber")?;

            let rows_affected = self
                .repository
                .mark_completed(&checkout_request_id, &receipt_number)
                .await?;

            if rows_affected == 0 {
                warn!(
                    checkout_request_id = %checkout_request_id,
                    "No payment matched completed callback"
                );
            }

            info!(
                checkout_request_id = %checkout_request_id,
                amount = %amount,
                "Payment completed for {} with receipt {}",
                phone_number,
                receipt_number
            );

            Ok(CallbackOutcome::Completed {
                checkout_request_id,
                receipt_number,
                amount,
                phone_number,
                rows_affected,
            })
        } else {
            let rows_affected = self.repository.mark_failed(&checkout_request_id).await?;

            warn!(
                checkout_request_id = %checkout_request_id,
                result_code = ?callback.result_code(),
                result_desc = %callback.result_desc,
                rows_affected,
                "Payment failed for transaction {}",
                checkout_request_id
            );

            Ok(CallbackOutcome::Failed {
                checkout_request_id,
                result_desc: callback.result_desc,
                rows_affected,
            })
        }
    }
}
