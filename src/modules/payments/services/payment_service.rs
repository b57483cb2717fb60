use super::super::models::{InitiatePaymentRequest, Payment};
use super::super::repositories::PaymentRepository;
use crate::config::MpesaConfig;
use crate::core::{current_timestamp, AppError, Result};
use crate::modules::gateways::{stk_password, StkPushGateway, StkPushRequest};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Result of a successful initiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatedPayment {
    pub payment_id: String,
    pub checkout_request_id: String,
}

/// Payment service for starting STK push payments
///
/// Orchestrates token acquisition, the push request and persistence of the
/// pending record. Nothing is cleaned up on failure: if the push fails the
/// record is simply never written.
#[derive(Clone)]
pub struct PaymentService {
    gateway: Arc<dyn StkPushGateway>,
    repository: Arc<dyn PaymentRepository>,
    mpesa: MpesaConfig,
}

impl PaymentService {
    /// Create a new PaymentService
    ///
    /// # Arguments
    /// * `gateway` - STK push gateway
    /// * `repository` - Payment storage
    /// * `mpesa` - Shortcode, passkey and fixed push parameters
    pub fn new(
        gateway: Arc<dyn StkPushGateway>,
        repository: Arc<dyn PaymentRepository>,
        mpesa: MpesaConfig,
    ) -> Self {
        Self {
            gateway,
            repository,
            mpesa,
        }
    }

    /// Callback URL from configuration, if one is pinned
    pub fn configured_callback_url(&self) -> Option<&str> {
        self.mpesa.callback_url.as_deref()
    }

    /// Start a payment
    ///
    /// # Arguments
    /// * `request` - Phone number and amount from the client
    /// * `callback_url` - Where the gateway should post the result
    ///
    /// # Errors
    /// * `Validation` - number or amount missing; nothing is sent or stored
    /// * `AccessToken` - token exchange failed; nothing is stored
    /// * `Gateway` - push failed or the reply had no CheckoutRequestID
    /// * `Database` - the pending record could not be written
    pub async fn initiate_payment(
        &self,
        request: &InitiatePaymentRequest,
        callback_url: &str,
    ) -> Result<InitiatedPayment> {
        self.initiate_payment_at(request, callback_url, &current_timestamp())
            .await
    }

    /// Same as [`initiate_payment`](Self::initiate_payment) with an explicit gateway timestamp
    pub async fn initiate_payment_at(
        &self,
        request: &InitiatePaymentRequest,
        callback_url: &str,
        timestamp: &str,
    ) -> Result<InitiatedPayment> {
        let (number, amount) = request.validate()?;

        let payment_id = Uuid::new_v4().to_string();
        let password = stk_password(&self.mpesa.shortcode, &self.mpesa.passkey, timestamp);

        let access_token = self.gateway.fetch_access_token().await?;

        let push = StkPushRequest {
            business_short_code: self.mpesa.shortcode.clone(),
            password,
            timestamp: timestamp.to_string(),
            transaction_type: self.mpesa.transaction_type.clone(),
            amount,
            party_a: number.clone(),
            party_b: self.mpesa.shortcode.clone(),
            phone_number: number.clone(),
            callback_url: callback_url.to_string(),
            account_reference: payment_id.clone(),
            transaction_desc: self.mpesa.transaction_desc.clone(),
        };

        let accepted = self.gateway.stk_push(&access_token, &push).await?;

        let payment = Payment::pending(
            payment_id.clone(),
            number.clone(),
            amount,
            accepted.checkout_request_id.clone(),
        );
        self.repository.create(&payment).await?;

        info!(
            payment_id = %payment_id,
            checkout_request_id = %accepted.checkout_request_id,
            gateway = self.gateway.name(),
            "Payment initiated for {} with amount {}",
            number,
            amount
        );

        Ok(InitiatedPayment {
            payment_id,
            checkout_request_id: accepted.checkout_request_id,
        })
    }

    /// Look up a payment by its payment_id
    pub async fn find_payment(&self, payment_id: &str) -> Result<Payment> {
        self.repository
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment {}", payment_id)))
    }
}
