use crate::core::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mobile-money gateway that can prompt a payer's device (STK push)
#[async_trait]
pub trait StkPushGateway: Send + Sync {
    /// Exchange the configured consumer credentials for a bearer token
    ///
    /// A fresh token is requested on every call; nothing is cached.
    async fn fetch_access_token(&self) -> Result<String>;

    /// Send an STK push request authorised by `access_token`
    async fn stk_push(&self, access_token: &str, request: &StkPushRequest)
        -> Result<StkPushAccepted>;

    /// Get gateway name
    fn name(&self) -> &str;
}

/// STK push request body as the gateway expects it on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkPushRequest {
    pub business_short_code: String,

    /// base64(shortcode + passkey + timestamp)
    pub password: String,

    /// `YYYYMMDDHHmmss`, same value used to build `password`
    pub timestamp: String,

    pub transaction_type: String,

    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,

    /// Paying phone number
    pub party_a: String,

    /// Receiving shortcode
    pub party_b: String,

    pub phone_number: String,

    #[serde(rename = "CallBackURL")]
    pub callback_url: String,

    /// Our payment_id, echoed back by the gateway
    pub account_reference: String,

    pub transaction_desc: String,
}

/// A push the gateway accepted for processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StkPushAccepted {
    pub merchant_request_id: Option<String>,

    /// Handle the asynchronous callback will reference
    pub checkout_request_id: String,

    pub customer_message: Option<String>,
}
