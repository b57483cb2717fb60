use super::credentials::basic_auth_token;
use super::gateway_trait::{StkPushAccepted, StkPushGateway, StkPushRequest};
use crate::config::MpesaConfig;
use crate::core::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const TOKEN_PATH: &str = "/oauth/v1/generate?grant_type=client_credentials";
const STK_PUSH_PATH: &str = "/mpesa/stkpush/v1/processrequest";

/// M-Pesa Daraja client
///
/// Implements StkPushGateway against the Daraja OAuth and STK push endpoints.
/// API Documentation: https://developer.safaricom.co.ke/APIs/MpesaExpressSimulate
pub struct MpesaClient {
    client: Client,
    base_url: String,
    basic_auth: String,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StkPushResponse {
    #[serde(rename = "MerchantRequestID", default)]
    merchant_request_id: Option<String>,
    #[serde(rename = "CheckoutRequestID", default)]
    checkout_request_id: Option<String>,
    #[serde(default)]
    response_code: Option<String>,
    #[serde(default)]
    response_description: Option<String>,
    #[serde(default)]
    customer_message: Option<String>,
}

impl MpesaClient {
    /// Create a new M-Pesa client
    ///
    /// # Arguments
    /// * `config` - Consumer credentials and gateway base URL
    pub fn new(config: &MpesaConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client that reuses an existing reqwest connection pool
    pub fn with_client(client: Client, config: &MpesaConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            basic_auth: basic_auth_token(&config.consumer_key, &config.consumer_secret),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl StkPushGateway for MpesaClient {
    async fn fetch_access_token(&self) -> Result<String> {
        let response = self
            .client
            .get(self.url(TOKEN_PATH))
            .header("Authorization", format!("Basic {}", self.basic_auth))
            .send()
            .await
            .map_err(|e| AppError::access_token(format!("M-Pesa token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::access_token(format!(
                "M-Pesa token endpoint returned {}",
                status
            )));
        }

        let token: AccessTokenResponse = response.json().await.map_err(|e| {
            AppError::access_token(format!("Failed to parse M-Pesa token response: {}", e))
        })?;

        if token.access_token.is_empty() {
            return Err(AppError::access_token("M-Pesa returned an empty access token"));
        }

        Ok(token.access_token)
    }

    async fn stk_push(
        &self,
        access_token: &str,
        request: &StkPushRequest,
    ) -> Result<StkPushAccepted> {
        let response = self
            .client
            .post(self.url(STK_PUSH_PATH))
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    AppError::gateway(format!(
                        "M-Pesa gateway unavailable: {} ({})",
                        if e.is_timeout() {
                            "timeout"
                        } else {
                            "connection failed"
                        },
                        e
                    ))
                } else {
                    AppError::gateway(format!("M-Pesa STK push request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::gateway(format!("Failed to read M-Pesa response: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::gateway(format!(
                "M-Pesa STK push error {}: {}",
                status, body
            )));
        }

        let push: StkPushResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::gateway(format!("Failed to parse M-Pesa response: {}", e)))?;

        if let Some(code) = push.response_code.as_deref() {
            if code != "0" {
                return Err(AppError::gateway(format!(
                    "M-Pesa rejected STK push ({}): {}",
                    code,
                    push.response_description.unwrap_or_default()
                )));
            }
        }

        let checkout_request_id = push
            .checkout_request_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::gateway("M-Pesa response missing CheckoutRequestID"))?;

        Ok(StkPushAccepted {
            merchant_request_id: push.merchant_request_id,
            checkout_request_id,
            customer_message: push.customer_message,
        })
    }

    fn name(&self) -> &str {
        "mpesa"
    }
}
