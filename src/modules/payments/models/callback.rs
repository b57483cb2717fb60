use crate::core::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// ResultDesc the gateway sends for a successful payment
pub const SUCCESS_RESULT_DESC: &str = "The service request is processed successfully.";

/// `{ "Body": { "stkCallback": { ... } } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StkCallbackEnvelope {
    #[serde(rename = "Body")]
    pub body: StkCallbackBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StkCallbackBody {
    #[serde(rename = "stkCallback")]
    pub stk_callback: StkCallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkCallback {
    #[serde(rename = "MerchantRequestID", default)]
    pub merchant_request_id: Option<String>,

    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,

    /// Numeric in practice; kept loose since some relays stringify it
    #[serde(default)]
    pub result_code: Option<Value>,

    pub result_desc: String,

    /// Only sent for successful payments; typed lazily by [`StkCallback::metadata`]
    #[serde(default)]
    pub callback_metadata: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackMetadata {
    #[serde(rename = "Item", default)]
    pub items: Vec<CallbackItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackItem {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Value", default)]
    pub value: Option<Value>,
}

impl StkCallbackEnvelope {
    /// Parse a raw callback body
    pub fn parse(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload)
            .map_err(|e| AppError::malformed_callback(format!("Invalid STK callback: {}", e)))
    }
}

impl StkCallback {
    pub fn result_code(&self) -> Option<i64> {
        match self.result_code.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Whether the gateway reports the payment as successful
    ///
    /// ResultCode 0 decides when present; the ResultDesc sentinel is only
    /// consulted for payloads that carry no usable code.
    pub fn is_success(&self) -> bool {
        match self.result_code() {
            Some(code) => code == 0,
            None => self.result_desc == SUCCESS_RESULT_DESC,
        }
    }

    /// Metadata items keyed by name
    ///
    /// Only read on the success branch, so an absent or misshapen
    /// `CallbackMetadata` never blocks a failure update.
    pub fn metadata(&self) -> Result<MetadataMap> {
        let raw = self
            .callback_metadata
            .clone()
            .ok_or_else(|| AppError::malformed_callback("CallbackMetadata missing"))?;
        let metadata: CallbackMetadata = serde_json::from_value(raw).map_err(|e| {
            AppError::malformed_callback(format!("Invalid CallbackMetadata: {}", e))
        })?;
        Ok(MetadataMap::from_metadata(&metadata))
    }
}

/// Name-to-value lookup built once from `CallbackMetadata.Item`
#[derive(Debug, Clone, Default)]
pub struct MetadataMap(HashMap<String, Value>);

impl MetadataMap {
    pub fn from_metadata(metadata: &CallbackMetadata) -> Self {
        let map = metadata
            .items
            .iter()
            .filter_map(|item| item.value.clone().map(|value| (item.name.clone(), value)))
            .collect();
        Self(map)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Value of a required item rendered as text
    ///
    /// Numbers keep their JSON spelling, e.g. `254700000000`.
    pub fn require(&self, name: &str) -> Result<String> {
        match self.0.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(AppError::malformed_callback(format!(
                "CallbackMetadata item {} has unexpected value {}",
                name, other
            ))),
            None => Err(AppError::malformed_callback(format!(
                "CallbackMetadata item {} missing",
                name
            ))),
        }
    }
}
