use base64::prelude::*;

/// Value for the `Authorization: Basic ...` header of the token endpoint
///
/// Base64 of `consumer_key:consumer_secret`, without the `Basic ` prefix.
pub fn basic_auth_token(consumer_key: &str, consumer_secret: &str) -> String {
    BASE64_STANDARD.encode(format!("{}:{}", consumer_key, consumer_secret))
}

/// STK push password: base64 of `shortcode + passkey + timestamp`, no delimiter
pub fn stk_password(shortcode: &str, passkey: &str, timestamp: &str) -> String {
    BASE64_STANDARD.encode(format!("{}{}{}", shortcode, passkey, timestamp))
}
