use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
///
/// The `Display` output carries internal detail for logs only. Clients see
/// [`AppError::public_message`], which never includes the cause.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Missing or unusable request input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Gateway OAuth token exchange failed
    #[error("Access token error: {0}")]
    AccessToken(String),

    /// STK push request failed or returned an unusable response
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Callback envelope did not have the expected shape
    #[error("Malformed callback: {0}")]
    MalformedCallback(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn access_token(msg: impl Into<String>) -> Self {
        AppError::AccessToken(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        AppError::Gateway(msg.into())
    }

    pub fn malformed_callback(msg: impl Into<String>) -> Self {
        AppError::MalformedCallback(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    /// Fixed message safe to return to a caller
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Invalid request",
            AppError::NotFound(_) => "Resource not found",
            _ => "Internal server error",
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.public_message(),
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AccessToken(_)
            | AppError::Gateway(_)
            | AppError::MalformedCallback(_)
            | AppError::Database(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
