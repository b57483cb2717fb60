use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse};

/// JsonConfig error handler: unreadable bodies become `400 { error }`
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected malformed JSON body");

    let response = HttpResponse::BadRequest().json(serde_json::json!({
        "error": "Invalid request body",
    }));
    actix_web::error::InternalError::from_response(err, response).into()
}
