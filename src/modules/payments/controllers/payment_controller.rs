use super::super::models::{InitiatePaymentRequest, InitiatePaymentResponse, Payment};
use super::super::services::{CallbackHandler, CallbackOutcome, PaymentService};
use crate::core::{AppError, Result};
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::{error, info, warn};

/// Payment controller for the STK push endpoints
///
/// Provides endpoints for:
/// - Starting a payment (`POST /pay`)
/// - Receiving the gateway result notification (`POST /callback`)
/// - Looking up a stored payment (`GET /payments/{payment_id}`)
pub struct PaymentController {
    payment_service: PaymentService,
    callback_handler: CallbackHandler,
}

impl PaymentController {
    pub fn new(payment_service: PaymentService, callback_handler: CallbackHandler) -> Self {
        Self {
            payment_service,
            callback_handler,
        }
    }

    /// Configure payment routes
    pub fn configure(cfg: &mut web::ServiceConfig, controller: web::Data<PaymentController>) {
        cfg.app_data(controller)
            .service(initiate_payment)
            .service(handle_callback)
            .service(get_payment);
    }

    /// Callback URL the gateway should post to for this request
    fn callback_url(&self, req: &HttpRequest) -> String {
        match self.payment_service.configured_callback_url() {
            Some(url) => url.to_string(),
            None => {
                let info = req.connection_info();
                format!("{}://{}/callback", info.scheme(), info.host())
            }
        }
    }
}

/// Start an STK push payment
///
/// POST /pay
///
/// # Request Body
/// * `{ "number": "2547...", "amount": 50 }`
///
/// # Returns
/// * `200 OK` - `{ message, payment_id, checkout_request_id }`
/// * `400 Bad Request` - number or amount missing
/// * `500 Internal Server Error` - token, push or persistence failure
#[post("/pay")]
async fn initiate_payment(
    req: HttpRequest,
    body: web::Json<InitiatePaymentRequest>,
    controller: web::Data<PaymentController>,
) -> HttpResponse {
    let callback_url = controller.callback_url(&req);

    match controller
        .payment_service
        .initiate_payment(&body, &callback_url)
        .await
    {
        Ok(initiated) => HttpResponse::Ok().json(InitiatePaymentResponse {
            message: "Payment initiated".to_string(),
            payment_id: initiated.payment_id,
            checkout_request_id: initiated.checkout_request_id,
        }),
        Err(AppError::Validation(msg)) => {
            warn!(reason = %msg, "Rejected payment request");
            HttpResponse::BadRequest().json(json!({
                "error": "Phone number and amount are required"
            }))
        }
        Err(e) => {
            error!(error = %e, "Payment initiation failed");
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to initiate payment"
            }))
        }
    }
}

/// Receive an STK push result notification
///
/// POST /callback
///
/// The gateway is always acknowledged once the envelope parses, including
/// when no payment matches or the status update fails, so that it does not
/// keep redelivering.
///
/// # Returns
/// * `200 OK` - `{ message }`
/// * `500 Internal Server Error` - payload could not be interpreted
#[post("/callback")]
async fn handle_callback(
    body: web::Bytes,
    controller: web::Data<PaymentController>,
) -> HttpResponse {
    match controller.callback_handler.handle_callback(&body).await {
        Ok(outcome) => {
            let checkout_request_id = match &outcome {
                CallbackOutcome::Completed {
                    checkout_request_id,
                    ..
                }
                | CallbackOutcome::Failed {
                    checkout_request_id,
                    ..
                } => checkout_request_id,
            };
            info!(checkout_request_id = %checkout_request_id, "Callback processed");
            HttpResponse::Ok().json(json!({ "message": "Callback processed" }))
        }
        Err(e @ AppError::Database(_)) => {
            error!(error = %e, "Callback status update failed");
            HttpResponse::Ok().json(json!({ "message": "Callback processed" }))
        }
        Err(e) => {
            error!(error = %e, "Callback processing failed");
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to process callback"
            }))
        }
    }
}

/// Fetch a stored payment
///
/// GET /payments/{payment_id}
///
/// # Returns
/// * `200 OK` - payment record
/// * `404 Not Found` - unknown payment_id
#[get("/payments/{payment_id}")]
async fn get_payment(
    path: web::Path<String>,
    controller: web::Data<PaymentController>,
) -> Result<web::Json<Payment>> {
    let payment = controller
        .payment_service
        .find_payment(&path.into_inner())
        .await?;
    Ok(web::Json(payment))
}
