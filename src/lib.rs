//! M-Pesa STK push payment service
//!
//! Starts mobile-money payments against the Daraja gateway and records their
//! outcome from the gateway's asynchronous callback.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

use actix_web::web;

// Re-export commonly used types
pub use modules::gateways;
pub use modules::payments;

/// Register every route plus the shared JSON extractor configuration
///
/// `/ready` additionally expects a `web::Data<MySqlPool>` on the app.
pub fn configure_routes(
    cfg: &mut web::ServiceConfig,
    payment_controller: web::Data<payments::PaymentController>,
) {
    cfg.app_data(web::JsonConfig::default().error_handler(middleware::json_error_handler));
    modules::health::configure(cfg);
    payments::PaymentController::configure(cfg, payment_controller);
}
