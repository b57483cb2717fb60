pub mod callback_handler;
pub mod payment_service;

pub use callback_handler::{CallbackHandler, CallbackOutcome};
pub use payment_service::{InitiatedPayment, PaymentService};
