pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::PaymentController;
pub use models::{
    InitiatePaymentRequest, InitiatePaymentResponse, Payment, PaymentStatus, StkCallbackEnvelope,
};
pub use repositories::{MySqlPaymentRepository, PaymentRepository};
pub use services::{CallbackHandler, CallbackOutcome, InitiatedPayment, PaymentService};
