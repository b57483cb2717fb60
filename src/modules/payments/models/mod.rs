pub mod callback;
pub mod payment;

pub use callback::{
    CallbackItem, CallbackMetadata, MetadataMap, StkCallback, StkCallbackEnvelope,
    SUCCESS_RESULT_DESC,
};
pub use payment::{
    InitiatePaymentRequest, InitiatePaymentResponse, Payment, PaymentRow, PaymentStatus,
};
