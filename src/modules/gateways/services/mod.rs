pub mod credentials;
pub mod gateway_trait;
pub mod mpesa;

pub use credentials::{basic_auth_token, stk_password};
pub use gateway_trait::{StkPushAccepted, StkPushGateway, StkPushRequest};
pub use mpesa::MpesaClient;
