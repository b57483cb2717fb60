pub mod services;

pub use services::{
    basic_auth_token, stk_password, MpesaClient, StkPushAccepted, StkPushGateway, StkPushRequest,
};
