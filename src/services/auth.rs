//! OTP login endpoints.
//!
//! Both calls skip 401 recovery: before login there is no session to
//! refresh, and a rejected code must reach the caller as-is.

use serde_json::{Value, json};

use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest};

pub struct AuthService<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/send-otp`.
    ///
    /// # Errors
    ///
    /// Propagates the pipeline failure unchanged.
    pub async fn send_otp(&self, phone_number: &str) -> Result<Value, ApiError> {
        let request = ApiRequest::post("/auth/send-otp")
            .json(json!({ "phoneNumber": phone_number }))
            .without_recovery();
        self.client.send(request).await
    }

    /// `POST /auth/verify-otp`.
    ///
    /// # Errors
    ///
    /// Propagates the pipeline failure unchanged.
    pub async fn verify_otp(&self, phone_number: &str, otp_code: &str, user_type: &str) -> Result<Value, ApiError> {
        let request = ApiRequest::post("/auth/verify-otp")
            .json(json!({
                "phoneNumber": phone_number,
                "otpCode": otp_code,
                "userType": user_type,
            }))
            .without_recovery();
        self.client.send(request).await
    }
}
