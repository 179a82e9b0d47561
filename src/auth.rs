//! OTP login flow on top of the session store and the pipeline.
//!
//! STATE
//! =====
//! `idle -> verifying -> authenticated` on success, back to `idle` on any
//! failure. Only `is_loading` is visible from outside; requesting an OTP does
//! not touch it.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::session::{LoginGrant, Session, SessionStore};

/// Body of a successful `POST /auth/verify-otp`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub jeweler: Option<Value>,
    /// Everything else the server sends (`isNewUser`, `message`, ...).
    #[serde(flatten)]
    pub flags: Map<String, Value>,
}

impl VerifyOtpResponse {
    /// The logged-in principal: `user`, falling back to `jeweler`.
    #[must_use]
    pub fn principal(&self) -> Option<&Value> {
        self.user
            .as_ref()
            .filter(|v| !v.is_null())
            .or_else(|| self.jeweler.as_ref().filter(|v| !v.is_null()))
    }

    fn grant(&self) -> Result<LoginGrant, ApiError> {
        let principal = self.principal().ok_or(ApiError::MissingField("user"))?;
        Ok(LoginGrant {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            principal: principal.clone(),
        })
    }
}

pub struct AuthController {
    client: ApiClient,
    user_type: String,
}

impl AuthController {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let user_type = client.config().user_type.clone();
        Self { client, user_type }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn store(&self) -> &Arc<SessionStore> {
        self.client.session()
    }

    /// Ask the server to text a one-time code to `phone`.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error unchanged.
    pub async fn request_otp(&self, phone: &str) -> Result<Value, ApiError> {
        self.client.auth().send_otp(phone).await
    }

    /// Verify `otp` for `phone` and, on success, replace the session.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error unchanged, `ApiError::Decode` for a body
    /// without an access token, `ApiError::MissingField` when no principal
    /// came back, or `ApiError::Storage` if the session could not be
    /// persisted. The session is untouched in every error case apart from
    /// `is_loading` returning to `false`.
    pub async fn verify_and_login(&self, phone: &str, otp: &str) -> Result<VerifyOtpResponse, ApiError> {
        self.store().set_loading(true);
        let result = self.verify(phone, otp).await;
        if let Err(e) = &result {
            warn!(error = %e, "otp verification failed");
            self.store().set_loading(false);
        }
        result
    }

    async fn verify(&self, phone: &str, otp: &str) -> Result<VerifyOtpResponse, ApiError> {
        let body = self.client.auth().verify_otp(phone, otp, &self.user_type).await?;
        let response: VerifyOtpResponse = serde_json::from_value(body)?;
        self.store().set(&response.grant()?)?;
        info!(user_type = %self.user_type, "logged in");
        Ok(response)
    }

    /// Drop the session locally. No request is made.
    pub fn logout(&self) {
        self.store().clear();
        info!("logged out");
    }

    /// Store an edited principal, typically after a profile update.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the principal could not be persisted.
    pub fn update_principal(&self, principal: Value) -> Result<(), ApiError> {
        self.store().update_principal(principal)?;
        Ok(())
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.store().snapshot()
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
