//! Extension points the pipeline calls out to.

use tracing::{info, warn};

use crate::error::ApiError;

/// Server message for a merchant whose gallery is missing or deactivated.
pub const INACTIVE_ACCOUNT_MESSAGE: &str = "Jeweler not found or inactive";

/// Side effects the pipeline asks the embedding application to perform.
pub trait Navigator: Send + Sync {
    /// The session was torn down; send the user back to the login entry point.
    fn to_login(&self);

    /// The server reported the merchant account as missing or inactive.
    /// Called before the normal 401 handling continues.
    fn account_inactive(&self, _message: &str) {}
}

/// Navigator that only logs; for embedders with no routing of their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn to_login(&self) {
        info!("session ended; login required");
    }

    fn account_inactive(&self, message: &str) {
        warn!(message, "account reported inactive");
    }
}

/// How the pipeline treats a failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Expired or rejected access token; eligible for refresh-and-replay.
    Unauthorized,
    /// Unauthorized, and the server says the account is missing or inactive.
    InactiveAccount,
    /// Propagated unchanged.
    Other,
}

impl FailureClass {
    #[must_use]
    pub fn is_recoverable(self) -> bool {
        !matches!(self, Self::Other)
    }
}

pub trait ResponseClassifier: Send + Sync {
    fn classify(&self, error: &ApiError) -> FailureClass;
}

/// 401 is unauthorized; a 401 carrying [`INACTIVE_ACCOUNT_MESSAGE`] is an
/// inactive account; everything else passes through.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultClassifier;

impl ResponseClassifier for DefaultClassifier {
    fn classify(&self, error: &ApiError) -> FailureClass {
        if !error.is_unauthorized() {
            return FailureClass::Other;
        }
        if error.server_message() == Some(INACTIVE_ACCOUNT_MESSAGE) {
            FailureClass::InactiveAccount
        } else {
            FailureClass::Unauthorized
        }
    }
}
