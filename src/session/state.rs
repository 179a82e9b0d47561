//! Session value and transition events.

use serde_json::Value;

/// Authentication state for the current merchant.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Profile snapshot returned at login; opaque to this crate.
    pub principal: Option<Value>,
    /// True before hydration and while a login is in flight.
    pub is_loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self { access_token: None, refresh_token: None, principal: None, is_loading: true }
    }
}

/// Tagged transitions applied through [`Session::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LoginSucceeded { access_token: String, refresh_token: Option<String>, principal: Value },
    LoggedOut,
    LoadingChanged(bool),
    PrincipalUpdated(Value),
    /// A refresh minted a new access token; `refresh_token` is set only when
    /// the server rotated it.
    TokensRefreshed { access_token: String, refresh_token: Option<String> },
}

/// What a protected view should do with the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Hydration or login still running.
    Pending,
    LoginRequired,
    Granted,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.principal.is_some()
    }

    #[must_use]
    pub fn access(&self) -> Access {
        if self.is_loading {
            Access::Pending
        } else if self.is_authenticated() {
            Access::Granted
        } else {
            Access::LoginRequired
        }
    }

    /// Apply one transition and return the next state.
    #[must_use]
    pub fn apply(self, event: &SessionEvent) -> Self {
        match event {
            SessionEvent::LoginSucceeded { access_token, refresh_token, principal } => Self {
                access_token: Some(access_token.clone()),
                refresh_token: refresh_token.clone(),
                principal: Some(principal.clone()),
                is_loading: false,
            },
            SessionEvent::LoggedOut => Self {
                access_token: None,
                refresh_token: None,
                principal: None,
                is_loading: false,
            },
            SessionEvent::LoadingChanged(is_loading) => Self { is_loading: *is_loading, ..self },
            SessionEvent::PrincipalUpdated(principal) => Self { principal: Some(principal.clone()), ..self },
            SessionEvent::TokensRefreshed { access_token, refresh_token } => Self {
                access_token: Some(access_token.clone()),
                refresh_token: refresh_token.clone().or(self.refresh_token),
                ..self
            },
        }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
