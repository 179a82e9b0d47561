//! HTTP client pipeline: the single outbound gateway to the panel API.
//!
//! DESIGN
//! ======
//! Every request carries the current access token as a bearer credential.
//! A failure the classifier marks as unauthorized gets one recovery attempt:
//! refresh the access token with the stored refresh token, then replay the
//! original request once. If there is no refresh token, or the refresh itself
//! fails, the session is cleared and the navigator is sent to login.
//!
//! CONCURRENCY
//! ===========
//! Recovery runs behind `refresh_gate`. A request that waited on the gate
//! compares the token it was sent with against the current one: a different
//! token means another request already refreshed, so it replays with that
//! token instead of spending the refresh token again. An emptied session
//! means another request already tore it down, so the original failure is
//! returned without a second navigation.
//!
//! A refresh result is stored only if the session did not change while the
//! refresh was in flight. After a logout or a new login it is dropped and
//! the original failure is returned.

mod hooks;
mod request;

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub use hooks::{DefaultClassifier, FailureClass, INACTIVE_ACCOUNT_MESSAGE, LogNavigator, Navigator, ResponseClassifier};
pub use request::{ApiRequest, FileUpload, FormPart, PartContent, RequestBody};

use crate::config::PanelConfig;
use crate::error::ApiError;
use crate::session::SessionStore;

const REFRESH_PATH: &str = "/auth/refresh";

/// Cheap to clone. Clones share one session and one refresh gate.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: PanelConfig,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    classifier: Arc<dyn ResponseClassifier>,
    refresh_gate: Mutex<()>,
}

pub struct ApiClientBuilder {
    config: PanelConfig,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    classifier: Arc<dyn ResponseClassifier>,
}

impl ApiClientBuilder {
    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    #[must_use]
    pub fn classifier(mut self, classifier: Arc<dyn ResponseClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.config.timeouts.request())
            .connect_timeout(self.config.timeouts.connect())
            .build()?;

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                config: self.config,
                session: self.session,
                navigator: self.navigator,
                classifier: self.classifier,
                refresh_gate: Mutex::new(()),
            }),
        })
    }
}

/// Tokens minted by the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RefreshedTokens {
    access_token: String,
    refresh_token: Option<String>,
}

impl ApiClient {
    /// Start building a client with the logging navigator and default
    /// classifier.
    #[must_use]
    pub fn builder(config: PanelConfig, session: Arc<SessionStore>) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            session,
            navigator: Arc::new(LogNavigator),
            classifier: Arc::new(DefaultClassifier),
        }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.inner.session
    }

    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.inner.config
    }

    /// Send `request`, recovering once from an expired access token.
    ///
    /// # Errors
    ///
    /// Returns the transport or status failure of the request (or of its
    /// replay), or the refresh failure when recovery could not mint a token.
    pub async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let revision = self.inner.session.revision();
        let sent_with = self.inner.session.access_token();

        let err = match self.dispatch(&request, sent_with.as_deref()).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let class = self.inner.classifier.classify(&err);
        if class == FailureClass::InactiveAccount {
            self.inner
                .navigator
                .account_inactive(err.server_message().unwrap_or(INACTIVE_ACCOUNT_MESSAGE));
        }
        if !class.is_recoverable() || !request.recover {
            return Err(err);
        }

        let token = self.recover_access(sent_with, revision, err).await?;
        debug!(method = %request.method, path = %request.path, "replaying request with refreshed token");
        self.dispatch(&request, Some(&token)).await
    }

    async fn recover_access(&self, sent_with: Option<String>, revision: u64, original: ApiError) -> Result<String, ApiError> {
        let _gate = self.inner.refresh_gate.lock().await;
        let session = &self.inner.session;
        // Read before the tokens so any later transition fails the store below.
        let refreshing_at = session.revision();

        let current = session.access_token();
        if current != sent_with || (current.is_none() && refreshing_at != revision) {
            return current.ok_or(original);
        }

        let Some(refresh_token) = session.refresh_token() else {
            warn!("unauthorized with no refresh token; ending session");
            self.end_session();
            return Err(original);
        };

        match self.refresh(&refresh_token).await {
            Ok(tokens) => {
                let stored =
                    session.store_refreshed(refreshing_at, &tokens.access_token, tokens.refresh_token.as_deref())?;
                if !stored {
                    debug!("session changed during refresh; discarding refreshed token");
                    return Err(original);
                }
                info!(rotated = tokens.refresh_token.is_some(), "access token refreshed");
                Ok(tokens.access_token)
            }
            Err(e) if session.revision() != refreshing_at => {
                debug!(error = %e, "refresh failed after the session changed; leaving it as is");
                Err(e)
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed; ending session");
                self.end_session();
                Err(e)
            }
        }
    }

    /// Call the refresh endpoint directly; it never goes through recovery.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, ApiError> {
        debug!("refreshing access token");
        let response = self
            .inner
            .http
            .post(self.inner.config.endpoint(REFRESH_PATH))
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await?;
        parse_refresh(read_body(response).await?)
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> Result<Value, ApiError> {
        let url = self.inner.config.endpoint(&request.path);
        let mut builder = self.inner.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(parts) => builder.multipart(request::build_form(parts)?),
        };

        debug!(method = %request.method, path = %request.path, authorized = token.is_some(), "dispatching request");
        let response = builder.send().await?;
        read_body(response).await
    }

    fn end_session(&self) {
        self.inner.session.clear();
        self.inner.navigator.to_login();
    }
}

async fn read_body(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::from_status(status.as_u16(), &text));
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Accept a bare token string, or an object carrying `accessToken` and an
/// optional rotated `refreshToken`.
fn parse_refresh(body: Value) -> Result<RefreshedTokens, ApiError> {
    let non_empty = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    match &body {
        Value::String(token) if !token.is_empty() => Ok(RefreshedTokens { access_token: token.clone(), refresh_token: None }),
        Value::Object(fields) => {
            let access_token = non_empty(fields.get("accessToken")).ok_or(ApiError::MalformedRefresh)?;
            Ok(RefreshedTokens { access_token, refresh_token: non_empty(fields.get("refreshToken")) })
        }
        _ => Err(ApiError::MalformedRefresh),
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
