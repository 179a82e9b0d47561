//! Client core for the jewelry-gallery merchant panel.
//!
//! ARCHITECTURE
//! ============
//! `SessionStore` owns the token pair and principal snapshot and mirrors them
//! into durable storage. `ApiClient` is the single outbound gateway: it
//! attaches the bearer token and recovers from expired access tokens with one
//! refresh-and-replay. `AuthController` drives OTP login/logout on top of both,
//! and `services` wraps the remote storefront endpoints.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod jalali;
pub mod services;
pub mod session;
pub mod storage;
pub mod validate;

pub use auth::{AuthController, VerifyOtpResponse};
pub use config::PanelConfig;
pub use error::ApiError;
pub use http::{ApiClient, ApiRequest, Navigator};
pub use session::{Access, LoginGrant, Session, SessionEvent, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
