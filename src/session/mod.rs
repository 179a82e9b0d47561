//! Session state and its durable mirror.
//!
//! DESIGN
//! ======
//! `Session` is a plain value; every mutation is a `SessionEvent` applied by
//! the pure `Session::apply`, so transitions can be audited and tested
//! without storage. `SessionStore` wraps the value in a lock, persists each
//! change to `SessionStorage`, and is shared by `Arc` between the auth
//! controller and the HTTP pipeline.

mod state;
mod store;

pub use state::{Access, Session, SessionEvent};
pub use store::{LoginGrant, SessionStore};
