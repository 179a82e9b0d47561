//! Typed wrappers over the remote panel API.
//!
//! ARCHITECTURE
//! ============
//! Each service borrows an `ApiClient` and maps one method to one request.
//! Responses are returned as JSON: the business rules behind them live on
//! the server, so the client does not pin their shapes beyond what callers
//! send.

pub mod auth;
pub mod categories;
pub mod inquiries;
pub mod jeweler;
pub mod products;
pub mod subscriptions;
pub mod uploads;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use inquiries::{InquiryQuery, InquiryReply, InquiryService};
pub use jeweler::JewelerService;
pub use products::{ProductQuery, ProductService, SortOrder};
pub use subscriptions::SubscriptionService;
pub use uploads::{MediaOrder, UploadCategory, UploadService};

use crate::http::ApiClient;

impl ApiClient {
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    #[must_use]
    pub fn jewelers(&self) -> JewelerService<'_> {
        JewelerService { client: self }
    }

    #[must_use]
    pub fn products(&self) -> ProductService<'_> {
        ProductService { client: self }
    }

    #[must_use]
    pub fn inquiries(&self) -> InquiryService<'_> {
        InquiryService { client: self }
    }

    #[must_use]
    pub fn subscriptions(&self) -> SubscriptionService<'_> {
        SubscriptionService { client: self }
    }

    #[must_use]
    pub fn categories(&self) -> CategoryService<'_> {
        CategoryService { client: self }
    }

    #[must_use]
    pub fn uploads(&self) -> UploadService<'_> {
        UploadService { client: self }
    }
}

#[cfg(test)]
#[path = "services_test.rs"]
mod tests;
