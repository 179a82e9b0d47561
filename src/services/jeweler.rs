//! Gallery profile endpoints.
//!
//! Working hours, location, logo and cover all travel inside the profile
//! body; the server validates them.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest};

pub struct JewelerService<'a> {
    pub(super) client: &'a ApiClient,
}

impl JewelerService<'_> {
    /// Register the logged-in user's gallery.
    ///
    /// # Errors
    ///
    /// Propagates the pipeline failure unchanged.
    pub async fn register(&self, profile: Value) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::post("/jewelers").json(profile)).await
    }

    /// # Errors
    ///
    /// Propagates the pipeline failure unchanged.
    pub async fn profile(&self) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get("/jewelers/profile")).await
    }

    /// Partial update; only the fields present in `changes` are touched.
    ///
    /// # Errors
    ///
    /// Propagates the pipeline failure unchanged.
    pub async fn update_profile(&self, changes: Value) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::patch("/jewelers/profile").json(changes)).await
    }

    /// # Errors
    ///
    /// Propagates the pipeline failure unchanged.
    pub async fn by_id(&self, id: &str) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get(format!("/jewelers/{id}"))).await
    }

    /// # Errors
    ///
    /// Propagates the pipeline failure unchanged.
    pub async fn list(&self, page: Option<u32>, limit: Option<u32>) -> Result<Value, ApiError> {
        let request = ApiRequest::get("/jewelers")
            .query_opt("page", page)
            .query_opt("limit", limit);
        self.client.send(request).await
    }

    /// # Errors
    ///
    /// Propagates the pipeline failure unchanged.
    pub async fn active(&self, city: Option<&str>) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::get("/jewelers/active").query_opt("city", city))
            .await
    }

    /// # Errors
    ///
    /// Propagates the pipeline failure unchanged.
    pub async fn featured(&self, limit: Option<u32>) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::get("/jewelers/featured").query_opt("limit", limit))
            .await
    }
}
