use serde_json::Value;

use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest};

pub struct CategoryService<'a> {
    pub(super) client: &'a ApiClient,
}

#[allow(clippy::missing_errors_doc)]
impl CategoryService<'_> {
    pub async fn all(&self) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get("/categories")).await
    }

    pub async fn hierarchical(&self) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get("/categories/hierarchical")).await
    }

    pub async fn popular(&self, limit: Option<u32>) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::get("/categories/popular").query_opt("limit", limit))
            .await
    }

    pub async fn search(&self, q: &str) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::get("/categories/search").query("q", q))
            .await
    }

    pub async fn by_id(&self, id: &str) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get(format!("/categories/{id}"))).await
    }

    pub async fn by_slug(&self, slug: &str) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::get(format!("/categories/slug/{slug}")))
            .await
    }
}
