//! Product catalogue endpoints.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Listing filters for the merchant's own products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub search: Option<String>,
    pub category_id: Option<String>,
}

impl ProductQuery {
    /// Newest product only; what the dashboard summary asks for.
    #[must_use]
    pub fn latest() -> Self {
        Self {
            page: Some(1),
            limit: Some(1),
            sort_by: Some("createdAt".to_owned()),
            sort_order: Some(SortOrder::Desc),
            ..Self::default()
        }
    }

    fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query_opt("page", self.page)
            .query_opt("limit", self.limit)
            .query_opt("sortBy", self.sort_by.as_deref())
            .query_opt("sortOrder", self.sort_order.map(SortOrder::as_str))
            .query_opt("search", self.search.as_deref().filter(|s| !s.is_empty()))
            .query_opt("categoryId", self.category_id.as_deref())
    }
}

pub struct ProductService<'a> {
    pub(super) client: &'a ApiClient,
}

#[allow(clippy::missing_errors_doc)]
impl ProductService<'_> {
    pub async fn create(&self, product: Value) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::post("/products").json(product)).await
    }

    pub async fn list(&self, query: &ProductQuery) -> Result<Value, ApiError> {
        self.client.send(query.apply(ApiRequest::get("/products"))).await
    }

    pub async fn by_id(&self, id: &str) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get(format!("/products/{id}"))).await
    }

    /// Partial update, including the gold pricing attributes (weight, karat,
    /// wage percentage) the server prices from.
    pub async fn update(&self, id: &str, changes: Value) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::patch(format!("/products/{id}")).json(changes))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::delete(format!("/products/{id}"))).await
    }

    pub async fn mine(&self, query: &ProductQuery) -> Result<Value, ApiError> {
        self.client
            .send(query.apply(ApiRequest::get("/products/my-products")))
            .await
    }

    pub async fn search(&self, criteria: Value) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::post("/products/search").json(criteria)).await
    }

    pub async fn mark_sold(&self, id: &str) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::patch(format!("/products/{id}/mark-sold")))
            .await
    }

    pub async fn by_category(&self, category_id: &str, query: &ProductQuery) -> Result<Value, ApiError> {
        self.client
            .send(query.apply(ApiRequest::get(format!("/products/category/{category_id}"))))
            .await
    }

    pub async fn by_jeweler(&self, jeweler_id: &str, query: &ProductQuery) -> Result<Value, ApiError> {
        self.client
            .send(query.apply(ApiRequest::get(format!("/products/jeweler/{jeweler_id}"))))
            .await
    }

    pub async fn featured(&self, limit: Option<u32>) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::get("/products/featured/homepage").query_opt("limit", limit))
            .await
    }

    pub async fn trending(&self, limit: Option<u32>) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::get("/products/trending/popular").query_opt("limit", limit))
            .await
    }
}
