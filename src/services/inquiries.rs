//! Customer inquiry endpoints.

use serde_json::{Value, json};

use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InquiryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

impl InquiryQuery {
    fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query_opt("page", self.page)
            .query_opt("limit", self.limit)
            .query_opt("status", self.status.as_deref())
    }
}

/// A merchant's answer to an inquiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquiryReply {
    pub is_available: bool,
    pub response_message: String,
    /// Alternatives offered when the requested piece is unavailable.
    pub suggested_product_ids: Vec<String>,
}

impl InquiryReply {
    /// Suggestions are only sent with an "unavailable" answer.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "isAvailable": self.is_available,
            "responseMessage": self.response_message,
        });
        if !self.is_available && !self.suggested_product_ids.is_empty() {
            body["suggestedProductIds"] = json!(self.suggested_product_ids);
        }
        body
    }
}

pub struct InquiryService<'a> {
    pub(super) client: &'a ApiClient,
}

#[allow(clippy::missing_errors_doc)]
impl InquiryService<'_> {
    pub async fn create(&self, inquiry: Value) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::post("/inquiries").json(inquiry)).await
    }

    /// Inquiries the logged-in user sent.
    pub async fn mine(&self, query: &InquiryQuery) -> Result<Value, ApiError> {
        self.client.send(query.apply(ApiRequest::get("/inquiries"))).await
    }

    /// Inquiries addressed to the logged-in merchant.
    pub async fn for_jeweler(&self, query: &InquiryQuery) -> Result<Value, ApiError> {
        self.client
            .send(query.apply(ApiRequest::get("/inquiries/jeweler")))
            .await
    }

    pub async fn by_id(&self, id: &str) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get(format!("/inquiries/{id}"))).await
    }

    pub async fn respond(&self, id: &str, reply: &InquiryReply) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::patch(format!("/inquiries/{id}/respond")).json(reply.to_json()))
            .await
    }

    pub async fn stats(&self) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get("/inquiries/jeweler/stats")).await
    }
}
