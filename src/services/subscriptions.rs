//! Subscription plan endpoints. Plan limits are enforced server-side.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest};

pub struct SubscriptionService<'a> {
    pub(super) client: &'a ApiClient,
}

#[allow(clippy::missing_errors_doc)]
impl SubscriptionService<'_> {
    pub async fn plans(&self) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get("/subscriptions/plans")).await
    }

    pub async fn plan(&self, id: &str) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::get(format!("/subscriptions/plans/{id}")))
            .await
    }

    pub async fn current(&self) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get("/subscriptions/current")).await
    }

    pub async fn history(&self) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get("/subscriptions/history")).await
    }

    /// Remaining product/media quota under the current plan.
    pub async fn limits(&self) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get("/subscriptions/limits")).await
    }

    pub async fn create(&self, subscription: Value) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::post("/subscriptions").json(subscription))
            .await
    }

    pub async fn upgrade(&self, upgrade: Value) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::patch("/subscriptions/upgrade").json(upgrade))
            .await
    }
}
