//! General uploads (profile image, logo, cover) and product media.

use std::str::FromStr;

use serde_json::{Value, json};

use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest, FileUpload, FormPart};

pub const DEFAULT_UPLOAD_PAGE: u32 = 1;
pub const DEFAULT_UPLOAD_LIMIT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCategory {
    General,
    Profile,
    Logo,
    Cover,
}

impl UploadCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Profile => "profile",
            Self::Logo => "logo",
            Self::Cover => "cover",
        }
    }

    /// Alt text the storefront shows when the merchant gives none.
    #[must_use]
    pub fn default_alt_text(self) -> &'static str {
        match self {
            Self::General => "",
            Self::Profile => "تصویر پروفایل کاربر",
            Self::Logo => "لوگو فروشگاه",
            Self::Cover => "تصویر کاور",
        }
    }
}

impl FromStr for UploadCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(Self::General),
            "profile" => Ok(Self::Profile),
            "logo" => Ok(Self::Logo),
            "cover" => Ok(Self::Cover),
            other => Err(format!("unknown upload category '{other}' (expected general, profile, logo or cover)")),
        }
    }
}

/// Position entry for a product's media gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaOrder {
    pub id: String,
    pub is_primary: bool,
}

impl MediaOrder {
    /// Keep `ids` in order and mark `primary_id` as the primary image.
    #[must_use]
    pub fn with_primary(ids: &[String], primary_id: &str) -> Vec<Self> {
        ids.iter()
            .map(|id| Self { id: id.clone(), is_primary: id == primary_id })
            .collect()
    }

    /// Keep `ids` in order and make the first one primary.
    #[must_use]
    pub fn first_primary(ids: &[String]) -> Vec<Self> {
        ids.iter()
            .enumerate()
            .map(|(index, id)| Self { id: id.clone(), is_primary: index == 0 })
            .collect()
    }

    fn to_json(order: &[Self]) -> Value {
        Value::Array(
            order
                .iter()
                .map(|m| json!({ "id": m.id, "isPrimary": m.is_primary }))
                .collect(),
        )
    }
}

pub struct UploadService<'a> {
    pub(super) client: &'a ApiClient,
}

#[allow(clippy::missing_errors_doc)]
impl UploadService<'_> {
    pub async fn upload_single(&self, file: &FileUpload, category: UploadCategory, alt_text: &str) -> Result<Value, ApiError> {
        let parts = vec![
            FormPart::file("file", file),
            FormPart::text("category", category.as_str()),
            FormPart::text("altText", alt_text),
        ];
        self.client
            .send(ApiRequest::post("/upload/single").multipart(parts))
            .await
    }

    pub async fn upload_multiple(
        &self,
        files: &[FileUpload],
        category: UploadCategory,
        alt_text: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut parts: Vec<FormPart> = files.iter().map(|f| FormPart::file("files", f)).collect();
        parts.push(FormPart::text("category", category.as_str()));
        if let Some(alt_text) = alt_text.filter(|a| !a.is_empty()) {
            parts.push(FormPart::text("altText", alt_text));
        }
        self.client
            .send(ApiRequest::post("/upload/multiple").multipart(parts))
            .await
    }

    pub async fn my_uploads(&self, category: Option<UploadCategory>, page: u32, limit: u32) -> Result<Value, ApiError> {
        let request = ApiRequest::get("/upload/my-uploads")
            .query_opt("category", category.map(UploadCategory::as_str))
            .query("page", page)
            .query("limit", limit);
        self.client.send(request).await
    }

    pub async fn delete_upload(&self, upload_id: &str) -> Result<(), ApiError> {
        self.client
            .send(ApiRequest::delete(format!("/upload/{upload_id}")))
            .await?;
        Ok(())
    }

    pub async fn upload_stats(&self) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get("/upload/stats")).await
    }

    /// Attach images or video to a product. `primary_index` picks which file
    /// becomes the cover image.
    pub async fn upload_product_media(
        &self,
        product_id: &str,
        files: &[FileUpload],
        primary_index: usize,
        alt_texts: &[String],
    ) -> Result<Value, ApiError> {
        let mut parts: Vec<FormPart> = files.iter().map(|f| FormPart::file("files", f)).collect();
        parts.push(FormPart::text("primaryIndex", primary_index.to_string()));
        if !alt_texts.is_empty() {
            parts.push(FormPart::text("altTexts", json!(alt_texts).to_string()));
        }
        self.client
            .send(ApiRequest::post(format!("/media/products/{product_id}/upload")).multipart(parts))
            .await
    }

    pub async fn product_media(&self, product_id: &str) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::get(format!("/media/products/{product_id}")))
            .await
    }

    /// Reorder a product's media. Dropping an id from `order` removes it from
    /// the gallery.
    pub async fn update_media_order(&self, product_id: &str, order: &[MediaOrder]) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::patch(format!("/media/products/{product_id}/order")).json(MediaOrder::to_json(order)))
            .await
    }

    pub async fn delete_media(&self, media_id: &str) -> Result<(), ApiError> {
        self.client
            .send(ApiRequest::delete(format!("/media/{media_id}")))
            .await?;
        Ok(())
    }

    pub async fn media_stats(&self) -> Result<Value, ApiError> {
        self.client.send(ApiRequest::get("/media/stats")).await
    }
}
