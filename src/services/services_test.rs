use super::*;
use crate::config::PanelConfig;
use crate::session::SessionStore;
use crate::storage::{ACCESS_TOKEN_KEY, MemoryStorage, USER_KEY};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let storage = Arc::new(MemoryStorage::with_entries([(ACCESS_TOKEN_KEY, "A"), (USER_KEY, r#"{"id":1}"#)]));
    let session = Arc::new(SessionStore::new(storage));
    session.hydrate();
    ApiClient::builder(PanelConfig::new(&server.uri()).unwrap(), session)
        .build()
        .unwrap()
}

// =============================================================================
// query / body builders
// =============================================================================

#[test]
fn inquiry_reply_available_omits_suggestions() {
    let reply = InquiryReply {
        is_available: true,
        response_message: "In stock".into(),
        suggested_product_ids: vec!["p1".into()],
    };
    assert_eq!(reply.to_json(), json!({ "isAvailable": true, "responseMessage": "In stock" }));
}

#[test]
fn inquiry_reply_unavailable_carries_suggestions() {
    let reply = InquiryReply {
        is_available: false,
        response_message: "Sold out".into(),
        suggested_product_ids: vec!["p1".into(), "p2".into()],
    };
    assert_eq!(reply.to_json()["suggestedProductIds"], json!(["p1", "p2"]));
}

#[test]
fn media_order_with_primary_marks_one() {
    let ids = vec!["m1".to_owned(), "m2".to_owned(), "m3".to_owned()];
    let order = MediaOrder::with_primary(&ids, "m2");
    assert_eq!(order.iter().filter(|m| m.is_primary).count(), 1);
    assert!(order[1].is_primary);
    assert_eq!(MediaOrder::first_primary(&ids)[0], MediaOrder { id: "m1".into(), is_primary: true });
}

#[test]
fn upload_category_parses_case_insensitively() {
    assert_eq!("Logo".parse::<UploadCategory>(), Ok(UploadCategory::Logo));
    assert!("banner".parse::<UploadCategory>().is_err());
    assert_eq!(UploadCategory::Cover.as_str(), "cover");
}

// =============================================================================
// endpoints
// =============================================================================

#[tokio::test]
async fn send_otp_posts_phone_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/send-otp"))
        .and(body_json(json!({ "phoneNumber": "09123456789" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "sent" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let value = client.auth().send_otp("09123456789").await.unwrap();
    assert_eq!(value["message"], "sent");
}

#[tokio::test]
async fn my_products_sends_dashboard_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/my-products"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "1"))
        .and(query_param("sortBy", "createdAt"))
        .and(query_param("sortOrder", "desc"))
        .and(header("authorization", "Bearer A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [], "total": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let value = client.products().mine(&ProductQuery::latest()).await.unwrap();
    assert_eq!(value["total"], 0);
}

#[tokio::test]
async fn respond_to_inquiry_patches_reply() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/inquiries/42/respond"))
        .and(body_json(json!({
            "isAvailable": false,
            "responseMessage": "Try these",
            "suggestedProductIds": ["p9"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "42", "status": "responded" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = InquiryReply {
        is_available: false,
        response_message: "Try these".into(),
        suggested_product_ids: vec!["p9".into()],
    };
    let value = client.inquiries().respond("42", &reply).await.unwrap();
    assert_eq!(value["status"], "responded");
}

#[tokio::test]
async fn media_order_patch_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/media/products/p1/order"))
        .and(body_json(json!([
            { "id": "m1", "isPrimary": false },
            { "id": "m2", "isPrimary": true },
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let order = MediaOrder::with_primary(&["m1".to_owned(), "m2".to_owned()], "m2");
    client.uploads().update_media_order("p1", &order).await.unwrap();
}

#[tokio::test]
async fn my_uploads_filters_by_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/upload/my-uploads"))
        .and(query_param("category", "logo"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "uploads": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .uploads()
        .my_uploads(Some(UploadCategory::Logo), uploads::DEFAULT_UPLOAD_PAGE, uploads::DEFAULT_UPLOAD_LIMIT)
        .await
        .unwrap();
}

#[tokio::test]
async fn product_media_upload_sends_primary_index_and_alt_texts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/media/products/p1/upload"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "media": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let files = vec![
        crate::http::FileUpload::new("ring.jpg", vec![1, 2, 3]),
        crate::http::FileUpload::new("ring-side.jpg", vec![4, 5, 6]),
    ];
    client
        .uploads()
        .upload_product_media("p1", &files, 1, &["front".to_owned(), "side".to_owned()])
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).into_owned();
    assert!(body.contains("name=\"primaryIndex\""));
    assert!(body.contains(r#"["front","side"]"#));
    assert!(body.contains("filename=\"ring-side.jpg\""));
    assert!(body.contains("image/jpeg"));
}

#[tokio::test]
async fn delete_upload_discards_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/upload/u7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deleted": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.uploads().delete_upload("u7").await.unwrap();
}
