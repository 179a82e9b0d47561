use super::*;
use serde_json::json;

fn logged_in() -> Session {
    Session::default().apply(&SessionEvent::LoginSucceeded {
        access_token: "A".into(),
        refresh_token: Some("R".into()),
        principal: json!({ "id": 1, "name": "Gallery" }),
    })
}

#[test]
fn default_is_loading_and_unauthenticated() {
    let session = Session::default();
    assert!(session.is_loading);
    assert!(!session.is_authenticated());
    assert_eq!(session.access(), Access::Pending);
}

#[test]
fn login_sets_tokens_and_principal_together() {
    let session = logged_in();
    assert_eq!(session.access_token.as_deref(), Some("A"));
    assert_eq!(session.refresh_token.as_deref(), Some("R"));
    assert_eq!(session.principal, Some(json!({ "id": 1, "name": "Gallery" })));
    assert!(!session.is_loading);
    assert!(session.is_authenticated());
    assert_eq!(session.access(), Access::Granted);
}

#[test]
fn logout_clears_everything() {
    let session = logged_in().apply(&SessionEvent::LoggedOut);
    assert_eq!(session.access_token, None);
    assert_eq!(session.refresh_token, None);
    assert_eq!(session.principal, None);
    assert!(!session.is_loading);
    assert_eq!(session.access(), Access::LoginRequired);
}

#[test]
fn loading_changed_only_touches_flag() {
    let before = logged_in();
    let after = before.clone().apply(&SessionEvent::LoadingChanged(true));
    assert!(after.is_loading);
    assert_eq!(after.access_token, before.access_token);
    assert_eq!(after.principal, before.principal);
}

#[test]
fn principal_update_keeps_tokens() {
    let session = logged_in().apply(&SessionEvent::PrincipalUpdated(json!({ "id": 1, "name": "Renamed" })));
    assert_eq!(session.access_token.as_deref(), Some("A"));
    assert_eq!(session.refresh_token.as_deref(), Some("R"));
    assert_eq!(session.principal.unwrap()["name"], "Renamed");
}

#[test]
fn refresh_without_rotation_keeps_refresh_token() {
    let session = logged_in().apply(&SessionEvent::TokensRefreshed { access_token: "A2".into(), refresh_token: None });
    assert_eq!(session.access_token.as_deref(), Some("A2"));
    assert_eq!(session.refresh_token.as_deref(), Some("R"));
}

#[test]
fn refresh_with_rotation_replaces_refresh_token() {
    let session = logged_in().apply(&SessionEvent::TokensRefreshed {
        access_token: "A2".into(),
        refresh_token: Some("R2".into()),
    });
    assert_eq!(session.refresh_token.as_deref(), Some("R2"));
}

#[test]
fn not_loading_without_login_requires_login() {
    let session = Session::default().apply(&SessionEvent::LoadingChanged(false));
    assert_eq!(session.access(), Access::LoginRequired);
}
