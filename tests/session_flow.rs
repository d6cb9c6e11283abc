mod common;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use common::MockBackend;
use lifelink::client::routes;
use lifelink::common::models::Role;
use lifelink::session::DarkMode;
use lifelink::{ApiClient, ApiOutcome, EntryPoint, SessionStore};

/// Login, expiry and logout as seen through the session file on disk.
#[tokio::test]
async fn test_session_file_lifecycle() {
    let router = Router::new()
        .route(
            routes::LOGIN,
            post(|| async {
                Json(json!({
                    "access_token": "tok-patient",
                    "token_type": "bearer",
                    "role": "patient"
                }))
            }),
        )
        .route(
            routes::PATIENT_PROFILE,
            get(|| async { StatusCode::UNAUTHORIZED }),
        );
    let backend = MockBackend::start(router).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let session = SessionStore::open(&path).unwrap();
    session.set_dark_mode(DarkMode::Enabled).unwrap();
    let client = ApiClient::new(backend.base_url.clone(), session);

    assert!(client.login("7", Role::Patient).await.is_ok());

    // A fresh process sees the stored token
    let reopened = SessionStore::open(&path).unwrap();
    assert_eq!(reopened.access_token().as_deref(), Some("tok-patient"));
    assert_eq!(reopened.role(), Some(Role::Patient));

    let outcome = client
        .get_patient_profile(Role::Patient, "990101-01-1234")
        .await;
    assert_eq!(
        outcome,
        ApiOutcome::AuthExpired {
            redirect: EntryPoint::PatientLogin
        }
    );

    let after_expiry = SessionStore::open(&path).unwrap();
    assert_eq!(after_expiry.access_token(), None);
    assert_eq!(after_expiry.role(), None);
    assert_eq!(after_expiry.dark_mode(), DarkMode::Enabled);
}

#[tokio::test]
async fn test_logout_is_local() {
    let backend = MockBackend::start(Router::new()).await;
    let client = backend.client_as(Role::Doctor, "tok");

    client.logout().unwrap();

    assert!(!client.session().session().is_authenticated());
    assert_eq!(backend.hits(), 0);
}
