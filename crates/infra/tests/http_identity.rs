//! Black-box exercises for the HTTP identity adapter against a faked backend.

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use werkbank_infra::HttpIdentityService;
use werkbank_session::{Credential, IdentityError, IdentityService};

struct TestBackend {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestBackend {
    async fn spawn() -> Self {
        let app = Router::new()
            .route("/login/access-token", post(access_token))
            .route("/users/me", get(me));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn access_token(Form(form): Form<LoginForm>) -> Result<Json<Value>, StatusCode> {
    if form.username == "anna@example.com" && form.password == "pw" {
        Ok(Json(json!({ "access_token": "tok-live" })))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn me(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    let bearer = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok());

    match bearer {
        Some("Bearer tok-live") => Ok(Json(json!({
            "id": 7,
            "email": "anna@example.com",
            "first_name": "Anna",
            "last_name": "Muster",
            "role": "Projektleiter",
            "is_superuser": false,
            "is_active": true
        }))),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

#[tokio::test]
async fn exchange_returns_the_issued_credential() {
    let backend = TestBackend::spawn().await;
    let service = HttpIdentityService::new(&backend.base_url);

    let credential = service.exchange("anna@example.com", "pw").await.unwrap();
    assert_eq!(credential, Credential::new("tok-live"));
}

#[tokio::test]
async fn exchange_rejection_maps_to_invalid_credentials() {
    let backend = TestBackend::spawn().await;
    let service = HttpIdentityService::new(&backend.base_url);

    let result = service.exchange("anna@example.com", "wrong").await;
    assert_eq!(result, Err(IdentityError::InvalidCredentials));
}

#[tokio::test]
async fn verify_returns_the_profile() {
    let backend = TestBackend::spawn().await;
    let service = HttpIdentityService::new(&backend.base_url);

    let profile = service.verify(&Credential::new("tok-live")).await.unwrap();
    assert_eq!(profile.id.as_i64(), 7);
    assert_eq!(profile.role.as_str(), "Projektleiter");
    assert_eq!(profile.display_name(), "Anna Muster");
}

#[tokio::test]
async fn verify_rejection_maps_to_unauthorized() {
    let backend = TestBackend::spawn().await;
    let service = HttpIdentityService::new(&backend.base_url);

    let result = service.verify(&Credential::new("tok-stale")).await;
    assert_eq!(result, Err(IdentityError::Unauthorized));
}

#[tokio::test]
async fn unreachable_backend_maps_to_transport() {
    // Nothing listens on this port; the bound listener is dropped before use.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let service = HttpIdentityService::new(base_url);

    let verify = service.verify(&Credential::new("tok-live")).await;
    assert!(matches!(verify, Err(IdentityError::Transport(_))));

    let exchange = service.exchange("anna@example.com", "pw").await;
    assert!(matches!(exchange, Err(IdentityError::Transport(_))));
}
