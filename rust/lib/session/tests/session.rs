//! Session lifecycle against a stub backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use yatri_client::{CredentialStore, Credentials, Gateway, MemoryCredentials, Role, CORRUPT_TOKEN};
use yatri_session::{
    ClientConfig, Context, FileCredentials, Navigation, RecordingNavigator, Session,
    SessionManager, LOGIN_PATH,
};

#[derive(Default)]
struct Backend {
    me_calls: AtomicUsize,
    logout_calls: AtomicUsize,
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

async fn me(State(b): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    b.me_calls.fetch_add(1, Ordering::SeqCst);
    match bearer(&headers).as_deref() {
        Some("host-token") => Json(json!({"data": {"user": {"id": 1, "role": "host"}}})).into_response(),
        Some("weird-role") => Json(json!({"data": {"user": {"role": "superuser"}}})).into_response(),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid token"}))).into_response(),
    }
}

async fn logout(State(b): State<Arc<Backend>>) -> Response {
    b.logout_calls.fetch_add(1, Ordering::SeqCst);
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" {
        Json(json!({"data": {"accessToken": "vol-token", "user": {"role": "volunteer"}}})).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid credentials"}))).into_response()
    }
}

async fn start() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/api/users/me", get(me))
        .route("/api/users/logout", post(logout))
        .route("/api/users/login", post(login))
        .with_state(backend.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/api", addr), backend)
}

fn manager(
    base: &str,
    store: Arc<dyn CredentialStore>,
) -> (SessionManager, Arc<RecordingNavigator>) {
    let nav = Arc::new(RecordingNavigator::new());
    let mgr = SessionManager::new(Gateway::new(base, store), nav.clone());
    (mgr, nav)
}

#[tokio::test]
async fn verified_token_logs_in_with_backend_role() {
    let (base, backend) = start().await;
    // Stale persisted role is overwritten by the verified one.
    let store = Arc::new(MemoryCredentials::with_token("host-token", Some("volunteer")));
    let (mgr, _) = manager(&base, store.clone());

    let session = mgr.initialize().await;
    assert_eq!(session, Session::logged_in(Role::Host));
    assert_eq!(mgr.wait_ready().await, session);
    assert_eq!(store.role().as_deref(), Some("host"));
    assert_eq!(backend.me_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_token_clears_credentials() {
    let (base, _) = start().await;
    let store = Arc::new(MemoryCredentials::with_token("expired", Some("host")));
    let (mgr, _) = manager(&base, store.clone());

    assert_eq!(mgr.initialize().await, Session::logged_out());
    assert_eq!(store.token(), None);
    assert_eq!(store.role(), None);
}

#[tokio::test]
async fn unknown_role_counts_as_failure() {
    let (base, _) = start().await;
    let store = Arc::new(MemoryCredentials::with_token("weird-role", None));
    let (mgr, _) = manager(&base, store.clone());

    assert_eq!(mgr.initialize().await, Session::logged_out());
    assert_eq!(store.token(), None);
}

#[tokio::test]
async fn corrupt_token_never_reaches_backend() {
    let (base, backend) = start().await;
    let store = Arc::new(MemoryCredentials::with_token(CORRUPT_TOKEN, Some("host")));
    let (mgr, _) = manager(&base, store.clone());

    assert_eq!(mgr.initialize().await, Session::logged_out());
    assert_eq!(store.token(), None);
    assert_eq!(backend.me_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_backend_settles_logged_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = Arc::new(MemoryCredentials::with_token("host-token", Some("host")));
    let (mgr, _) = manager(&format!("http://{}/api", addr), store.clone());

    assert_eq!(mgr.initialize().await, Session::logged_out());
    assert_eq!(store.token(), None);
}

#[tokio::test]
async fn logout_clears_even_when_backend_fails() {
    let (base, backend) = start().await;
    let store = Arc::new(MemoryCredentials::new());
    let (mgr, nav) = manager(&base, store.clone());
    mgr.login("host-token", Role::Host);

    mgr.logout().await;

    assert_eq!(backend.logout_calls.load(Ordering::SeqCst), 1);
    assert_eq!(mgr.snapshot(), Session::logged_out());
    assert_eq!(store.token(), None);
    assert_eq!(nav.history(), vec![Navigation::Hard(LOGIN_PATH.into())]);
}

#[tokio::test]
async fn logout_with_unreachable_backend() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = Arc::new(MemoryCredentials::with_token("t", Some("admin")));
    let (mgr, nav) = manager(&format!("http://{}/api", addr), store.clone());
    mgr.logout().await;

    assert_eq!(store.token(), None);
    assert_eq!(nav.last(), Some(Navigation::Hard(LOGIN_PATH.into())));
}

#[tokio::test]
async fn sign_in_persists_grant() {
    let (base, _) = start().await;
    let store = Arc::new(MemoryCredentials::new());
    let (mgr, _) = manager(&base, store.clone());

    let role = mgr
        .sign_in(&Credentials {
            email: "asha@example.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(role, Role::Volunteer);
    assert_eq!(mgr.snapshot(), Session::logged_in(Role::Volunteer));
    assert_eq!(store.token().as_deref(), Some("vol-token"));
}

#[tokio::test]
async fn sign_in_failure_leaves_state_alone() {
    let (base, _) = start().await;
    let store = Arc::new(MemoryCredentials::new());
    let (mgr, _) = manager(&base, store.clone());
    mgr.initialize().await;

    let err = mgr
        .sign_in(&Credentials {
            email: "asha@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(mgr.snapshot(), Session::logged_out());
    assert_eq!(store.token(), None);
}

#[tokio::test]
async fn file_store_round_trip_through_session() {
    let (base, _) = start().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut config = ClientConfig::default();
    config.current_context = "local".into();
    config.upsert_context(Context {
        server: base.clone(),
        ..Context::new("local")
    });
    config.save(&path).unwrap();

    let store = Arc::new(FileCredentials::current(&path).unwrap());
    let (mgr, _) = manager(&base, store.clone());
    mgr.login("host-token", Role::Host);

    // A second process reading the same file verifies the stored token.
    let (again, _) = manager(&base, Arc::new(FileCredentials::current(&path).unwrap()));
    assert_eq!(again.initialize().await, Session::logged_in(Role::Host));

    again.logout().await;
    let config = ClientConfig::load(&path).unwrap();
    let ctx = config.current().unwrap();
    assert!(ctx.token.is_empty());
    assert_eq!(ctx.server, base);
}
