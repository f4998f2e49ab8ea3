//! Shared fixtures for integration tests.

#![allow(dead_code)]

use admission_gate::auth::{MemoryStore, TokenScope, User};
use admission_gate::config::GateConfig;
use admission_gate::{HttpServer, Stores};
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use tower::ServiceExt;

pub const READER_TOKEN: &str = "RRRRRRRRRRRRRRRRRRRRRRRRRR";
pub const WRITER_TOKEN: &str = "WWWWWWWWWWWWWWWWWWWWWWWWWW";
pub const INACTIVE_TOKEN: &str = "IIIIIIIIIIIIIIIIIIIIIIIIII";
pub const UNKNOWN_TOKEN: &str = "UUUUUUUUUUUUUUUUUUUUUUUUUU";

fn user(id: i64, name: &str, activated: bool) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        activated,
    }
}

/// Reader (activated, movies:read), writer (activated, read + write), inactive (movies:write but not activated).
pub fn seeded_store() -> MemoryStore {
    MemoryStore::new()
        .with_user(user(1, "Reader", true))
        .with_token(TokenScope::Authentication, READER_TOKEN, 1)
        .with_permissions(1, ["movies:read"])
        .with_user(user(2, "Writer", true))
        .with_token(TokenScope::Authentication, WRITER_TOKEN, 2)
        .with_permissions(2, ["movies:read", "movies:write"])
        .with_user(user(3, "Inactive", false))
        .with_token(TokenScope::Authentication, INACTIVE_TOKEN, 3)
        .with_permissions(3, ["movies:write"])
}

/// Config with a burst large enough that rate limiting stays out of the way.
pub fn relaxed_config() -> GateConfig {
    let mut config = GateConfig::default();
    config.rate_limit.burst_size = 1_000;
    config.rate_limit.requests_per_second = 1_000.0;
    config
}

pub fn router(config: GateConfig, stores: Stores) -> Router {
    HttpServer::new(config, stores)
        .expect("test config is valid")
        .router()
}

pub fn request(method: &str, uri: &str, auth: Option<&str>, client_ip: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-real-ip", client_ip);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
