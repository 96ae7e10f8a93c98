#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{self, Body},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`

use signup_desk::{
    config::AppConfig,
    routes::{API_PREFIX, router},
    state::AppState,
    test_helpers::{TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD, sqlite_state, test_config},
};

pub struct TestApp {
    pub state: Arc<AppState>,
    router: Router,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    pub async fn spawn_with(cfg: AppConfig) -> Self {
        let state = sqlite_state(cfg).await.expect("sqlite state should build");
        let router = router(Arc::clone(&state));
        Self { state, router }
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("{API_PREFIX}{path}"));
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");
        self.call(request).await
    }

    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request should complete");
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be json")
        };
        (status, json)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, path, token, Some(body)).await
    }

    /// Logs in and returns the `data` object of the response.
    pub async fn login(&self, email: &str, password: &str) -> Value {
        let (status, json) = self
            .post(
                "/admin/auth/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {json}");
        json["data"].clone()
    }

    pub async fn super_admin_token(&self) -> String {
        let data = self.login(TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD).await;
        access_token(&data)
    }

    /// Creates an admin through the API and returns a fresh access token for it.
    pub async fn admin_with_role(&self, email: &str, role: &str) -> String {
        let super_token = self.super_admin_token().await;
        let (status, json) = self
            .post(
                "/admin/admins",
                Some(&super_token),
                json!({ "email": email, "password": "password123", "role": role }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "admin create failed: {json}");
        access_token(&self.login(email, "password123").await)
    }

    pub async fn signup(&self, body: Value) -> Value {
        let (status, json) = self.post("/students/signup", None, body).await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {json}");
        json["data"].clone()
    }
}

pub fn access_token(data: &Value) -> String {
    data["access_token"]
        .as_str()
        .expect("access token should be present")
        .to_string()
}
