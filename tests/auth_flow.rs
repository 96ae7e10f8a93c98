mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use signup_desk::{
    db::dao::{AdminDao, AdminSessionDao, DaoBase, NewSession},
    test_helpers::{TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD, test_config, test_router},
};

use common::{TestApp, access_token};

#[tokio::test]
async fn health_reports_database_up() {
    let app = TestApp::spawn().await;

    let (status, json) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["database"], "up");
}

#[tokio::test]
async fn missing_token_is_rejected_before_any_query() {
    use tower::ServiceExt;

    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/api/admin/auth/me")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_returns_json_not_found() {
    let app = TestApp::spawn().await;

    let (status, json) = app.get("/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn login_returns_token_pair_and_profile() {
    let app = TestApp::spawn().await;

    let data = app.login(TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD).await;

    assert_eq!(data["token_type"], "Bearer");
    assert_eq!(data["expires_in"], 900);
    assert!(data["refresh_token"].as_str().is_some());
    assert_eq!(data["admin"]["email"], TEST_ADMIN_EMAIL);
    assert_eq!(data["admin"]["role"], "super_admin");
    assert!(data["admin"].get("password_hash").is_none());

    let (status, json) = app.get("/admin/auth/me", Some(&access_token(&data))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["email"], TEST_ADMIN_EMAIL);
    assert!(json["data"]["last_login_at"].is_string());
}

#[tokio::test]
async fn bad_credentials_share_one_error() {
    let app = TestApp::spawn().await;

    let (wrong_status, wrong) = app
        .post(
            "/admin/auth/login",
            None,
            json!({ "email": TEST_ADMIN_EMAIL, "password": "not-the-password" }),
        )
        .await;
    let (unknown_status, unknown) = app
        .post(
            "/admin/auth/login",
            None,
            json!({ "email": "ghost@example.com", "password": "whatever1" }),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong["error"], unknown["error"]);
}

#[tokio::test]
async fn malformed_login_is_a_validation_error() {
    let app = TestApp::spawn().await;

    let (status, json) = app
        .post(
            "/admin/auth/login",
            None,
            json!({ "email": "not-an-email", "password": "" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = json["errors"]
        .as_array()
        .expect("field errors should be listed")
        .iter()
        .filter_map(|error| error["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn refresh_rotates_tokens_in_place() {
    let app = TestApp::spawn().await;
    let data = app.login(TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD).await;
    let old_access = access_token(&data);

    let (status, json) = app
        .post(
            "/admin/auth/refresh",
            None,
            json!({ "refresh_token": data["refresh_token"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    let new_access = access_token(&json["data"]);
    assert_ne!(new_access, old_access);

    let (status, _) = app.get("/admin/auth/me", Some(&old_access)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, json) = app.get("/admin/auth/sessions", Some(&new_access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["total"], 1);

    // the old refresh token was replaced too
    let (status, _) = app
        .post(
            "/admin/auth/refresh",
            None,
            json!({ "refresh_token": data["refresh_token"] }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn access_token_cannot_be_used_to_refresh() {
    let app = TestApp::spawn().await;
    let data = app.login(TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD).await;

    let (status, _) = app
        .post(
            "/admin/auth/refresh",
            None,
            json!({ "refresh_token": data["access_token"] }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_only_the_current_session() {
    let app = TestApp::spawn().await;
    let first = app.super_admin_token().await;
    let second = app.super_admin_token().await;

    let (status, _) = app.post("/admin/auth/logout", Some(&first), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/admin/auth/me", Some(&first)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.get("/admin/auth/me", Some(&second)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn logout_all_leaves_other_admins_signed_in() {
    let app = TestApp::spawn().await;
    let other = app.admin_with_role("ops@example.com", "admin").await;
    let first = app.super_admin_token().await;
    let second = app.super_admin_token().await;

    let (status, json) = app
        .post("/admin/auth/logout-all", Some(&first), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    // two fresh logins plus the one used to create the other admin
    assert_eq!(json["data"]["sessions_closed"], 3);

    let (status, _) = app.get("/admin/auth/me", Some(&second)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, json) = app.get("/admin/auth/me", Some(&other)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["email"], "ops@example.com");
}

#[tokio::test]
async fn session_list_marks_the_calling_session() {
    let app = TestApp::spawn().await;
    let _first = app.super_admin_token().await;
    let second = app.super_admin_token().await;

    let (status, json) = app.get("/admin/auth/sessions", Some(&second)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["active"], 2);
    assert_eq!(json["data"]["expired"], 0);
    let current = json["data"]["sessions"]
        .as_array()
        .expect("sessions should be listed")
        .iter()
        .filter(|session| session["current"] == true)
        .count();
    assert_eq!(current, 1);
}

#[tokio::test]
async fn admins_cannot_revoke_each_others_sessions() {
    let app = TestApp::spawn().await;
    let other = app.admin_with_role("ops@example.com", "admin").await;
    let owner = app.super_admin_token().await;
    let (_, json) = app.get("/admin/auth/sessions", Some(&owner)).await;
    let session_id = json["data"]["sessions"][0]["id"]
        .as_str()
        .expect("session id should be present")
        .to_string();

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/admin/auth/sessions/{session_id}"),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/admin/auth/sessions/{session_id}"),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_me_changes_names() {
    let app = TestApp::spawn().await;
    let token = app.super_admin_token().await;

    let (status, json) = app
        .send(
            Method::PUT,
            "/admin/auth/me",
            Some(&token),
            Some(json!({ "first_name": "Ada", "last_name": "Lovelace" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["first_name"], "Ada");
    assert_eq!(json["data"]["last_name"], "Lovelace");
}

#[tokio::test]
async fn change_password_keeps_only_the_current_session() {
    let app = TestApp::spawn().await;
    let current = app.super_admin_token().await;
    let other = app.super_admin_token().await;

    let (status, _) = app
        .post(
            "/admin/auth/change-password",
            Some(&current),
            json!({ "current_password": "wrong-password", "new_password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = app
        .post(
            "/admin/auth/change-password",
            Some(&current),
            json!({ "current_password": TEST_ADMIN_PASSWORD, "new_password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["sessions_closed"], 1);

    let (status, _) = app.get("/admin/auth/me", Some(&current)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/admin/auth/me", Some(&other)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.login(TEST_ADMIN_EMAIL, "brand-new-pass").await;
}

#[tokio::test]
async fn password_reset_is_single_use_and_signs_everyone_out() {
    let app = TestApp::spawn().await;
    let token = app.super_admin_token().await;

    let (status, json) = app
        .post(
            "/admin/auth/forgot-password",
            None,
            json!({ "email": TEST_ADMIN_EMAIL }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let reset_token = json["data"]["reset_token"]
        .as_str()
        .expect("reset token should be exposed in tests")
        .to_string();

    let (status, _) = app
        .post(
            "/admin/auth/reset-password",
            None,
            json!({ "token": reset_token, "new_password": "reset-password-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app
        .post(
            "/admin/auth/reset-password",
            None,
            json!({ "token": reset_token, "new_password": "reset-password-2" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["field"], "token");

    let (status, _) = app.get("/admin/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    app.login(TEST_ADMIN_EMAIL, "reset-password-1").await;
}

#[tokio::test]
async fn forgot_password_answers_the_same_for_unknown_emails() {
    let app = TestApp::spawn().await;

    let (known_status, known) = app
        .post(
            "/admin/auth/forgot-password",
            None,
            json!({ "email": TEST_ADMIN_EMAIL }),
        )
        .await;
    let (unknown_status, unknown) = app
        .post(
            "/admin/auth/forgot-password",
            None,
            json!({ "email": "ghost@example.com" }),
        )
        .await;

    assert_eq!(known_status, StatusCode::OK);
    assert_eq!(unknown_status, StatusCode::OK);
    assert_eq!(known["message"], unknown["message"]);
    assert!(unknown["data"].get("reset_token").is_none());
}

#[tokio::test]
async fn reset_token_is_hidden_unless_exposure_is_enabled() {
    let mut cfg = test_config();
    cfg.auth.expose_reset_token = false;
    let app = TestApp::spawn_with(cfg).await;

    let (status, json) = app
        .post(
            "/admin/auth/forgot-password",
            None,
            json!({ "email": TEST_ADMIN_EMAIL }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].get("reset_token").is_none());
}

#[tokio::test]
async fn sweep_deletes_only_expired_sessions() {
    let app = TestApp::spawn().await;
    let token = app.super_admin_token().await;

    let admin = AdminDao::new(&app.state.db)
        .find_by_email(TEST_ADMIN_EMAIL)
        .await
        .expect("lookup should succeed")
        .expect("seeded admin should exist");
    let past = (Utc::now() - Duration::hours(1)).fixed_offset();
    AdminSessionDao::new(&app.state.db)
        .create_session(NewSession {
            id: Uuid::new_v4(),
            admin_id: admin.id,
            access_token: "stale-access".to_string(),
            refresh_token: "stale-refresh".to_string(),
            access_expires_at: past,
            expires_at: past,
            ip_address: None,
            user_agent: None,
        })
        .await
        .expect("stale session should insert");

    let (_, json) = app.get("/admin/auth/sessions", Some(&token)).await;
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["expired"], 1);

    let (status, json) = app
        .post("/admin/auth/sessions/sweep", Some(&token), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["deleted"], 1);

    let (_, json) = app.get("/admin/auth/sessions", Some(&token)).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["expired"], 0);

    let (_, json) = app.get("/admin/audit-logs", Some(&token)).await;
    let actions: Vec<&str> = json["data"]["data"]
        .as_array()
        .expect("audit entries should be listed")
        .iter()
        .filter_map(|entry| entry["action"].as_str())
        .collect();
    assert!(actions.contains(&"sessions.sweep"));
}

#[tokio::test]
async fn sweep_requires_super_admin() {
    let app = TestApp::spawn().await;
    let token = app.admin_with_role("ops@example.com", "admin").await;

    let (status, json) = app
        .post("/admin/auth/sessions/sweep", Some(&token), json!({}))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn session_ip_is_enforced_when_enabled() {
    let mut cfg = test_config();
    cfg.auth.enforce_session_ip = true;
    cfg.general.trust_proxy_headers = true;
    let app = TestApp::spawn_with(cfg).await;

    let (status, json) = app
        .call(
            Request::builder()
                .method(Method::POST)
                .uri("/api/admin/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-forwarded-for", "10.0.0.1")
                .body(Body::from(
                    json!({ "email": TEST_ADMIN_EMAIL, "password": TEST_ADMIN_PASSWORD })
                        .to_string(),
                ))
                .expect("request should build"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = access_token(&json["data"]);

    let me_from = |ip: &'static str| {
        Request::builder()
            .uri("/api/admin/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .expect("request should build")
    };

    let (status, _) = app.call(me_from("10.0.0.1")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.call(me_from("10.0.0.2")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forwarded_for_is_ignored_without_trusted_proxy() {
    let mut cfg = test_config();
    cfg.auth.enforce_session_ip = true;
    let app = TestApp::spawn_with(cfg).await;

    let (status, json) = app
        .call(
            Request::builder()
                .method(Method::POST)
                .uri("/api/admin/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-forwarded-for", "10.0.0.1")
                .body(Body::from(
                    json!({ "email": TEST_ADMIN_EMAIL, "password": TEST_ADMIN_PASSWORD })
                        .to_string(),
                ))
                .expect("request should build"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = access_token(&json["data"]);

    let (status, json) = app
        .call(
            Request::builder()
                .uri("/api/admin/auth/sessions")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header("x-forwarded-for", "10.0.0.2")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["sessions"][0]["ip_address"].is_null());
}
