mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::TestApp;

async fn seeded_app() -> (TestApp, String) {
    let app = TestApp::spawn().await;
    app.signup(json!({
        "training_type": "Forklift Safety",
        "email": "alice@example.com",
        "first_name": "Alice",
        "last_name": "Archer",
    }))
    .await;
    app.signup(json!({
        "training_type": "CPR",
        "phone": "555-0101",
        "first_name": "Bob",
        "last_name": "Baker",
    }))
    .await;
    app.signup(json!({
        "training_type": "cpr",
        "email": "carol@example.com",
        "first_name": "Carol",
    }))
    .await;
    let token = app.admin_with_role("viewer@example.com", "viewer").await;
    (app, token)
}

fn emails(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .expect("items should be listed")
        .iter()
        .map(|row| row["student"]["email"].as_str().unwrap_or("-").to_string())
        .collect()
}

#[tokio::test]
async fn listing_requires_authentication() {
    let app = TestApp::spawn().await;

    let (status, json) = app.get("/admin/signups", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn viewers_see_every_signup_newest_first() {
    let (app, token) = seeded_app().await;

    let (status, json) = app.get("/admin/signups", Some(&token)).await;

    assert_eq!(status, StatusCode::OK, "{json}");
    let page = &json["data"];
    assert_eq!(page["total"], 3);
    assert_eq!(page["page"], 1);
    assert_eq!(page["page_size"], 20);
    assert_eq!(
        emails(page),
        vec!["carol@example.com", "-", "alice@example.com"]
    );
}

#[tokio::test]
async fn training_type_filter_ignores_case() {
    let (app, token) = seeded_app().await;

    let (_, json) = app
        .get("/admin/signups?training_type=CPR", Some(&token))
        .await;

    assert_eq!(json["data"]["total"], 2);
}

#[tokio::test]
async fn search_matches_names_emails_and_phones() {
    let (app, token) = seeded_app().await;

    let (_, by_name) = app.get("/admin/signups?search=archer", Some(&token)).await;
    let (_, by_phone) = app.get("/admin/signups?search=0101", Some(&token)).await;
    let (_, by_email) = app
        .get("/admin/signups?search=CAROL%40", Some(&token))
        .await;

    assert_eq!(emails(&by_name["data"]), vec!["alice@example.com"]);
    assert_eq!(by_phone["data"]["items"][0]["student"]["phone"], "555-0101");
    assert_eq!(emails(&by_email["data"]), vec!["carol@example.com"]);
}

#[tokio::test]
async fn combined_filters_are_order_independent() {
    let (app, token) = seeded_app().await;

    let (_, first) = app
        .get(
            "/admin/signups?training_type=cpr&search=carol&status=pending",
            Some(&token),
        )
        .await;
    let (_, second) = app
        .get(
            "/admin/signups?status=pending&search=carol&training_type=cpr",
            Some(&token),
        )
        .await;

    assert_eq!(first["data"]["items"], second["data"]["items"]);
    assert_eq!(first["data"]["total"], 1);
}

#[tokio::test]
async fn reminder_window_splits_due_and_upcoming() {
    let (app, token) = seeded_app().await;

    let (_, due) = app.get("/admin/signups?reminder=due", Some(&token)).await;
    let (_, upcoming) = app
        .get("/admin/signups?reminder=upcoming", Some(&token))
        .await;

    assert_eq!(due["data"]["total"], 0);
    assert_eq!(upcoming["data"]["total"], 3);
}

#[tokio::test]
async fn sorting_and_paging() {
    let (app, token) = seeded_app().await;

    let (_, json) = app
        .get(
            "/admin/signups?sort_by=training_type&sort_order=asc&page=2&page_size=2",
            Some(&token),
        )
        .await;

    let page = &json["data"];
    assert_eq!(page["total"], 3);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(page["items"][0]["training_type"], "Forklift Safety");
}

#[tokio::test]
async fn bad_query_values_are_rejected() {
    let (app, token) = seeded_app().await;

    let (status, _) = app
        .get("/admin/signups?page_size=0", Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get("/admin/signups?status=archived", Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = app
        .get("/admin/signups?sort_by=colour", Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn stats_count_statuses_and_training_types() {
    let (app, token) = seeded_app().await;

    let (status, json) = app.get("/admin/signups/stats", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let stats = &json["data"];
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["pending"], 3);
    assert_eq!(stats["sent"], 0);
    assert_eq!(stats["due_reminders"], 0);
    assert_eq!(stats["students"], 3);
}
