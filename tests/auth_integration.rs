//! End-to-end tests for accounts, sessions and chirps over HTTP

mod common;

use common::spawn_app;
use serde_json::Value;

#[tokio::test]
async fn full_session_flow() {
    let app = spawn_app();

    // register
    let response = app.register("alice@example.com", "secret123").await;
    assert_eq!(response.status().as_u16(), 201);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["id"], 1);
    assert_eq!(user["email"], "alice@example.com");
    assert_eq!(user["is_chirpy_red"], false);
    assert!(user.get("password").is_none());

    // login
    let response = app.login("alice@example.com", "secret123").await;
    assert_eq!(response.status().as_u16(), 200);
    let session: Value = response.json().await.unwrap();
    assert_eq!(session["id"], 1);
    let token = session["token"].as_str().unwrap().to_string();
    let refresh_token = session["refresh_token"].as_str().unwrap().to_string();
    assert_eq!(refresh_token.len(), 64);

    // post a chirp
    let response = app.create_chirp(&token, "hello world").await;
    assert_eq!(response.status().as_u16(), 201);
    let chirp: Value = response.json().await.unwrap();
    assert_eq!(chirp["body"], "hello world");
    assert_eq!(chirp["author_id"], 1);

    // refresh
    let response = app.post_bearer("/api/refresh", &refresh_token).await;
    assert_eq!(response.status().as_u16(), 200);
    let refreshed: Value = response.json().await.unwrap();
    let new_token = refreshed["token"].as_str().unwrap();
    assert_eq!(app.create_chirp(new_token, "again").await.status().as_u16(), 201);

    // revoke, twice
    assert_eq!(app.post_bearer("/api/revoke", &refresh_token).await.status().as_u16(), 204);
    assert_eq!(app.post_bearer("/api/revoke", &refresh_token).await.status().as_u16(), 204);

    // refresh now fails
    assert_eq!(app.post_bearer("/api/refresh", &refresh_token).await.status().as_u16(), 401);
}

#[tokio::test]
async fn duplicate_registration_returns_409() {
    let app = spawn_app();

    assert_eq!(app.register("alice@example.com", "secret123").await.status().as_u16(), 201);

    let response = app.register("alice@example.com", "other456").await;
    assert_eq!(response.status().as_u16(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "DUPLICATE_ENTRY");
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn register_rejects_invalid_input() {
    let app = spawn_app();

    assert_eq!(app.register("not-an-email", "secret123").await.status().as_u16(), 400);
    assert_eq!(app.register("alice@example.com", "").await.status().as_u16(), 400);
}

#[tokio::test]
async fn login_failures() {
    let app = spawn_app();
    app.register("alice@example.com", "secret123").await;

    assert_eq!(app.login("nobody@example.com", "secret123").await.status().as_u16(), 404);

    let response = app.login("alice@example.com", "wrong").await;
    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn refresh_and_revoke_require_known_tokens() {
    let app = spawn_app();

    let response = app.client.post(app.url("/api/refresh")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 401);

    assert_eq!(app.post_bearer("/api/refresh", "deadbeef").await.status().as_u16(), 404);
    assert_eq!(app.post_bearer("/api/revoke", "deadbeef").await.status().as_u16(), 404);
}

#[tokio::test]
async fn update_credentials() {
    let app = spawn_app();
    let session = app.signed_in("alice@example.com").await;
    let token = session["token"].as_str().unwrap();

    let response = app
        .client
        .put(app.url("/api/users"))
        .bearer_auth(token)
        .json(&serde_json::json!({ "email": "alice@example.org", "password": "newpass1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["email"], "alice@example.org");

    assert_eq!(app.login("alice@example.org", "newpass1").await.status().as_u16(), 200);
    assert_eq!(app.login("alice@example.com", "secret123").await.status().as_u16(), 404);

    let response = app
        .client
        .put(app.url("/api/users"))
        .json(&serde_json::json!({ "email": "x@example.org", "password": "newpass1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn polka_webhook_upgrades_user() {
    let app = spawn_app();
    let session = app.signed_in("alice@example.com").await;
    let api_key = app.settings.polka.api_key.clone();

    let send = |key: String, event: &'static str, user_id: u64| {
        app.client
            .post(app.url("/api/polka/webhooks"))
            .header("Authorization", format!("ApiKey {}", key))
            .json(&serde_json::json!({ "event": event, "data": { "user_id": user_id } }))
            .send()
    };

    assert_eq!(send("wrong".to_string(), "user.upgraded", 1).await.unwrap().status().as_u16(), 401);
    assert_eq!(send(api_key.clone(), "user.payment_failed", 1).await.unwrap().status().as_u16(), 204);
    assert_eq!(send(api_key.clone(), "user.upgraded", 42).await.unwrap().status().as_u16(), 404);
    assert_eq!(send(api_key, "user.upgraded", 1).await.unwrap().status().as_u16(), 204);

    let response = app.login("alice@example.com", "secret123").await;
    let upgraded: Value = response.json().await.unwrap();
    assert_eq!(upgraded["id"], session["id"]);
    assert_eq!(upgraded["is_chirpy_red"], true);
}
