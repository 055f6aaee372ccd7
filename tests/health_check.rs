//! Integration tests for liveness, static files and admin routes

mod common;

use common::{spawn_app, spawn_app_on};

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app();

    let response = app
        .client
        .get(app.url("/api/healthz"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn app_visits_are_counted_in_metrics() {
    let app = spawn_app();

    for _ in 0..3 {
        let response = app.client.get(app.url("/app/")).send().await.unwrap();
        assert!(response.status().is_success());
    }
    // not under /app
    app.client.get(app.url("/api/healthz")).send().await.unwrap();

    let body = app
        .client
        .get(app.url("/admin/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Welcome, Chirpy Admin"));
    assert!(body.contains("Chirpy has been visited 3 times!"));
}

#[tokio::test]
async fn reset_clears_users_and_hits_in_dev() {
    let app = spawn_app();
    app.signed_in("alice@example.com").await;
    app.client.get(app.url("/app/")).send().await.unwrap();

    let response = app.client.post(app.url("/admin/reset")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = app
        .client
        .get(app.url("/admin/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("visited 0 times"));

    assert_eq!(app.login("alice@example.com", "secret123").await.status().as_u16(), 404);
    // the same email can be registered again
    assert_eq!(app.register("alice@example.com", "secret123").await.status().as_u16(), 201);
}

#[tokio::test]
async fn reset_is_forbidden_outside_dev() {
    let app = spawn_app_on("production");
    app.signed_in("alice@example.com").await;

    let response = app.client.post(app.url("/admin/reset")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 403);

    assert_eq!(app.login("alice@example.com", "secret123").await.status().as_u16(), 200);
}
