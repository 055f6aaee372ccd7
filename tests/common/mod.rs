use std::net::TcpListener;

use chirpy::configuration::{
    ApplicationSettings, AuthSettings, ChirpSettings, DatabaseSettings, JwtSettings,
    PolkaSettings, Settings,
};
use chirpy::startup::{build_state, run};
use serde_json::Value;

pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub settings: Settings,
    _dir: tempfile::TempDir,
}

pub fn test_settings(dir: &std::path::Path, platform: &str) -> Settings {
    Settings {
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            platform: platform.to_string(),
            debug: false,
            static_dir: dir.display().to_string(),
        },
        database: DatabaseSettings {
            path: dir.join("database.json").display().to_string(),
        },
        jwt: JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 60 * 24 * 60 * 60,
            issuer: "chirpy".to_string(),
        },
        auth: AuthSettings { bcrypt_cost: 4 },
        polka: PolkaSettings {
            api_key: POLKA_KEY.to_string(),
        },
        chirps: ChirpSettings::default(),
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_on("dev")
}

pub fn spawn_app_on(platform: &str) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("index.html"), "<h1>Welcome to Chirpy</h1>")
        .expect("Failed to write index.html");

    let settings = test_settings(dir.path(), platform);
    let state = build_state(&settings).expect("Failed to build state");

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let server = run(listener, state).expect("Failed to create server");

    let _ = tokio::spawn(async move {
        let _ = server.await;
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        settings,
        _dir: dir,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/users"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and log in, returning the login body
    pub async fn signed_in(&self, email: &str) -> Value {
        assert_eq!(self.register(email, "secret123").await.status().as_u16(), 201);
        let response = self.login(email, "secret123").await;
        assert_eq!(response.status().as_u16(), 200);
        response.json().await.unwrap()
    }

    pub async fn post_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn create_chirp(&self, token: &str, body: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/chirps"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
