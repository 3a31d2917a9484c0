#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};

use hearth_api::config::AppConfig;
use hearth_api::database::MemoryStore;
use hearth_api::{app, AppState};

/// A server on its own port and in-memory store, torn down with the test's runtime.
pub struct TestServer {
    pub base_url: String,
    client: reqwest::Client,
}

pub async fn spawn_server() -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test port")?;

    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    let router = app(AppState::new(Arc::new(MemoryStore::new()), &config), &config);

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    })
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    /// Registers a user and returns the token from the plain-text body.
    pub async fn signup(&self, body: Value) -> Result<String> {
        let res = self.post("/api/users").json(&body).send().await?;
        let status = res.status();
        let text = res.text().await?;
        anyhow::ensure!(status == StatusCode::OK, "signup failed with {}: {}", status, text);
        Ok(text)
    }

    pub async fn signup_user(&self, email: &str) -> Result<String> {
        self.signup(user_body(email)).await
    }

    pub async fn authed(&self, token: &str) -> Result<Value> {
        let res = self.get("/api/users/authed").header("authorization", token).send().await?;
        Ok(expect_status(res, StatusCode::OK).await?)
    }
}

pub fn user_body(email: &str) -> Value {
    json!({
        "firstName": "Test",
        "lastName": "User",
        "email": email,
        "password": "P@ssword1"
    })
}

/// Asserts the status and returns the JSON body (Null when empty).
pub async fn expect_status(res: Response, expected: StatusCode) -> Result<Value> {
    let status = res.status();
    let text = res.text().await?;
    anyhow::ensure!(status == expected, "expected {}, got {}: {}", expected, status, text);
    if text.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}
