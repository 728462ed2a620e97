//! Mock newsletter backend for testing
//!
//! A wiremock server answering the backend's REST routes with configurable
//! payloads.

use std::sync::Arc;
use std::time::Duration;
use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};
use newsletter_studio::config::Settings;
use newsletter_studio::gateway::{BackendClient, MemoryTokenStore, TokenStore};
use newsletter_studio::services::RemoteStudio;
use newsletter_studio::state::StudioStore;
use super::test_data::{test_settings, TEST_LABEL, TEST_TOKEN};

/// Mock backend server
pub struct BackendMockServer {
    pub server: MockServer,
    pub tokens: Arc<MemoryTokenStore>,
}

impl BackendMockServer {
    /// Start a server; the token store starts signed in unless `signed_in` is false
    pub async fn new(signed_in: bool) -> Self {
        let server = MockServer::start().await;
        let tokens = if signed_in {
            Arc::new(MemoryTokenStore::with_token(TEST_TOKEN))
        } else {
            Arc::new(MemoryTokenStore::new())
        };
        Self { server, tokens }
    }

    pub fn settings(&self) -> Settings {
        let mut settings = test_settings();
        settings.backend.base_url = self.server.uri();
        settings.backend.timeout_seconds = 5;
        settings
    }

    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        self.tokens.clone()
    }

    pub fn client(&self) -> BackendClient {
        BackendClient::new(&self.settings().backend, self.token_store()).expect("client")
    }

    pub fn studio(&self) -> RemoteStudio {
        let store = StudioStore::remote(&self.settings()).with_label(TEST_LABEL);
        RemoteStudio::new(self.client(), store)
    }

    /// Respond to an authorized request with `status` and `body`
    pub async fn mock_json(&self, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Respond to an authorized request with an empty body
    pub async fn mock_empty(&self, verb: &str, route: &str, status: u16) {
        Mock::given(method(verb))
            .and(path(route))
            .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Same as `mock_json`, answering after `delay`
    pub async fn mock_json_delayed(&self, verb: &str, route: &str, body: Value, delay: Duration) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// Answer with an error status and a `detail` message
    pub async fn mock_error(&self, verb: &str, route: &str, status: u16, detail: &str) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "detail": detail })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_login(&self, token: &str, must_change_password: bool) {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": token,
                "token_type": "bearer",
                "must_change_password": must_change_password
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount `/auth/me`, `/groups`, `/users` and `/newsletters` for a signed-in session
    pub async fn mock_session(&self, me: Value, groups: Value, users: Value, newsletters: Value) {
        self.mock_json("GET", "/auth/me", 200, me).await;
        self.mock_json("GET", "/groups", 200, groups).await;
        self.mock_json("GET", "/users", 200, users).await;
        self.mock_json("GET", "/newsletters", 200, newsletters).await;
    }

    /// Requests received so far
    pub async fn received(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}
