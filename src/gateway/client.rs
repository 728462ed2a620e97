//! Backend REST client
//!
//! Every request carries a generated request id and is logged with its status
//! and duration. A 401 clears the stored token before the error is returned.

use std::sync::Arc;
use std::time::{Duration, Instant};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::BackendConfig;
use crate::models::{ContributionStatus, CreateGroupRequest, Group, NewsletterLayout, User};
use crate::utils::errors::{GatewayError, GatewayResult, Result, StudioError};
use crate::utils::helpers::generate_request_id;
use crate::utils::logging::{log_api_error, log_gateway_call};
use super::dto::{
    decode, ContributionCreate, ContributionRead, ContributionStatusUpdate, ErrorBody, GroupCreate, GroupMemberAdd,
    GroupRead, GroupUpdate, NewsletterAdminCreate, NewsletterAdminRead, NewsletterCreate, NewsletterFilter,
    NewsletterRead, PasswordChange, PasswordReset, TokenResponse, UserCreate, UserRead,
};
use super::token::TokenStore;

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub must_change_password: bool,
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient").field("base_url", &self.base_url.as_str()).finish()
    }
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::Unavailable
    } else {
        GatewayError::Transport(e.to_string())
    }
}

/// `detail` of an error body, or the status reason phrase
fn error_detail(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string())
}

impl BackendClient {
    pub fn new(config: &BackendConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| StudioError::Gateway(GatewayError::Transport(e.to_string())))?;

        Ok(Self { client, base_url, tokens })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn has_token(&self) -> bool {
        self.tokens.load().await.is_some()
    }

    fn url(&self, path: &str) -> GatewayResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| GatewayError::Transport(format!("Invalid path {}: {}", path, e)))
    }

    async fn authorized(&self, method: Method, path: &str) -> GatewayResult<RequestBuilder> {
        let token = self.tokens.load().await.ok_or(GatewayError::MissingToken)?;
        Ok(self.client.request(method, self.url(path)?).bearer_auth(token))
    }

    /// Send a request and return the raw body of a successful response
    async fn execute(&self, builder: RequestBuilder, method: &Method, path: &str) -> GatewayResult<String> {
        let request_id = generate_request_id();
        let started = Instant::now();

        let response = builder
            .header("X-Request-Id", request_id.as_str())
            .send()
            .await
            .map_err(|e| {
                let error = map_transport_error(e);
                log_api_error("backend", &error.to_string(), Some(path));
                error
            })?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        log_gateway_call(&request_id, method.as_str(), path, status.as_u16(), duration_ms);

        if status == StatusCode::UNAUTHORIZED {
            if let Err(e) = self.tokens.clear().await {
                warn!(error = %e, "Failed to clear token after 401");
            }
            return Err(GatewayError::Unauthorized(error_detail(status, &body)));
        }

        if !status.is_success() {
            let detail = error_detail(status, &body);
            log_api_error("backend", &detail, Some(path));
            return Err(GatewayError::Api { status: status.as_u16(), detail });
        }

        Ok(body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.authorized(Method::GET, path).await?;
        let body = self.execute(builder, &Method::GET, path).await?;
        Ok(decode(path, &body)?)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, payload: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.authorized(method.clone(), path).await?;
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }
        let body = self.execute(builder, &method, path).await?;
        Ok(decode(path, &body)?)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.authorized(Method::DELETE, path).await?;
        self.execute(builder, &Method::DELETE, path).await?;
        Ok(())
    }

    // Auth

    /// Exchange credentials for a bearer token and persist it
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let path = "/auth/login";
        let builder = self
            .client
            .post(self.url(path)?)
            .form(&[("username", email), ("password", password)]);
        let body = self.execute(builder, &Method::POST, path).await?;
        let token: TokenResponse = decode(path, &body)?;

        self.tokens.save(&token.access_token).await?;
        info!(email = %email, must_change_password = token.must_change_password, "Logged in");
        Ok(LoginOutcome { must_change_password: token.must_change_password })
    }

    pub async fn logout(&self) -> Result<()> {
        self.tokens.clear().await?;
        debug!("Logged out");
        Ok(())
    }

    pub async fn me(&self) -> Result<User> {
        let user: UserRead = self.get("/auth/me").await?;
        Ok(user.into())
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<User> {
        let payload = PasswordChange {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        let user: UserRead = self.send_json(Method::POST, "/auth/change-password", Some(&payload)).await?;
        Ok(user.into())
    }

    pub async fn reset_password(&self, user_id: i64, new_password: &str) -> Result<User> {
        let payload = PasswordReset { new_password: new_password.to_string() };
        let path = format!("/auth/reset-password/{}", user_id);
        let user: UserRead = self.send_json(Method::POST, &path, Some(&payload)).await?;
        Ok(user.into())
    }

    // Groups

    pub async fn groups(&self) -> Result<Vec<Group>> {
        let groups: Vec<GroupRead> = self.get("/groups").await?;
        Ok(groups.into_iter().map(Group::from).collect())
    }

    pub async fn create_group(&self, request: &CreateGroupRequest) -> Result<Group> {
        let payload = GroupCreate { name: request.name.clone(), description: request.description.clone() };
        let group: GroupRead = self.send_json(Method::POST, "/groups", Some(&payload)).await?;
        Ok(group.into())
    }

    pub async fn update_group(&self, group_id: i64, update: &GroupUpdate) -> Result<Group> {
        let path = format!("/groups/{}", group_id);
        let group: GroupRead = self.send_json(Method::PUT, &path, Some(update)).await?;
        Ok(group.into())
    }

    pub async fn delete_group(&self, group_id: i64) -> Result<()> {
        self.delete(&format!("/groups/{}", group_id)).await
    }

    pub async fn add_group_member(&self, group_id: i64, user_id: i64, role_in_group: &str) -> Result<Group> {
        let payload = GroupMemberAdd { user_id, role_in_group: role_in_group.to_string() };
        let path = format!("/groups/{}/members", group_id);
        let group: GroupRead = self.send_json(Method::POST, &path, Some(&payload)).await?;
        Ok(group.into())
    }

    // Users

    pub async fn users(&self) -> Result<Vec<User>> {
        let users: Vec<UserRead> = self.get("/users").await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    pub async fn create_user(&self, payload: &UserCreate) -> Result<User> {
        let user: UserRead = self.send_json(Method::POST, "/users", Some(payload)).await?;
        Ok(user.into())
    }

    // Newsletters

    pub async fn newsletters(&self, filter: &NewsletterFilter) -> Result<Vec<NewsletterRead>> {
        let path = "/newsletters";
        let builder = self.authorized(Method::GET, path).await?.query(filter);
        let body = self.execute(builder, &Method::GET, path).await?;
        Ok(decode(path, &body)?)
    }

    pub async fn newsletter(&self, newsletter_id: i64) -> Result<NewsletterRead> {
        self.get(&format!("/newsletters/{}", newsletter_id)).await
    }

    pub async fn create_newsletter(&self, payload: &NewsletterCreate) -> Result<NewsletterRead> {
        self.send_json(Method::POST, "/newsletters", Some(payload)).await
    }

    pub async fn publish_newsletter(&self, newsletter_id: i64) -> Result<NewsletterRead> {
        let path = format!("/newsletters/{}/publish", newsletter_id);
        self.send_json::<(), _>(Method::POST, &path, None).await
    }

    pub async fn update_layout(&self, newsletter_id: i64, layout: &NewsletterLayout) -> Result<NewsletterRead> {
        let path = format!("/newsletters/{}/layout", newsletter_id);
        self.send_json(Method::PUT, &path, Some(layout)).await
    }

    pub async fn generate_ai_draft(&self, newsletter_id: i64) -> Result<NewsletterRead> {
        let path = format!("/newsletters/{}/ai-draft", newsletter_id);
        self.send_json::<(), _>(Method::POST, &path, None).await
    }

    pub async fn render_newsletter(&self, newsletter_id: i64) -> Result<NewsletterRead> {
        let path = format!("/newsletters/{}/render", newsletter_id);
        self.send_json::<(), _>(Method::POST, &path, None).await
    }

    pub async fn newsletter_admins(&self, newsletter_id: i64) -> Result<Vec<NewsletterAdminRead>> {
        self.get(&format!("/newsletters/{}/admins", newsletter_id)).await
    }

    pub async fn add_newsletter_admin(&self, newsletter_id: i64, user_id: i64) -> Result<NewsletterAdminRead> {
        let path = format!("/newsletters/{}/admins", newsletter_id);
        self.send_json(Method::POST, &path, Some(&NewsletterAdminCreate { user_id })).await
    }

    pub async fn remove_newsletter_admin(&self, newsletter_id: i64, user_id: i64) -> Result<()> {
        self.delete(&format!("/newsletters/{}/admins/{}", newsletter_id, user_id)).await
    }

    // Contributions

    pub async fn my_contributions(&self, newsletter_id: i64) -> Result<Vec<ContributionRead>> {
        self.get(&format!("/newsletters/{}/my-contributions", newsletter_id)).await
    }

    pub async fn contributions(&self, newsletter_id: i64) -> Result<Vec<ContributionRead>> {
        self.get(&format!("/newsletters/{}/contributions", newsletter_id)).await
    }

    pub async fn submit_contribution(&self, newsletter_id: i64, payload: &ContributionCreate) -> Result<ContributionRead> {
        let path = format!("/newsletters/{}/contributions", newsletter_id);
        self.send_json(Method::POST, &path, Some(payload)).await
    }

    pub async fn update_contribution_status(&self, contribution_id: i64, status: ContributionStatus) -> Result<ContributionRead> {
        let path = format!("/contributions/{}/status", contribution_id);
        let payload = ContributionStatusUpdate { status: status.into() };
        self.send_json(Method::POST, &path, Some(&payload)).await
    }
}
