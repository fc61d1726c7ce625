//! HTTP Access Layer
//!
//! Thin JSON client for the HackHub REST API, used by the dashboards and
//! `hackhub-cli`. Requests go out as-is: no retries, no auth headers, no
//! response envelope checks beyond decoding the expected type.

use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::api::dto::{HealthResponse, ResultListResponse, TeamListResponse, UserListResponse};
use crate::api::error::ErrorResponse;
use crate::config::ClientConfig;
use crate::model::User;
use crate::roster::RosterSnapshot;
use crate::store::StoreStats;

/// Where the API lives unless configured otherwise
pub const DEFAULT_BASE_URL: &str = "http://localhost:8082/api/v1";

/// Client errors. `Display` is the message shown in error banners.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response; `message` comes from the server's error body when it has one
    #[error("{message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Per-request extras
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    /// Client for [`DEFAULT_BASE_URL`]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        config: Option<&RequestConfig>,
    ) -> Result<T, ClientError> {
        let response = self.send(self.request(Method::GET, path, config)).await?;
        decode(response).await
    }

    pub async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        config: Option<&RequestConfig>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path, config).json(body);
        decode(self.send(builder).await?).await
    }

    pub async fn put<B, T>(
        &self,
        path: &str,
        body: &B,
        config: Option<&RequestConfig>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path, config).json(body);
        decode(self.send(builder).await?).await
    }

    /// DELETE; the API answers 204 so there is nothing to decode
    pub async fn delete(&self, path: &str, config: Option<&RequestConfig>) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, path, config)).await?;
        Ok(())
    }

    /// GET returning the raw body, for CSV downloads
    pub async fn get_text(
        &self,
        path: &str,
        config: Option<&RequestConfig>,
    ) -> Result<String, ClientError> {
        let response = self.send(self.request(Method::GET, path, config)).await?;
        response
            .text()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// PUT /users/{user_id}
    pub async fn update_user<B: Serialize + ?Sized>(
        &self,
        user_id: &str,
        data: &B,
    ) -> Result<User, ClientError> {
        let path = format!("/users/{}", urlencoding::encode(user_id));
        self.put(&path, data, None).await
    }

    pub async fn list_users(&self, role: Option<&str>) -> Result<UserListResponse, ClientError> {
        let config = role.map(|r| RequestConfig::new().query("role", r));
        self.get("/users", config.as_ref()).await
    }

    pub async fn list_teams(&self) -> Result<TeamListResponse, ClientError> {
        self.get("/teams", None).await
    }

    pub async fn team_roster(&self, team_id: &str) -> Result<RosterSnapshot, ClientError> {
        let path = format!("/teams/{}/roster", urlencoding::encode(team_id));
        self.get(&path, None).await
    }

    pub async fn list_results(&self, team_id: Option<&str>) -> Result<ResultListResponse, ClientError> {
        let config = team_id.map(|t| RequestConfig::new().query("team_id", t));
        self.get("/results", config.as_ref()).await
    }

    pub async fn stats(&self) -> Result<StoreStats, ClientError> {
        self.get("/stats", None).await
    }

    /// GET /health on the server root
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let root = self.base_url.trim_end_matches("/api/v1");
        let response = self.send(self.http.get(format!("{}/health", root))).await?;
        decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, config: Option<&RequestConfig>) -> RequestBuilder {
        tracing::debug!(method = %method, path, "API request");

        let mut builder = self.http.request(method, self.url(path));
        if let Some(config) = config {
            if !config.query.is_empty() {
                builder = builder.query(&config.query);
            }
            for (name, value) in &config.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(parsed) => (Some(parsed.error.code), parsed.error.message),
            Err(_) => (None, format!("Request failed with status {}", status)),
        };

        tracing::warn!(status = status.as_u16(), message = %message, "API request failed");
        Err(ClientError::Status {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{build_router, AppState};
    use crate::config::Config;
    use crate::mail::Mailer;
    use crate::media::Uploader;
    use crate::store::Store;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    async fn spawn_server() -> (ApiClient, TempDir) {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.media.local_dir = dir.path().join("media").to_string_lossy().to_string();

        let state = AppState::new(
            Arc::new(Store::open_in_memory().unwrap()),
            Uploader::from_config(&config.media),
            Mailer::disabled(),
            config,
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });

        (ApiClient::with_base_url(format!("http://{}/api/v1", addr)), dir)
    }

    #[test]
    fn test_default_base_url() {
        let client = ApiClient::new();
        assert_eq!(client.base_url(), "http://localhost:8082/api/v1");
        assert_eq!(client.url("/users"), "http://localhost:8082/api/v1/users");
        assert_eq!(client.url("teams/1"), "http://localhost:8082/api/v1/teams/1");
    }

    #[tokio::test]
    async fn test_crud_round_trip() {
        let (client, _dir) = spawn_server().await;

        let user: User = client
            .post(
                "/users",
                &json!({ "name": "Grace", "email": "grace@example.com", "role": "team_member" }),
                None,
            )
            .await
            .unwrap();

        let updated = client
            .update_user(&user.id, &json!({ "college": "Navy" }))
            .await
            .unwrap();
        assert_eq!(updated.college.as_deref(), Some("Navy"));

        let listed = client.list_users(Some("team_member")).await.unwrap();
        assert_eq!(listed.total, 1);

        client
            .delete(&format!("/users/{}", user.id), None)
            .await
            .unwrap();
        assert_eq!(client.list_users(None).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_query_params_are_sent() {
        let (client, _dir) = spawn_server().await;
        for (name, role) in [("A", "admin"), ("B", "team_leader")] {
            let _: User = client
                .post(
                    "/users",
                    &json!({ "name": name, "email": format!("{}@x.io", name), "role": role }),
                    None,
                )
                .await
                .unwrap();
        }

        let config = RequestConfig::new()
            .query("role", "admin")
            .header("X-Request-Source", "test");
        let admins: UserListResponse = client.get("/users", Some(&config)).await.unwrap();
        assert_eq!(admins.total, 1);
        assert_eq!(admins.users[0].name, "A");
    }

    #[tokio::test]
    async fn test_error_message_from_server() {
        let (client, _dir) = spawn_server().await;

        let err = client.team_roster("nope").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Not found: Team with id nope not found");
    }

    #[tokio::test]
    async fn test_health_and_stats() {
        let (client, _dir) = spawn_server().await;

        let health = client.health().await.unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(client.stats().await.unwrap(), StoreStats::default());
    }

    #[tokio::test]
    async fn test_network_error() {
        let client = ApiClient::with_base_url("http://127.0.0.1:9/api/v1");
        let err = client.list_teams().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        assert!(err.to_string().starts_with("Network error"));
    }
}
