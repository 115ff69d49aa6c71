//! HTTP client for the shortener service
//!
//! Transport is a synchronous `ureq` agent driven through
//! `tokio::task::spawn_blocking`, so async callers suspend instead of
//! stalling the runtime. Everything network-facing sits behind the
//! [`StatsGateway`] trait; pipelines and tests run against a scripted
//! gateway instead of the wire.
//!
//! A request that reaches the server resolves to a [`FetchOutcome`]:
//! non-2xx statuses are data (the normalizer's fallback decisions feed
//! on them), only transport-level failures surface as errors.

pub mod payloads;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::Agent;
use url::Url;

use crate::config::ServerConfig;
use crate::errors::{Result, ShortstatsError};
use crate::report::StatsReport;
use payloads::{
    AuthReply, ErrorBody, HealthReply, LoginRequest, MessageReply, MyUrlsReply, RegisterRequest,
    ShortenReply, ShortenRequest,
};

/// Outcome of a request that reached the server
#[derive(Debug, Clone)]
pub enum FetchOutcome<T> {
    /// 2xx with a parsed payload
    Success(T),
    /// Non-2xx; message taken from the error body when it had one
    Failure { status: u16, message: Option<String> },
}

impl<T> FetchOutcome<T> {
    /// Collapse into a `Result` for callers without fallback logic.
    ///
    /// 401/403 map to an auth error, anything else to a service error
    /// carrying the server's message when available.
    pub fn into_result(self, action: &str) -> Result<T> {
        match self {
            FetchOutcome::Success(value) => Ok(value),
            FetchOutcome::Failure { status, message } => {
                let msg = message
                    .unwrap_or_else(|| format!("{} failed (status {})", action, status));
                match status {
                    401 | 403 => Err(ShortstatsError::auth(msg)),
                    _ => Err(ShortstatsError::api(msg)),
                }
            }
        }
    }
}

/// Remote operations the client layer depends on
#[async_trait]
pub trait StatsGateway: Send + Sync {
    async fn enhanced_stats(&self, code: &str) -> Result<FetchOutcome<StatsReport>>;
    async fn basic_stats(&self, code: &str) -> Result<FetchOutcome<StatsReport>>;

    /// Create a short link; the token, when present, associates the
    /// link with the account
    async fn shorten(
        &self,
        request: ShortenRequest,
        token: Option<String>,
    ) -> Result<FetchOutcome<ShortenReply>>;
    async fn login(&self, request: LoginRequest) -> Result<FetchOutcome<AuthReply>>;
    async fn register(&self, request: RegisterRequest) -> Result<FetchOutcome<AuthReply>>;
    async fn my_urls(&self, token: &str) -> Result<FetchOutcome<MyUrlsReply>>;
    async fn delete_url(&self, token: &str, code: &str) -> Result<FetchOutcome<MessageReply>>;
    async fn health(&self) -> Result<FetchOutcome<HealthReply>>;

    /// Fetch raw bytes from an absolute URL (QR images)
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;

    /// Absolute URL of the QR image for a short code
    fn qr_url(&self, code: &str, size: u32) -> String;
}

/// `ureq`-backed gateway implementation
pub struct ApiClient {
    agent: Agent,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base).map_err(|e| {
            ShortstatsError::config(format!("invalid server base URL {:?}: {}", config.base_url, e))
        })?;

        // Non-2xx statuses come back as responses, not errors; the
        // fallback logic needs their bodies.
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self { agent, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<String> {
        self.base_url
            .join(path)
            .map(|u| u.to_string())
            .map_err(|e| ShortstatsError::internal(format!("endpoint join failed: {}", e)))
    }

    /// GET, parse either the payload or the error body (sync, runs in
    /// spawn_blocking)
    fn get_outcome_sync<T: DeserializeOwned>(
        agent: Agent,
        url: String,
        token: Option<String>,
    ) -> Result<FetchOutcome<T>> {
        let mut request = agent.get(&url);
        if let Some(token) = &token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }
        let response = request
            .call()
            .map_err(|e| ShortstatsError::network(e.to_string()))?;
        Self::parse_response(response)
    }

    fn post_outcome_sync<T: DeserializeOwned, B: Serialize>(
        agent: Agent,
        url: String,
        body: B,
        token: Option<String>,
    ) -> Result<FetchOutcome<T>> {
        let mut request = agent.post(&url);
        if let Some(token) = &token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }
        let response = request
            .send_json(&body)
            .map_err(|e| ShortstatsError::network(e.to_string()))?;
        Self::parse_response(response)
    }

    fn delete_outcome_sync<T: DeserializeOwned>(
        agent: Agent,
        url: String,
        token: String,
    ) -> Result<FetchOutcome<T>> {
        let response = agent
            .delete(&url)
            .header("Authorization", &format!("Bearer {}", token))
            .call()
            .map_err(|e| ShortstatsError::network(e.to_string()))?;
        Self::parse_response(response)
    }

    fn get_bytes_sync(agent: Agent, url: String) -> Result<Vec<u8>> {
        let response = agent
            .get(&url)
            .call()
            .map_err(|e| ShortstatsError::network(e.to_string()))?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(ShortstatsError::network(format!(
                "image fetch failed (status {})",
                status
            )));
        }
        response
            .into_body()
            .read_to_vec()
            .map_err(|e| ShortstatsError::network(e.to_string()))
    }

    fn parse_response<T: DeserializeOwned>(
        response: ureq::http::Response<ureq::Body>,
    ) -> Result<FetchOutcome<T>> {
        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| ShortstatsError::network(e.to_string()))?;

        if (200..300).contains(&status) {
            serde_json::from_str::<T>(&body)
                .map(FetchOutcome::Success)
                .map_err(|e| {
                    ShortstatsError::invalid_payload(format!("unexpected response shape: {}", e))
                })
        } else {
            let message = serde_json::from_str::<ErrorBody>(&body).ok().map(|b| b.error);
            debug!(status, ?message, "server returned non-success status");
            Ok(FetchOutcome::Failure { status, message })
        }
    }

    async fn get_outcome<T: DeserializeOwned + Send + 'static>(
        &self,
        path: &str,
        token: Option<String>,
    ) -> Result<FetchOutcome<T>> {
        let agent = self.agent.clone();
        let url = self.endpoint(path)?;
        tokio::task::spawn_blocking(move || Self::get_outcome_sync(agent, url, token))
            .await
            .map_err(|e| ShortstatsError::internal(format!("blocking task failed: {}", e)))?
    }

    async fn post_outcome<T, B>(
        &self,
        path: &str,
        body: B,
        token: Option<String>,
    ) -> Result<FetchOutcome<T>>
    where
        T: DeserializeOwned + Send + 'static,
        B: Serialize + Send + 'static,
    {
        let agent = self.agent.clone();
        let url = self.endpoint(path)?;
        tokio::task::spawn_blocking(move || Self::post_outcome_sync(agent, url, body, token))
            .await
            .map_err(|e| ShortstatsError::internal(format!("blocking task failed: {}", e)))?
    }
}

#[async_trait]
impl StatsGateway for ApiClient {
    async fn enhanced_stats(&self, code: &str) -> Result<FetchOutcome<StatsReport>> {
        self.get_outcome(&format!("api/stats/{}/enhanced", code), None)
            .await
    }

    async fn basic_stats(&self, code: &str) -> Result<FetchOutcome<StatsReport>> {
        self.get_outcome(&format!("api/stats/{}", code), None).await
    }

    async fn shorten(
        &self,
        request: ShortenRequest,
        token: Option<String>,
    ) -> Result<FetchOutcome<ShortenReply>> {
        self.post_outcome("api/shorten", request, token).await
    }

    async fn login(&self, request: LoginRequest) -> Result<FetchOutcome<AuthReply>> {
        self.post_outcome("api/auth/login", request, None).await
    }

    async fn register(&self, request: RegisterRequest) -> Result<FetchOutcome<AuthReply>> {
        self.post_outcome("api/auth/register", request, None).await
    }

    async fn my_urls(&self, token: &str) -> Result<FetchOutcome<MyUrlsReply>> {
        self.get_outcome("api/my-urls", Some(token.to_string())).await
    }

    async fn delete_url(&self, token: &str, code: &str) -> Result<FetchOutcome<MessageReply>> {
        let agent = self.agent.clone();
        let url = self.endpoint(&format!("api/urls/{}", code))?;
        let token = token.to_string();
        tokio::task::spawn_blocking(move || Self::delete_outcome_sync(agent, url, token))
            .await
            .map_err(|e| ShortstatsError::internal(format!("blocking task failed: {}", e)))?
    }

    async fn health(&self) -> Result<FetchOutcome<HealthReply>> {
        self.get_outcome("health", None).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let agent = self.agent.clone();
        let url = url.to_string();
        tokio::task::spawn_blocking(move || Self::get_bytes_sync(agent, url))
            .await
            .map_err(|e| ShortstatsError::internal(format!("blocking task failed: {}", e)))?
    }

    fn qr_url(&self, code: &str, size: u32) -> String {
        format!("{}api/qr/{}?size={}", self.base_url, code, size)
    }
}
