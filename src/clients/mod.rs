/// Upstream API clients module
use crate::domain::QueryWindow;
use crate::errors::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Source of raw NEO feed payloads for a query window
#[async_trait]
pub trait NeoSource: Send + Sync {
    async fn fetch_neo_feed(&self, window: &QueryWindow) -> ApiResult<Value>;
}

/// Source of raw natural-event payloads
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self) -> ApiResult<Value>;
}

/// Picture of the day and chat relay
#[async_trait]
pub trait HomeSource: Send + Sync {
    async fn fetch_apod(&self) -> ApiResult<Value>;
    async fn ask(&self, prompt: &str) -> ApiResult<Value>;
}

/// Mars rover photos by sol
#[async_trait]
pub trait MarsSource: Send + Sync {
    async fn fetch_photos(&self, sol: u32) -> ApiResult<Value>;
}

/// HTTP client wrapper with common configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("nasa-explorer/0.1")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }

    /// Send a request and decode the JSON body, mapping non-2xx to an error
    async fn json(&self, req: RequestBuilder, what: &str) -> ApiResult<Value> {
        let resp = req.send().await?;
        let status = resp.status();
        debug!("{} responded with {}", what, status);
        if !status.is_success() {
            return Err(ApiError::UpstreamStatus {
                status: status.as_u16(),
                what: what.to_string(),
            });
        }
        Ok(resp.json().await?)
    }
}

/// Asteroid feed client
pub struct NeoClient {
    http_client: HttpClient,
    base_url: String,
}

impl NeoClient {
    pub fn new(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }
}

#[async_trait]
impl NeoSource for NeoClient {
    async fn fetch_neo_feed(&self, window: &QueryWindow) -> ApiResult<Value> {
        let url = format!("{}/api/neo", self.base_url);
        let req = self.http_client.get_client().get(url).query(&[
            ("startDate", window.start.to_string()),
            ("endDate", window.end.to_string()),
        ]);
        self.http_client.json(req, "neo feed").await
    }
}

/// EONET natural-event client
pub struct EonetClient {
    http_client: HttpClient,
    base_url: String,
}

impl EonetClient {
    pub fn new(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }
}

#[async_trait]
impl EventSource for EonetClient {
    async fn fetch_events(&self) -> ApiResult<Value> {
        let url = format!("{}/api/eonet", self.base_url);
        let req = self.http_client.get_client().get(url);
        self.http_client.json(req, "eonet events").await
    }
}

/// Home page client (APOD + chat)
pub struct HomeClient {
    http_client: HttpClient,
    base_url: String,
}

impl HomeClient {
    pub fn new(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }
}

#[async_trait]
impl HomeSource for HomeClient {
    async fn fetch_apod(&self) -> ApiResult<Value> {
        let url = format!("{}/api/apod", self.base_url);
        let req = self.http_client.get_client().get(url);
        self.http_client.json(req, "apod").await
    }

    async fn ask(&self, prompt: &str) -> ApiResult<Value> {
        let url = format!("{}/api/chat", self.base_url);
        let req = self
            .http_client
            .get_client()
            .post(url)
            .json(&serde_json::json!({ "prompt": prompt }));
        self.http_client.json(req, "chat").await
    }
}

/// Mars rover photo client
pub struct MarsClient {
    http_client: HttpClient,
    base_url: String,
}

impl MarsClient {
    pub fn new(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }
}

#[async_trait]
impl MarsSource for MarsClient {
    async fn fetch_photos(&self, sol: u32) -> ApiResult<Value> {
        let url = format!("{}/api/marsphotos", self.base_url);
        let req = self
            .http_client
            .get_client()
            .get(url)
            .query(&[("sol", sol)]);
        self.http_client.json(req, "mars photos").await
    }
}
