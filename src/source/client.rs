use async_trait::async_trait;
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use thiserror::Error;

use super::{decode_posts, Post, Resource};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors raised while fetching posts from the upstream API.
///
/// Any of these is fatal for the current request: there is no partial
/// result fallback.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// The API answered with an error object
    #[error("API error: {0}")]
    Api(String),
    /// The body was not a recognizable list of posts
    #[error("Malformed response: {0}")]
    Malformed(String),
    /// The base URL plus endpoint did not form a valid URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Supplies decoded posts for a resource.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch(
        &self,
        resource: &Resource,
        params: &[(String, String)],
    ) -> Result<Vec<Post>, SourceError>;
}

/// Fetches posts from the v1.1 REST API over HTTP.
///
/// Request signing is not done here. If the deployment needs credentials, a
/// pre-issued application bearer token is attached as-is.
pub struct HttpPostSource {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<SecretString>,
}

impl HttpPostSource {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.twitter.com/1.1";

    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            bearer_token: None,
        }
    }

    pub fn with_bearer_token(mut self, token: SecretString) -> Self {
        self.bearer_token = Some(token);
        self
    }

    fn request_url(
        &self,
        resource: &Resource,
        params: &[(String, String)],
    ) -> Result<url::Url, SourceError> {
        let raw = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            resource.endpoint()
        );
        let mut url = url::Url::parse(&raw).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        let api_params = resource.api_params(params);
        if !api_params.is_empty() {
            url.query_pairs_mut().extend_pairs(api_params);
        }
        Ok(url)
    }
}

#[async_trait]
impl PostSource for HttpPostSource {
    async fn fetch(
        &self,
        resource: &Resource,
        params: &[(String, String)],
    ) -> Result<Vec<Post>, SourceError> {
        let url = self.request_url(resource, params)?;
        tracing::debug!(resource = %resource, url = %url, "Fetching posts");

        let mut request = self.client.get(url);
        if let Some(token) = &self.bearer_token {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            );
        }

        let response = tokio::time::timeout(FETCH_TIMEOUT, request.send())
            .await
            .map_err(|_| SourceError::Timeout)?
            .map_err(SourceError::Network)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(resource = %resource, status = %status, "Upstream API returned an error status");
            return Err(SourceError::HttpStatus(status.as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        let posts = decode_posts(&bytes)?;
        tracing::info!(resource = %resource, posts = posts.len(), "Fetched posts");
        Ok(posts)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, SourceError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(SourceError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(SourceError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(SourceError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
