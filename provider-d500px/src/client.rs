//! 500px API client implementation
//!
//! Implements the `PhotoService` trait for the 500px REST API v1.

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::photo::{PhotoMetadata, PhotoService};
use core_runtime::config::{D500pxApiConfig, DEFAULT_API_BASE_URL};
use core_runtime::logging::redact_url_credentials;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{D500pxError, Result};
use crate::types::{ApiErrorBody, PhotoResponse};

/// 500px API client
///
/// Looks up photos through an injected `HttpClient`. Every lookup is a
/// single request: a failure is returned to the caller, not retried.
///
/// # Example
///
/// ```ignore
/// use provider_d500px::D500pxClient;
/// use bridge_traits::photo::PhotoService;
///
/// let client = D500pxClient::new(http_client, consumer_key);
/// let photo = client.fetch_photo("12345").await?;
/// ```
#[derive(Clone)]
pub struct D500pxClient {
    http_client: Arc<dyn HttpClient>,
    consumer_key: String,
    base_url: String,
    image_sizes: Vec<u32>,
    request_timeout: Duration,
}

impl std::fmt::Debug for D500pxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("D500pxClient")
            .field("base_url", &self.base_url)
            .field("image_sizes", &self.image_sizes)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl D500pxClient {
    /// Create a client against the public API with the default sizes (100, 200)
    pub fn new(http_client: Arc<dyn HttpClient>, consumer_key: impl Into<String>) -> Self {
        Self {
            http_client,
            consumer_key: consumer_key.into(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
            image_sizes: vec![100, 200],
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Create a client from validated API settings
    ///
    /// Fails when no consumer key is configured.
    pub fn from_config(http_client: Arc<dyn HttpClient>, config: &D500pxApiConfig) -> Result<Self> {
        let consumer_key = config
            .consumer_key
            .clone()
            .ok_or(D500pxError::MissingConsumerKey)?;

        Ok(Self::new(http_client, consumer_key)
            .with_base_url(config.base_url.clone())
            .with_image_sizes(config.image_sizes.clone())
            .with_request_timeout(config.request_timeout))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_image_sizes(mut self, sizes: Vec<u32>) -> Self {
        self.image_sizes = sizes;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// `GET {base}/photos/{id}?image_size[]=…&consumer_key=…`
    fn photo_url(&self, photo_id: &str) -> String {
        let sizes: String = self
            .image_sizes
            .iter()
            .map(|size| format!("image_size[]={}&", size))
            .collect();

        format!(
            "{}/photos/{}?{}consumer_key={}",
            self.base_url,
            urlencoding::encode(photo_id),
            sizes,
            urlencoding::encode(&self.consumer_key)
        )
    }

    /// Fetch one photo, reporting provider-level errors
    #[instrument(skip(self))]
    pub async fn get_photo(&self, photo_id: &str) -> Result<PhotoMetadata> {
        let url = self.photo_url(photo_id);
        debug!(url = %redact_url_credentials(&url), "Requesting 500px photo");

        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .timeout(self.request_timeout);

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(error = %e, "500px request failed");
            D500pxError::NetworkError(e.to_string())
        })?;

        if !response.is_success() {
            return Err(Self::api_error(&response));
        }

        self.parse_photo(&response)
    }

    fn api_error(response: &HttpResponse) -> D500pxError {
        let message = response
            .json::<ApiErrorBody>()
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| String::from_utf8_lossy(&response.body).trim().to_string());

        warn!(status = response.status, %message, "500px API returned an error");
        D500pxError::ApiError {
            status_code: response.status,
            message,
        }
    }

    fn parse_photo(&self, response: &HttpResponse) -> Result<PhotoMetadata> {
        if response.body.iter().all(u8::is_ascii_whitespace) {
            warn!("500px API returned an empty body");
            return Err(D500pxError::fetch_failed());
        }

        let envelope: PhotoResponse = serde_json::from_slice(&response.body)
            .map_err(|e| D500pxError::ParseError(e.to_string()))?;

        let photo = envelope.photo.ok_or_else(|| {
            warn!("500px response has no photo");
            D500pxError::fetch_failed()
        })?;

        Ok(photo.into_metadata(&self.image_sizes))
    }
}

#[async_trait]
impl PhotoService for D500pxClient {
    async fn fetch_photo(&self, id: &str) -> bridge_traits::error::Result<PhotoMetadata> {
        Ok(self.get_photo(id).await?)
    }
}
