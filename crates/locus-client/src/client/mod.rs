//! HTTP client implementation with caching, bearer auth and retry logic

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use locus_config::toml::{
    ClientSection, DEFAULT_CACHE_TTL_MS, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS,
    DEFAULT_TIMEOUT_MS, DEFAULT_TOKEN_KEY,
};
use locus_core::error::LocusError;
use locus_core::types::HttpMethod;
use locus_core::utils::{request_key, resolve_url};

use crate::api::{ApiResponse, RequestDescriptor};
use crate::auth::{FileStore, MemoryStore, TokenStore};
use crate::cache::{CacheStats, ResponseCache};
use crate::ClientResult;

/// Fixed-delay retry configuration for network failures
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first
    pub max_retries: u32,
    /// Pause before each retry
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

/// API client shared by every page.
///
/// Clones share the same connection pool, token store and response cache.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Underlying HTTP client with connection pooling
    client: Client,
    /// Base URL for relative targets
    base_url: Option<String>,
    /// Per-attempt timeout
    timeout: Duration,
    /// Retry configuration
    retry_config: RetryConfig,
    /// Storage key holding the bearer token
    token_key: String,
    /// Where the bearer token is read from
    token_store: Arc<dyn TokenStore>,
    /// Cached GET responses
    cache: Arc<ResponseCache>,
}

/// Builder for [`ApiClient`]
#[derive(Debug)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    cache_ttl: Duration,
    retry_config: RetryConfig,
    token_key: String,
    token_store: Option<Arc<dyn TokenStore>>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            cache_ttl: Duration::from_millis(DEFAULT_CACHE_TTL_MS),
            retry_config: RetryConfig::default(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            token_store: None,
        }
    }
}

impl ApiClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = key.into();
        self
    }

    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Build the client. Without a token store, an empty in-memory one is used.
    pub fn build(self) -> ClientResult<ApiClient> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = ClientBuilder::new()
            // Connection pooling configuration
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            // Per-attempt timeout
            .timeout(self.timeout)
            .default_headers(default_headers)
            .gzip(true)
            .user_agent(concat!("locus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LocusError::network("Failed to create HTTP client".to_string(), e))?;

        Ok(ApiClient {
            client,
            base_url: self.base_url,
            timeout: self.timeout,
            retry_config: self.retry_config,
            token_key: self.token_key,
            token_store: self
                .token_store
                .unwrap_or_else(|| Arc::new(MemoryStore::new())),
            cache: Arc::new(ResponseCache::new(self.cache_ttl)),
        })
    }
}

impl ApiClient {
    /// Start building a client with default settings
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Create client with default settings and an optional base URL
    pub fn new(base_url: Option<String>) -> ClientResult<Self> {
        let mut builder = Self::builder();
        builder.base_url = base_url;
        builder.build()
    }

    /// Create client from the `[client]` configuration section.
    ///
    /// The bearer token is read from the file store in the configured
    /// storage directory.
    pub fn with_config(config: &ClientSection) -> ClientResult<Self> {
        let storage_dir = config.resolved_storage_dir()?;

        let mut builder = Self::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .cache_ttl(Duration::from_millis(config.cache_ttl_ms))
            .retry_config(RetryConfig {
                max_retries: config.max_retries,
                delay: Duration::from_millis(config.retry_delay_ms),
            })
            .token_key(config.token_key.clone())
            .token_store(Arc::new(FileStore::in_dir(&storage_dir)));
        builder.base_url = config.api_base_url.clone();
        builder.build()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Perform an HTTP request through the cache, auth and retry stages
    pub async fn request(&self, mut descriptor: RequestDescriptor) -> ClientResult<ApiResponse> {
        self.execute(&mut descriptor).await
    }

    /// GET a URL
    pub async fn get(&self, url: &str) -> ClientResult<ApiResponse> {
        self.request(RequestDescriptor::get(url)).await
    }

    /// GET a URL and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ClientResult<T> {
        self.get(url).await?.json()
    }

    /// POST a JSON body
    pub async fn post<B: Serialize>(&self, url: &str, body: &B) -> ClientResult<ApiResponse> {
        self.request(RequestDescriptor::post(url).with_json(body)?).await
    }

    /// PUT a JSON body
    pub async fn put<B: Serialize>(&self, url: &str, body: &B) -> ClientResult<ApiResponse> {
        self.request(RequestDescriptor::put(url).with_json(body)?).await
    }

    /// PATCH a JSON body
    pub async fn patch<B: Serialize>(&self, url: &str, body: &B) -> ClientResult<ApiResponse> {
        self.request(RequestDescriptor::patch(url).with_json(body)?).await
    }

    /// DELETE a URL
    pub async fn delete(&self, url: &str) -> ClientResult<ApiResponse> {
        self.request(RequestDescriptor::delete(url)).await
    }

    /// Drop every cached response
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Response cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Run the pipeline for one descriptor, advancing its retry counter in place
    pub(crate) async fn execute(&self, descriptor: &mut RequestDescriptor) -> ClientResult<ApiResponse> {
        let url = resolve_url(self.base_url.as_deref(), &descriptor.url)?;
        let body = descriptor.body_bytes()?;

        let cache_key = (descriptor.use_cache && descriptor.method.is_cacheable())
            .then(|| request_key(descriptor.method, url.as_str(), body.as_deref()));

        if let Some(key) = &cache_key {
            if let Some(response) = self.cache.get(key) {
                debug!("Cache hit for {} {}", descriptor.method, url);
                return Ok(response);
            }
        }

        let response = self.with_retry(descriptor, &url, body.as_deref()).await?;

        if let Some(key) = cache_key {
            if ResponseCache::should_store(descriptor.method, response.status) {
                debug!("Caching {} {}", descriptor.method, url);
                self.cache.insert(key, response.clone());
            }
        }

        Ok(response)
    }

    /// Dispatch with fixed-delay retries on network errors.
    ///
    /// HTTP error statuses are returned on the first attempt. The last network
    /// error is returned once `retry_count` reaches `max_retries`.
    async fn with_retry(
        &self,
        descriptor: &mut RequestDescriptor,
        url: &url::Url,
        body: Option<&[u8]>,
    ) -> ClientResult<ApiResponse> {
        loop {
            self.inject_auth(descriptor).await;

            let error = match self.dispatch(descriptor, url, body).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            if !error.is_network_error() || descriptor.retry_count >= self.retry_config.max_retries {
                return Err(error);
            }

            descriptor.retry_count += 1;
            warn!(
                "Retry attempt {}/{} for {} ({})",
                descriptor.retry_count, self.retry_config.max_retries, url, error
            );

            tokio::time::sleep(self.retry_config.delay).await;
        }
    }

    /// Attach `Authorization: Bearer <token>` when a token is stored.
    ///
    /// A missing, empty or unreadable token leaves the headers untouched.
    /// Stores may hit the filesystem, so the lookup runs on the blocking pool.
    pub(crate) async fn inject_auth(&self, descriptor: &mut RequestDescriptor) {
        let store = Arc::clone(&self.token_store);
        let key = self.token_key.clone();

        match tokio::task::spawn_blocking(move || store.get_item(&key)).await {
            Ok(Ok(Some(token))) if !token.is_empty() => {
                descriptor.set_header("authorization", format!("Bearer {}", token));
            }
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                warn!("Ignoring unreadable token store: {}", e);
            }
            Err(e) => {
                warn!("Token lookup task failed: {}", e);
            }
        }
    }

    /// Single network attempt
    async fn dispatch(
        &self,
        descriptor: &RequestDescriptor,
        url: &url::Url,
        body: Option<&[u8]>,
    ) -> ClientResult<ApiResponse> {
        debug!(
            "Dispatching {} {} (attempt {})",
            descriptor.method,
            url,
            descriptor.retry_count + 1
        );

        let mut request = self.client.request(to_reqwest_method(descriptor.method), url.clone());
        for (name, value) in &descriptor.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body.to_vec());
        }

        let response = request.send().await.map_err(|e| self.classify(e, url))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        let bytes = response.bytes().await.map_err(|e| self.classify(e, url))?;

        if !(200..300).contains(&status) {
            return Err(LocusError::HttpStatus {
                status,
                url: final_url,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(ApiResponse {
            status,
            url: final_url,
            headers,
            body: bytes.to_vec(),
            cached: false,
        })
    }

    /// Map a transport failure onto the error taxonomy.
    ///
    /// Every reqwest error reaching here means no complete response arrived,
    /// except builder errors, which are malformed requests.
    fn classify(&self, error: reqwest::Error, url: &url::Url) -> LocusError {
        if error.is_builder() {
            LocusError::InvalidRequest {
                message: format!("Could not build request for {}: {}", url, error),
            }
        } else if error.is_timeout() {
            LocusError::Timeout {
                url: url.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            LocusError::network(format!("Request to {} failed: {}", url, error), error)
        }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}
