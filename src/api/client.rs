use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::errors::{extract_error_message, ApiError};
use super::store::PropertyStore;
use crate::config::ApiConfig;
use crate::observability::api_metrics;
use crate::property::{PageRequest, Property, PropertyFilters, PropertyId, PropertyPage};
use crate::verification::{VerificationStatus, Visibility};

const LIST_CACHE_PREFIX: &str = "list:";

/// Rate-limited marketplace API client.
///
/// List pages are cached for a short TTL and dropped after every successful
/// mutation. Single-record reads and mutations always hit the API.
///
/// A page fetched while a mutation completed is never cached: every write
/// bumps `write_generation`, and a list response only lands in the cache if
/// the generation is the same before and after the request.
#[derive(Debug, Clone)]
pub struct HttpPropertyStore {
    client: reqwest::Client,
    base_url: Url,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    cache: Cache<String, PropertyPage>,
    write_generation: Arc<AtomicU64>,
}

#[derive(Debug, Serialize)]
struct StatusUpdateRequest<'a> {
    verification_status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct VisibilityUpdateRequest {
    visibility: Visibility,
}

/// Some deployments wrap payloads in `{"data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Body<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Body<T> {
    fn into_inner(self) -> T {
        match self {
            Body::Wrapped { data } => data,
            Body::Bare(inner) => inner,
        }
    }
}

impl HttpPropertyStore {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base_url '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!("base_url '{}' cannot be a base", config.base_url)));
        }

        let per_second = NonZeroU32::new(config.rate_limit.requests_per_second)
            .ok_or_else(|| ApiError::Config("rate_limit.requests_per_second must be > 0".to_string()))?;
        let burst = NonZeroU32::new(config.rate_limit.burst_capacity).unwrap_or(per_second);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second).allow_burst(burst)));

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ApiError::Config("token contains invalid header characters".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        let cache = Cache::builder()
            .max_capacity(256)
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .build();

        Ok(Self {
            client,
            base_url,
            rate_limiter,
            cache,
            write_generation: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Config("base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn wait_for_permit(&self) {
        if self.rate_limiter.check().is_err() {
            api_metrics().record_rate_limit_wait();
            self.rate_limiter
                .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
                .await;
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.wait_for_permit().await;
        api_metrics().record_request();

        let response = request.send().await.inspect_err(|_| api_metrics().record_error())?;
        let status = response.status();
        if !status.is_success() {
            api_metrics().record_error();
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "API returned error status");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice::<Body<T>>(&bytes)
            .map(Body::into_inner)
            .map_err(|e| {
                api_metrics().record_error();
                ApiError::Decode(e.to_string())
            })
    }

    fn list_cache_key(filters: &PropertyFilters, page: PageRequest) -> String {
        let mut key = format!("{LIST_CACHE_PREFIX}{}:{}", page.page, page.page_size);
        for (name, value) in filters.query_pairs() {
            key.push_str(&format!("&{name}={value}"));
        }
        key
    }

    /// Record a successful write, then drop every cached list page.
    async fn after_write(&self) {
        self.write_generation.fetch_add(1, Ordering::SeqCst);
        self.invalidate_lists().await;
    }

    /// Drop every cached list page.
    pub async fn invalidate_lists(&self) {
        let keys: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(LIST_CACHE_PREFIX))
            .map(|(key, _)| key.as_ref().clone())
            .collect();

        for key in keys {
            self.cache.invalidate(&key).await;
        }
        debug!("Invalidated cached list pages");
    }
}

#[async_trait]
impl PropertyStore for HttpPropertyStore {
    #[tracing::instrument(skip(self, notes), fields(property.id = %id, target = %target))]
    async fn update_status(
        &self,
        id: &PropertyId,
        target: VerificationStatus,
        notes: Option<String>,
    ) -> Result<Property, ApiError> {
        let url = self.endpoint(&["properties", id.as_str(), "verification-status"])?;
        let body = StatusUpdateRequest {
            verification_status: target,
            notes: notes.as_deref().map(str::trim).filter(|n| !n.is_empty()),
        };
        let property = self.execute(self.client.patch(url).json(&body)).await?;
        self.after_write().await;
        Ok(property)
    }

    #[tracing::instrument(skip(self), fields(property.id = %id, target = %target))]
    async fn update_visibility(&self, id: &PropertyId, target: Visibility) -> Result<Property, ApiError> {
        let url = self.endpoint(&["properties", id.as_str(), "visibility"])?;
        let property = self
            .execute(self.client.patch(url).json(&VisibilityUpdateRequest { visibility: target }))
            .await?;
        self.after_write().await;
        Ok(property)
    }

    #[tracing::instrument(skip(self), fields(property.id = %id))]
    async fn get_property(&self, id: &PropertyId) -> Result<Property, ApiError> {
        let url = self.endpoint(&["properties", id.as_str()])?;
        self.execute(self.client.get(url)).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_properties(
        &self,
        filters: &PropertyFilters,
        page: PageRequest,
    ) -> Result<PropertyPage, ApiError> {
        let key = Self::list_cache_key(filters, page);
        if let Some(cached) = self.cache.get(&key).await {
            api_metrics().record_cache_hit();
            debug!("Cache hit for key: {}", key);
            return Ok(cached);
        }
        api_metrics().record_cache_miss();

        let mut url = self.endpoint(&["properties"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.page.to_string());
            query.append_pair("page_size", &page.page_size.to_string());
            for (name, value) in filters.query_pairs() {
                query.append_pair(name, &value);
            }
        }

        let generation = self.write_generation.load(Ordering::SeqCst);
        let mut result: PropertyPage = self.execute(self.client.get(url)).await?;
        result.page = page.page;

        if self.write_generation.load(Ordering::SeqCst) != generation {
            debug!("Write completed during list fetch, not caching page");
            return Ok(result);
        }
        self.cache.insert(key.clone(), result.clone()).await;
        // a write may have slipped in between the check and the insert
        if self.write_generation.load(Ordering::SeqCst) != generation {
            self.cache.invalidate(&key).await;
        }
        Ok(result)
    }
}
