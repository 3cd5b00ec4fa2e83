use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// Marketplace API usage metrics
#[derive(Debug, Default)]
pub struct ApiMetrics {
    pub total_requests: AtomicU64,
    pub rate_limit_waits: AtomicU64,
    pub errors: AtomicU64,
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub guard_rejections: AtomicU64,
    pub mutations_applied: AtomicU64,
    pub mutations_failed: AtomicU64,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rate_limit_wait(&self) {
        self.rate_limit_waits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// A mutation the client refused to send because the local rules forbid it.
    pub fn record_guard_rejection(&self) {
        self.guard_rejections.fetch_add(1, Ordering::Relaxed);
        warn!("Review action blocked by client-side guard");
    }

    pub fn record_mutation(&self, applied: bool) {
        let counter = if applied {
            &self.mutations_applied
        } else {
            &self.mutations_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> ApiStats {
        ApiStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            rate_limit_waits: self.rate_limit_waits.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            guard_rejections: self.guard_rejections.load(Ordering::Relaxed),
            mutations_applied: self.mutations_applied.load(Ordering::Relaxed),
            mutations_failed: self.mutations_failed.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            requests = stats.total_requests,
            rate_limit_waits = stats.rate_limit_waits,
            errors = stats.errors,
            cache_hit_rate = stats.cache_hit_rate(),
            guard_rejections = stats.guard_rejections,
            applied = stats.mutations_applied,
            failed = stats.mutations_failed,
            "Review session metrics"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiStats {
    pub total_requests: u64,
    pub rate_limit_waits: u64,
    pub errors: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub guard_rejections: u64,
    pub mutations_applied: u64,
    pub mutations_failed: u64,
}

impl ApiStats {
    /// Share of list reads served from cache, 0.0 when nothing was read.
    pub fn cache_hit_rate(&self) -> f64 {
        let reads = self.cache_hits + self.cache_misses;
        if reads == 0 {
            0.0
        } else {
            self.cache_hits as f64 / reads as f64
        }
    }
}

/// Global metrics instance
static API_METRICS: std::sync::LazyLock<ApiMetrics> = std::sync::LazyLock::new(ApiMetrics::new);

pub fn api_metrics() -> &'static ApiMetrics {
    &API_METRICS
}

/// Time an operation and log its duration
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}
