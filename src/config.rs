use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for property-review
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewConfig {
    /// Marketplace API configuration
    pub api: ApiConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
    /// Review workflow settings
    pub review: ReviewSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the marketplace REST API, without trailing slash
    pub base_url: String,
    /// Bearer token (can be set via env var)
    #[serde(default)]
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// How long list pages stay cached (single reads are never cached)
    pub cache_ttl_seconds: u64,
    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Steady-state requests per second
    pub requests_per_second: u32,
    /// Burst capacity
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
    /// Enable API metrics collection
    pub metrics_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewSettings {
    /// Page size used by list and queue commands
    pub default_page_size: u32,
    /// Re-read a property from the API before mutating it
    pub revalidate_remote: bool,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8000/api".to_string(),
                token: None, // Will be read from env var or .property-review-rc
                timeout_seconds: 30,
                cache_ttl_seconds: 30,
                rate_limit: RateLimitConfig {
                    requests_per_second: 5,
                    burst_capacity: 10,
                },
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
                metrics_enabled: true,
            },
            review: ReviewSettings {
                default_page_size: 20,
                revalidate_remote: false,
            },
        }
    }
}

impl ReviewConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (property-review.toml, .property-review-rc)
    /// 3. Environment variables (prefixed with PROPERTY_REVIEW_, nested keys joined by __)
    pub fn load() -> Result<Self> {
        Self::load_with_file(None)
    }

    /// Same as [`ReviewConfig::load`], with an extra file layered on top of the
    /// default files and below the environment.
    pub fn load_with_file(extra: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&ReviewConfig::default())?);

        if Path::new("property-review.toml").exists() {
            builder = builder.add_source(File::with_name("property-review"));
        }

        if Path::new(".property-review-rc").exists() {
            builder = builder.add_source(
                File::with_name(".property-review-rc").format(config::FileFormat::Toml),
            );
        }

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("PROPERTY_REVIEW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut review_config: ReviewConfig = builder.build()?.try_deserialize()?;

        if review_config.api.token.is_none() {
            if let Ok(token) = std::env::var("PROPERTY_REVIEW_API_TOKEN") {
                if !token.trim().is_empty() {
                    review_config.api.token = Some(token);
                }
            }
        }

        review_config.api.base_url = review_config.api.base_url.trim_end_matches('/').to_string();

        Ok(review_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load `.env` from the working directory if it exists.
    ///
    /// Returns whether a file was loaded.
    pub fn load_env_file() -> Result<bool> {
        Self::load_env_file_from(Path::new(".env"))
    }

    pub fn load_env_file_from(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        dotenvy::from_path(path)
            .with_context(|| format!("Failed to parse env file {}", path.display()))?;
        Ok(true)
    }
}
