//! Configuration file parser for ~/.config/tweetfeed/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::links::{DomainBlacklist, ResolverSettings};
use crate::pipeline::FilterOrder;
use crate::source::HttpPostSource;

/// Env var that overrides `bearer_token` from the file.
pub const BEARER_TOKEN_ENV: &str = "TWEETFEED_BEARER_TOKEN";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// A value parsed but cannot be used (e.g. a user agent with newlines).
    #[error("Invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
///
/// Custom Debug impl masks `bearer_token` to prevent secret leakage
/// in logs, error messages, and debug output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the v1.1 REST API.
    pub api_base_url: String,

    /// Pre-issued application bearer token, sent as-is.
    /// `TWEETFEED_BEARER_TOKEN` takes precedence over this.
    pub bearer_token: Option<String>,

    /// Hostnames whose links are dropped.
    pub blacklist: Vec<String>,

    /// Where the blacklist runs relative to link resolution.
    pub filter_order: FilterOrder,

    /// Resolve shortened links unless the request says otherwise.
    pub unshorten_links: bool,

    pub resolver: ResolverConfig,
}

/// The `[resolver]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maximum simultaneous probes.
    pub window: usize,
    pub probe_timeout_secs: u64,
    /// 0 disables the batch deadline.
    pub batch_deadline_secs: u64,
    pub retries: u32,
    pub retry_delay_ms: u64,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Allow probing localhost and private networks.
    pub allow_private_hosts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: HttpPostSource::DEFAULT_BASE_URL.to_string(),
            bearer_token: None,
            blacklist: Vec::new(),
            filter_order: FilterOrder::default(),
            unshorten_links: false,
            resolver: ResolverConfig::default(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            window: 10,
            probe_timeout_secs: 10,
            batch_deadline_secs: 60,
            retries: 1,
            retry_delay_ms: 500,
            max_redirects: 10,
            user_agent: crate::links::DEFAULT_USER_AGENT.to_string(),
            allow_private_hosts: false,
        }
    }
}

/// Mask bearer_token in Debug output to prevent secret leakage.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("blacklist", &self.blacklist)
            .field("filter_order", &self.filter_order)
            .field("unshorten_links", &self.unshorten_links)
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to prevent memory exhaustion
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {} // Size is within limits, proceed
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            warn_unknown_keys(&raw);
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            blacklist = config.blacklist.len(),
            filter_order = ?config.filter_order,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// The bearer token to use: the env var if set, else the file value.
    pub fn effective_bearer_token(&self) -> Option<String> {
        std::env::var(BEARER_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.bearer_token.clone())
    }

    pub fn domain_blacklist(&self) -> DomainBlacklist {
        DomainBlacklist::new(&self.blacklist)
    }

    /// Builds the resolver settings, validating the user agent.
    pub fn resolver_settings(&self) -> Result<ResolverSettings, ConfigError> {
        let r = &self.resolver;
        let user_agent = reqwest::header::HeaderValue::from_str(&r.user_agent).map_err(|e| {
            ConfigError::Invalid {
                key: "resolver.user_agent",
                reason: e.to_string(),
            }
        })?;

        let mut settings = ResolverSettings {
            window: r.window,
            probe_timeout: Duration::from_secs(r.probe_timeout_secs),
            batch_deadline: (r.batch_deadline_secs > 0)
                .then(|| Duration::from_secs(r.batch_deadline_secs)),
            retries: r.retries,
            retry_delay: Duration::from_millis(r.retry_delay_ms),
            ..ResolverSettings::default()
        };
        settings
            .headers
            .insert(reqwest::header::USER_AGENT, user_agent);
        Ok(settings)
    }
}

fn warn_unknown_keys(raw: &toml::Table) {
    const KNOWN_KEYS: &[&str] = &[
        "api_base_url",
        "bearer_token",
        "blacklist",
        "filter_order",
        "unshorten_links",
        "resolver",
    ];
    const KNOWN_RESOLVER_KEYS: &[&str] = &[
        "window",
        "probe_timeout_secs",
        "batch_deadline_secs",
        "retries",
        "retry_delay_ms",
        "max_redirects",
        "user_agent",
        "allow_private_hosts",
    ];

    for key in raw.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            tracing::warn!(key = %key, "Unknown key in config file, ignoring");
        }
    }
    if let Some(resolver) = raw.get("resolver").and_then(toml::Value::as_table) {
        for key in resolver.keys() {
            if !KNOWN_RESOLVER_KEYS.contains(&key.as_str()) {
                tracing::warn!(key = %format!("resolver.{key}"), "Unknown key in config file, ignoring");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
