//! Configuration — process settings and the shared AI provider config.
//!
//! DESIGN
//! ======
//! Everything is read from environment variables (a `.env` file is loaded by
//! `main` first). Parsing goes through a lookup closure so the same code runs
//! against `std::env` in production and a plain map in tests.
//!
//! `ApiSettings` is the single shared handle on the provider config. The
//! "use real API" flag is persisted through a [`ModeStore`] port: hydrated
//! once at startup, written on every toggle. The API key is never persisted.

pub mod store;

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
pub use store::{FileModeStore, MemoryModeStore, ModeStore};

pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_MODE_FILE: &str = ".filing-wizard/api-mode.json";

pub const DEFAULT_DEBOUNCE_MS: u64 = 600;
pub const DEFAULT_MIN_LENGTH: usize = 3;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 4;
pub const DEFAULT_SIMULATED_DELAY_MS: u64 = 800;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while loading or persisting configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The mode file could not be read or written.
    #[error("mode store I/O failed for {path}: {message}")]
    Io { path: String, message: String },

    /// The mode file exists but is not valid JSON.
    #[error("mode store contents invalid: {0}")]
    Corrupt(String),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::Io { .. } => "E_MODE_STORE_IO",
            Self::Corrupt(_) => "E_MODE_STORE_CORRUPT",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

// =============================================================================
// API MODE
// =============================================================================

/// Which backend produces suggestions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiMode {
    #[default]
    Simulation,
    RealApi,
}

impl ApiMode {
    #[must_use]
    pub fn from_flag(use_real_api: bool) -> Self {
        if use_real_api { Self::RealApi } else { Self::Simulation }
    }

    #[must_use]
    pub fn is_real(self) -> bool {
        matches!(self, Self::RealApi)
    }

    /// Short badge shown next to a suggestion panel in development.
    #[must_use]
    pub fn badge(self) -> &'static str {
        match self {
            Self::RealApi => "API",
            Self::Simulation => "Sim",
        }
    }
}

// =============================================================================
// API CONFIG
// =============================================================================

/// Provider settings used by the suggestion adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub use_real_api: bool,
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Passed through to the HTTP client as the per-request timeout.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            use_real_api: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ApiConfig {
    /// Build provider config from environment variables.
    ///
    /// Optional:
    /// - `LLM_API_KEY_ENV`: names the env var holding the key (default `ANTHROPIC_API_KEY`)
    /// - `LLM_ENDPOINT`, `LLM_API_VERSION`, `LLM_MODEL`
    /// - `LLM_MAX_TOKENS`: default 1024
    /// - `LLM_TEMPERATURE`: default 0.7, must be within 0.0..=1.0
    /// - `LLM_TIMEOUT_MS`: default 30000
    ///
    /// A missing key is not an error; real mode simply stays unavailable.
    ///
    /// # Errors
    ///
    /// Returns an error if the temperature is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] but reading through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temperature is out of range.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let key_var = lookup("LLM_API_KEY_ENV").unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        let api_key = lookup(&key_var).unwrap_or_default().trim().to_string();

        let temperature = parse_or(&lookup, "LLM_TEMPERATURE", DEFAULT_TEMPERATURE);
        if !(0.0..=1.0).contains(&temperature) {
            return Err(ConfigError::ConfigParse(format!("LLM_TEMPERATURE out of range: {temperature}")));
        }

        Ok(Self {
            use_real_api: false,
            endpoint: lookup("LLM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_key,
            api_version: lookup("LLM_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: parse_or(&lookup, "LLM_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            temperature,
            timeout_ms: parse_or(&lookup, "LLM_TIMEOUT_MS", DEFAULT_TIMEOUT_MS),
        })
    }

    /// `true` when a non-empty API key is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    #[must_use]
    pub fn mode(&self) -> ApiMode {
        ApiMode::from_flag(self.use_real_api)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

// =============================================================================
// SHARED SETTINGS
// =============================================================================

/// Shared handle on the provider config plus its persistence port.
///
/// Clones share the same config; a toggle through one handle is visible to
/// every other holder, including the suggestion adapter.
#[derive(Clone)]
pub struct ApiSettings {
    config: Arc<RwLock<ApiConfig>>,
    store: Arc<dyn ModeStore>,
}

impl ApiSettings {
    /// Wrap a config without consulting the store.
    pub fn new(config: ApiConfig, store: Arc<dyn ModeStore>) -> Self {
        Self { config: Arc::new(RwLock::new(config)), store }
    }

    /// Wrap a config and re-hydrate the mode flag from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn hydrate(mut config: ApiConfig, store: Arc<dyn ModeStore>) -> Result<Self, ConfigError> {
        if let Some(flag) = store.load()? {
            config.use_real_api = flag;
        }
        Ok(Self::new(config, store))
    }

    /// Copy of the current config.
    #[must_use]
    pub fn snapshot(&self) -> ApiConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn mode(&self) -> ApiMode {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .mode()
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_configured()
    }

    /// Set the mode flag and persist it. Returns the new flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails; the in-memory flag is left
    /// unchanged in that case.
    pub fn set_real_api(&self, enabled: bool) -> Result<bool, ConfigError> {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        self.store.save(enabled)?;
        config.use_real_api = enabled;
        tracing::info!(use_real_api = enabled, "api mode updated");
        Ok(enabled)
    }

    /// Flip the mode flag and persist it. Returns the new flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn toggle_real_api(&self) -> Result<bool, ConfigError> {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let next = !config.use_real_api;
        self.store.save(next)?;
        config.use_real_api = next;
        tracing::info!(use_real_api = next, "api mode toggled");
        Ok(next)
    }

    /// Replace the API key in memory only.
    pub fn set_api_key(&self, api_key: &str) {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.api_key = api_key.trim().to_string();
        tracing::info!(configured = config.is_configured(), "api key updated");
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// Suggestion timing and sizing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestConfig {
    pub debounce: Duration,
    pub min_length: usize,
    pub max_suggestions: usize,
    pub simulated_delay: Duration,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_length: DEFAULT_MIN_LENGTH,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            simulated_delay: Duration::from_millis(DEFAULT_SIMULATED_DELAY_MS),
        }
    }
}

/// Whole-process configuration assembled in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Value of `APP_ENV`, if set.
    pub app_env: Option<String>,
    pub mode_file: PathBuf,
    pub suggest: SuggestConfig,
    pub api: ApiConfig,
}

impl AppConfig {
    /// Build the process config from environment variables.
    ///
    /// - `HOST` (default `127.0.0.1`), `PORT` (default 3000)
    /// - `APP_ENV`: `development` enables the developer toggle
    /// - `API_MODE_FILE`: where the mode flag is persisted
    /// - `SUGGEST_DEBOUNCE_MS`, `SUGGEST_MIN_LENGTH`, `SUGGEST_MAX`,
    ///   `SUGGEST_SIMULATED_DELAY_MS`
    /// - plus everything read by [`ApiConfig::from_env`]
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::ConfigParse(format!("invalid PORT: {raw}")))?,
            None => DEFAULT_PORT,
        };

        let max_suggestions = parse_or(&lookup, "SUGGEST_MAX", DEFAULT_MAX_SUGGESTIONS);
        if max_suggestions == 0 {
            return Err(ConfigError::ConfigParse("SUGGEST_MAX must be at least 1".into()));
        }

        let suggest = SuggestConfig {
            debounce: Duration::from_millis(parse_or(&lookup, "SUGGEST_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)),
            min_length: parse_or(&lookup, "SUGGEST_MIN_LENGTH", DEFAULT_MIN_LENGTH),
            max_suggestions,
            simulated_delay: Duration::from_millis(parse_or(
                &lookup,
                "SUGGEST_SIMULATED_DELAY_MS",
                DEFAULT_SIMULATED_DELAY_MS,
            )),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            app_env: lookup("APP_ENV"),
            mode_file: lookup("API_MODE_FILE").map_or_else(|| PathBuf::from(DEFAULT_MODE_FILE), PathBuf::from),
            suggest,
            api: ApiConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
