//! Configuration loading for the `sakha` command-line tool.
//!
//! Configuration is loaded from a TOML file with the following resolution
//! order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.krishi-sakha/config.toml` (user)
//!
//! With no file at either location the defaults apply. The backend API key
//! never lives in the file; it is read from `KRISHI_SAKHA_API_KEY`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::demo::MatcherConfig;
use crate::demo::similarity::DEFAULT_THRESHOLD;
use crate::{Result, SakhaError};

/// Environment variable holding the advice backend API key.
pub const API_KEY_ENV: &str = "KRISHI_SAKHA_API_KEY";

/// Tool configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub backend: BackendSection,
    #[serde(default)]
    pub demo: DemoSection,
}

/// Offline cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Entry lifetime in seconds (default: 86400).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum cached entries; 0 disables the limit (default: 100).
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Storage file (default: `~/.krishi-sakha/cache.json`).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            path: None,
        }
    }
}

fn default_ttl_secs() -> u64 {
    24 * 3600
}

fn default_max_entries() -> usize {
    100
}

/// Advice backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSection {
    /// Endpoint root; no backend when absent.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// Demo mode settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoSection {
    /// Prefer canned answers over the backend (default: false).
    #[serde(default)]
    pub enabled: bool,
    /// Fall back to canned answers when the backend fails (default: true).
    #[serde(default = "default_true")]
    pub fallback: bool,
    /// Minimum match similarity (default: 0.35).
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for DemoSection {
    fn default() -> Self {
        Self {
            enabled: false,
            fallback: true,
            threshold: default_threshold(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Config {
    /// Load configuration from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SakhaError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            SakhaError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path; `None` means use defaults.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(SakhaError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        Ok(user_dir()
            .map(|dir| dir.join("config.toml"))
            .filter(|path| path.exists()))
    }

    /// Cache settings as a [`CacheConfig`].
    pub fn cache_config(&self) -> CacheConfig {
        let config = CacheConfig::new().ttl(Duration::from_secs(self.cache.ttl_secs));
        match self.cache.max_entries {
            0 => config.unbounded(),
            n => config.max_entries(n),
        }
    }

    /// Where the cache file lives.
    pub fn cache_path(&self) -> PathBuf {
        self.cache.path.clone().unwrap_or_else(|| {
            user_dir()
                .unwrap_or_else(|| PathBuf::from(".krishi-sakha"))
                .join("cache.json")
        })
    }

    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig::new().threshold(self.demo.threshold)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }

    /// Backend API key from the environment.
    pub fn api_key() -> Option<String> {
        std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
    }
}

fn user_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".krishi-sakha"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.cache.ttl_secs, 86400);
        assert_eq!(config.cache.max_entries, 100);
        assert!(config.backend.base_url.is_none());
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert!(!config.demo.enabled);
        assert!(config.demo.fallback);
        assert_eq!(config.demo.threshold, 0.35);
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [backend]
            base_url = "https://advice.example.org"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.backend.base_url.as_deref(),
            Some("https://advice.example.org")
        );
        // Defaults preserved
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert_eq!(config.cache.max_entries, 100);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [cache]
            ttl_secs = 3600
            max_entries = 0
            path = "/var/lib/krishi-sakha/cache.json"

            [backend]
            base_url = "http://localhost:8080"
            request_timeout_secs = 5

            [demo]
            enabled = true
            fallback = false
            threshold = 0.5
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache_config().ttl, Duration::from_secs(3600));
        assert_eq!(config.cache_config().max_entries, None);
        assert_eq!(
            config.cache_path(),
            PathBuf::from("/var/lib/krishi-sakha/cache.json")
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(config.demo.enabled);
        assert!(!config.demo.fallback);
        assert_eq!(config.matcher_config().threshold, 0.5);
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn invalid_toml_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[cache\nttl_secs = ").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, SakhaError::Configuration(_)));
    }
}
