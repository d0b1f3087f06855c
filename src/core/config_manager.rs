// src/core/config_manager.rs
//! Client configuration: per-environment `config.yaml` plus env overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::core::poller::PollPolicy;

pub const DEFAULT_GATEWAY_URL: &str = "https://api-gw-production.up.railway.app";
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// Defaults to `{api_base_url}/api/ai`
    pub ai_api_base: Option<String>,
    /// Defaults to `{api_base_url}/api/arc`
    pub arc_api_base: Option<String>,
    pub token_path: PathBuf,
    pub timeout_seconds: u64,
    pub poll_interval_ms: u64,
    pub poll_max_attempts: u32,
    pub login_path: String,
    pub log_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_GATEWAY_URL.to_string(),
            ai_api_base: None,
            arc_api_base: None,
            token_path: PathBuf::from("data/session.toml"),
            timeout_seconds: 60,
            poll_interval_ms: 2000,
            poll_max_attempts: 30,
            login_path: "/login".to_string(),
            log_path: PathBuf::from("/tmp/cv-tailor.log"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<ClientConfig>,
    #[serde(default)]
    production: Option<ClientConfig>,
}

impl ConfigManager {
    /// Load configuration for the current environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment(|key| std::env::var(key).ok());
        info!("Loading client configuration for environment: {}", environment);

        let path = std::env::var("CV_TAILOR_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut manager = Self::load_from_file(&path, &environment)?;
        manager.apply_overrides(|key| std::env::var(key).ok())?;
        manager.validate()?;
        Ok(manager)
    }

    fn get_environment(lookup: impl Fn(&str) -> Option<String>) -> String {
        lookup("CV_TAILOR_ENV")
            .or_else(|| lookup("ENVIRONMENT"))
            .unwrap_or_else(|| "local".to_string())
    }

    /// A missing file yields defaults; a malformed one is an error.
    pub fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        if !path.exists() {
            debug!("{} not found, using defaults", path.display());
            return Ok(Self {
                environment: environment.to_string(),
                client: ClientConfig::default(),
            });
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let client = match environment {
            "production" => file.production,
            _ => file.local,
        }
        .unwrap_or_default();

        Ok(Self {
            environment: environment.to_string(),
            client,
        })
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let client = &mut self.client;

        if let Some(url) = lookup("CV_API_BASE_URL") {
            client.api_base_url = url;
        }
        if let Some(url) = lookup("CV_AI_API_BASE") {
            client.ai_api_base = Some(url);
        }
        if let Some(url) = lookup("CV_ARC_API_BASE") {
            client.arc_api_base = Some(url);
        }
        if let Some(path) = lookup("CV_TOKEN_PATH") {
            client.token_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("CV_LOG_PATH") {
            client.log_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup("CV_TIMEOUT_SECS") {
            client.timeout_seconds = secs
                .parse()
                .context("CV_TIMEOUT_SECS must be a whole number of seconds")?;
        }
        if let Some(ms) = lookup("CV_POLL_INTERVAL_MS") {
            client.poll_interval_ms = ms
                .parse()
                .context("CV_POLL_INTERVAL_MS must be a whole number of milliseconds")?;
        }
        if let Some(attempts) = lookup("CV_POLL_MAX_ATTEMPTS") {
            client.poll_max_attempts = attempts
                .parse()
                .context("CV_POLL_MAX_ATTEMPTS must be a positive integer")?;
        }

        Ok(())
    }

    pub fn validate(&mut self) -> Result<()> {
        let client = &mut self.client;

        client.api_base_url = normalize_base(&client.api_base_url, "api_base_url")?;
        if let Some(url) = client.ai_api_base.take() {
            client.ai_api_base = Some(normalize_base(&url, "ai_api_base")?);
        }
        if let Some(url) = client.arc_api_base.take() {
            client.arc_api_base = Some(normalize_base(&url, "arc_api_base")?);
        }

        if client.poll_max_attempts == 0 {
            anyhow::bail!("poll_max_attempts must be at least 1");
        }
        if client.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than zero");
        }
        if client.timeout_seconds == 0 {
            anyhow::bail!("timeout_seconds must be greater than zero");
        }

        Ok(())
    }
}

impl ClientConfig {
    pub fn ai_base(&self) -> String {
        self.ai_api_base
            .clone()
            .unwrap_or_else(|| format!("{}/api/ai", self.api_base_url))
    }

    pub fn arc_base(&self) -> String {
        self.arc_api_base
            .clone()
            .unwrap_or_else(|| format!("{}/api/arc", self.api_base_url))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.poll_interval_ms),
            self.poll_max_attempts,
        )
    }

    /// Point every service at one base URL, as tests and local gateways do.
    pub fn for_base_url(base: &str) -> Self {
        Self {
            api_base_url: base.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

fn normalize_base(url: &str, field: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        anyhow::bail!("{} must be an http(s) URL, got '{}'", field, url);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let manager =
            ConfigManager::load_from_file(Path::new("/nonexistent/config.yaml"), "local").unwrap();
        assert_eq!(manager.client, ClientConfig::default());
        assert_eq!(
            manager.client.arc_base(),
            "https://api-gw-production.up.railway.app/api/arc"
        );
    }

    #[test]
    fn test_environment_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "local:\n  api_base_url: http://127.0.0.1:8080\n  poll_max_attempts: 5\nproduction:\n  api_base_url: https://gw.example.com/\n"
        )
        .unwrap();

        let local = ConfigManager::load_from_file(file.path(), "local").unwrap();
        assert_eq!(local.client.api_base_url, "http://127.0.0.1:8080");
        assert_eq!(local.client.poll_max_attempts, 5);
        assert_eq!(local.client.poll_interval_ms, 2000);

        let mut prod = ConfigManager::load_from_file(file.path(), "production").unwrap();
        prod.validate().unwrap();
        assert_eq!(prod.client.api_base_url, "https://gw.example.com");
        assert_eq!(prod.client.ai_base(), "https://gw.example.com/api/ai");
    }

    #[test]
    fn test_env_overrides() {
        let mut manager =
            ConfigManager::load_from_file(Path::new("/nonexistent.yaml"), "local").unwrap();
        manager
            .apply_overrides(lookup(&[
                ("CV_API_BASE_URL", "http://localhost:9000/"),
                ("CV_POLL_INTERVAL_MS", "250"),
                ("CV_TOKEN_PATH", "/tmp/t.toml"),
            ]))
            .unwrap();
        manager.validate().unwrap();
        assert_eq!(manager.client.api_base_url, "http://localhost:9000");
        assert_eq!(manager.client.poll_interval_ms, 250);
        assert_eq!(manager.client.token_path, PathBuf::from("/tmp/t.toml"));
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let mut manager =
            ConfigManager::load_from_file(Path::new("/nonexistent.yaml"), "local").unwrap();
        assert!(manager
            .apply_overrides(lookup(&[("CV_POLL_MAX_ATTEMPTS", "many")]))
            .is_err());

        manager
            .apply_overrides(lookup(&[("CV_POLL_MAX_ATTEMPTS", "0")]))
            .unwrap();
        assert!(manager.validate().is_err());

        let mut manager =
            ConfigManager::load_from_file(Path::new("/nonexistent.yaml"), "local").unwrap();
        manager
            .apply_overrides(lookup(&[("CV_API_BASE_URL", "ftp://gw")]))
            .unwrap();
        assert!(manager.validate().is_err());
    }

    #[test]
    fn test_environment_resolution() {
        assert_eq!(ConfigManager::get_environment(lookup(&[])), "local");
        assert_eq!(
            ConfigManager::get_environment(lookup(&[
                ("ENVIRONMENT", "production"),
                ("CV_TAILOR_ENV", "staging")
            ])),
            "staging"
        );
    }
}
