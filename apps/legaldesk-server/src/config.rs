//! Server configuration: defaults, then an optional YAML file, then
//! `LEGALDESK__`-prefixed environment variables (`__` separates levels,
//! e.g. `LEGALDESK__PRACTICE__LLM__MODEL`).

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const ENV_PREFIX: &str = "LEGALDESK__";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub practice: practice_service::config::Config,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// How often expired cache entries are evicted
    #[serde(default = "default_purge_interval", with = "humantime_serde")]
    pub cache_purge_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cache_purge_interval: default_purge_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SeaORM connection URL (`sqlite://...` or `postgres://...`)
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_purge_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_database_url() -> String {
    "sqlite://legaldesk.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_log_level() -> String {
    "info,practice_service=debug".to_string()
}

const REDACTED: &str = "<redacted>";

fn redact(secret: &mut String) {
    if !secret.is_empty() {
        *secret = REDACTED.to_string();
    }
}

impl AppConfig {
    /// Copy with secrets masked, for display
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        let practice = &mut cfg.practice;
        redact(&mut practice.auth.jwt_secret);
        redact(&mut practice.storage.signing_secret);
        if let Some(key) = practice.llm.api_key.as_mut() {
            redact(key);
        }
        cfg
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            if !path.exists() {
                bail!("config file '{}' does not exist", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  bind: 127.0.0.1:9000\npractice:\n  llm:\n    model: gpt-4o\n  storage:\n    signed_url_ttl: 5m"
        )
        .unwrap();

        let cfg = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1:9000");
        assert_eq!(cfg.practice.llm.model, "gpt-4o");
        assert_eq!(
            cfg.practice.storage.signed_url_ttl,
            Duration::from_secs(300)
        );
        assert_eq!(cfg.database.max_connections, 10);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "practice:\n  storage:\n    bucket: legal").unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/legaldesk.yaml"))).is_err());
    }

    #[test]
    fn test_redacted_masks_secrets() {
        let mut cfg = AppConfig::default();
        cfg.practice.auth.jwt_secret = "jwt-secret-value".to_string();
        cfg.practice.storage.signing_secret = "signing-secret-value".to_string();
        cfg.practice.llm.api_key = Some("sk-live-123".to_string());

        let shown = serde_yaml::to_string(&cfg.redacted()).unwrap();
        assert!(!shown.contains("jwt-secret-value"));
        assert!(!shown.contains("signing-secret-value"));
        assert!(!shown.contains("sk-live-123"));
        assert_eq!(cfg.redacted().practice.llm.api_key.as_deref(), Some(REDACTED));

        // unset secrets stay visibly unset
        let empty = AppConfig::default().redacted();
        assert!(empty.practice.auth.jwt_secret.is_empty());
    }
}
