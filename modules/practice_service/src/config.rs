//! Configuration for the practice service module

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variables consulted, in order, when `llm.api_key` is not set
pub const API_KEY_ENV_VARS: &[&str] = &["LEGALDESK_LLM_API_KEY", "OPENAI_API_KEY"];

/// Practice service configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub crypto: CryptoConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

/// Uploaded file storage and signed URLs
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding uploaded objects
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,

    /// Maximum upload size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,

    /// Externally visible base URL used in signed URLs
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Secret for signed URLs; a random one is generated when empty
    #[serde(default)]
    pub signing_secret: String,

    #[serde(default = "default_signed_url_ttl", with = "humantime_serde")]
    pub signed_url_ttl: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            max_file_size: default_max_file_size(),
            public_base_url: default_public_base_url(),
            signing_secret: String::new(),
            signed_url_ttl: default_signed_url_ttl(),
        }
    }
}

/// File encryption
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CryptoConfig {
    /// PBKDF2 iterations for newly encrypted files
    #[serde(default = "default_iterations")]
    pub pbkdf2_iterations: u32,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: default_iterations(),
        }
    }
}

/// Sign-in and sessions
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HS256 secret for session tokens; a random one is generated when empty
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_session_ttl", with = "humantime_serde")]
    pub session_ttl: Duration,

    /// PBKDF2 iterations for password hashes
    #[serde(default = "default_iterations")]
    pub password_iterations: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_ttl: default_session_ttl(),
            password_iterations: default_iterations(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Entry lifetime; `0s` disables caching
    #[serde(default = "default_cache_ttl", with = "humantime_serde")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: default_cache_ttl(),
        }
    }
}

/// Chat-completion endpoint used by the assistant
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// API root; `/chat/completions` is appended
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Falls back to the variables in [`API_KEY_ENV_VARS`]
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_llm_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Earlier conversation messages sent along with each prompt
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout: default_llm_timeout(),
            history_window: default_history_window(),
        }
    }
}

impl LlmConfig {
    /// Configured key, else the first non-empty key from the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .filter_map(|name| std::env::var(name).ok())
                    .find(|key| !key.trim().is_empty())
            })
    }
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("data/objects")
}

fn default_max_file_size() -> usize {
    20 * 1024 * 1024 // 20MB
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_signed_url_ttl() -> Duration {
    Duration::from_secs(15 * 60)
}

fn default_iterations() -> u32 {
    crate::domain::crypto::DEFAULT_ITERATIONS
}

fn default_session_ttl() -> Duration {
    Duration::from_secs(12 * 60 * 60)
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(30)
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_llm_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_history_window() -> usize {
    10
}
