//! Domain layer - business logic and services

pub mod assistant;
pub mod auth;
pub mod cache;
pub mod crypto;
pub mod intent;
pub mod language_model;
pub mod reports;
pub mod repository;
pub mod service;
pub mod signed_url;
pub mod validation;

pub use assistant::{Assistant, AssistantReply};
pub use auth::AuthService;
pub use crypto::EnvelopeCipher;
pub use intent::{Intent, IntentRouter};
pub use language_model::{ChatMessage, CompletionRequest, LanguageModel, LlmError, Role};
pub use repository::{ObjectStore, OwnedRepository, ProfileRepository};
pub use service::{Repositories, Service, ServiceOptions};
pub use signed_url::{SignedUrl, SignedUrlSigner};
