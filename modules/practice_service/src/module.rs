//! Module wiring and lifecycle
//!
//! The hosting application calls [`PracticeServiceModule::migrate`], then
//! [`PracticeServiceModule::init`], then [`PracticeServiceModule::register_rest`].

use crate::config::Config;
use crate::contract::PracticeApi;
use crate::domain::{
    Assistant, AuthService, EnvelopeCipher, IntentRouter, Repositories, Service, ServiceOptions,
    SignedUrlSigner,
};
use crate::infra::storage::{
    SeaOrmAppointmentRepository, SeaOrmCaseRepository, SeaOrmClientRepository,
    SeaOrmDocumentRepository, SeaOrmProfileRepository, SeaOrmTaskRepository,
};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
struct Components {
    service: Arc<Service>,
    auth: Arc<AuthService>,
    assistant: Arc<Assistant>,
    client: Arc<dyn PracticeApi>,
}

/// Practice service module
pub struct PracticeServiceModule {
    config: RwLock<Config>,
    components: RwLock<Option<Components>>,
}

impl Default for PracticeServiceModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            components: RwLock::new(None),
        }
    }
}

/// The configured secret, or 32 random bytes when none is set
fn secret_or_random(configured: &str, setting: &'static str) -> Vec<u8> {
    if configured.is_empty() {
        tracing::warn!(
            setting,
            "No secret configured; generated a random one that will not survive a restart"
        );
        rand::random::<[u8; 32]>().to_vec()
    } else {
        configured.as_bytes().to_vec()
    }
}

fn chrono_duration(value: std::time::Duration, setting: &str) -> Result<chrono::Duration> {
    chrono::Duration::from_std(value).with_context(|| format!("{setting} is out of range"))
}

impl PracticeServiceModule {
    pub async fn init(&self, cfg: Config, db: DatabaseConnection) -> Result<()> {
        let conn = Arc::new(db);

        // Build repositories
        let repos = Repositories {
            clients: Arc::new(SeaOrmClientRepository::new(conn.clone())),
            cases: Arc::new(SeaOrmCaseRepository::new(conn.clone())),
            documents: Arc::new(SeaOrmDocumentRepository::new(conn.clone())),
            tasks: Arc::new(SeaOrmTaskRepository::new(conn.clone())),
            appointments: Arc::new(SeaOrmAppointmentRepository::new(conn.clone())),
            profiles: Arc::new(SeaOrmProfileRepository::new(conn)),
        };
        let objects = Arc::new(crate::infra::blob::FsObjectStore::new(&cfg.storage.root).await?);

        let signer = SignedUrlSigner::new(
            secret_or_random(&cfg.storage.signing_secret, "storage.signing_secret"),
            cfg.storage.public_base_url.clone(),
            chrono_duration(cfg.storage.signed_url_ttl, "storage.signed_url_ttl")?,
        );
        let options = ServiceOptions {
            max_file_size: cfg.storage.max_file_size,
            cache_ttl: cfg.cache.ttl,
        };

        // Build domain services
        let service = Arc::new(Service::new(
            repos.clone(),
            objects,
            EnvelopeCipher::new(cfg.crypto.pbkdf2_iterations),
            signer,
            options,
        ));
        let auth = Arc::new(AuthService::new(
            repos.profiles,
            &secret_or_random(&cfg.auth.jwt_secret, "auth.jwt_secret"),
            chrono_duration(cfg.auth.session_ttl, "auth.session_ttl")?,
            cfg.auth.password_iterations,
        ));

        // The assistant reads practice data through the native client
        let client: Arc<dyn PracticeApi> =
            Arc::new(crate::api::native::NativeClient::new(service.clone()));
        let llm = Arc::new(crate::infra::llm::HttpLanguageModel::new(&cfg.llm)?);
        let router = IntentRouter::new().context("failed to compile intent patterns")?;
        let assistant = Arc::new(Assistant::new(
            client.clone(),
            llm,
            router,
            cfg.llm.history_window,
        ));

        *self.components.write() = Some(Components {
            service,
            auth,
            assistant,
            client,
        });
        *self.config.write() = cfg;

        tracing::info!("Practice service initialized");
        Ok(())
    }

    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Practice service migrations completed");
        Ok(())
    }

    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let components = self
            .components
            .read()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        let max_file_size = self.config.read().storage.max_file_size;

        tracing::info!("Registering practice service REST routes");
        Ok(crate::api::rest::routes::register_routes(
            router,
            components.service,
            components.auth,
            components.assistant,
            max_file_size,
        ))
    }

    /// Evict expired entries from the entity caches
    pub fn purge_caches(&self) -> usize {
        self.components
            .read()
            .as_ref()
            .map_or(0, |c| c.service.purge_expired_caches())
    }

    /// In-process read API for other components
    pub fn client(&self) -> Result<Arc<dyn PracticeApi>> {
        self.components
            .read()
            .as_ref()
            .map(|c| c.client.clone())
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }
}
