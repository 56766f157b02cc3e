//! Domain service - owner-scoped CRUD over the practice entities

use super::cache::EntityCache;
use super::crypto::{EnvelopeCipher, ENVELOPE_SCHEME};
use super::repository::{ObjectStore, OwnedRepository, ProfileRepository};
use super::signed_url::{SignedUrl, SignedUrlSigner};
use super::validation;
use crate::contract::{
    Appointment, AppointmentData, AuthContext, Case, CaseData, Client, ClientData, Document,
    DocumentData, DocumentMetadata, NewDocument, PracticeError, Profile, ProfileUpdate, Record,
    Task, TaskData, TaskStatus,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Storage backends the service works against
#[derive(Clone)]
pub struct Repositories {
    pub clients: Arc<dyn OwnedRepository<ClientData>>,
    pub cases: Arc<dyn OwnedRepository<CaseData>>,
    pub documents: Arc<dyn OwnedRepository<DocumentData>>,
    pub tasks: Arc<dyn OwnedRepository<TaskData>>,
    pub appointments: Arc<dyn OwnedRepository<AppointmentData>>,
    pub profiles: Arc<dyn ProfileRepository>,
}

/// Tunables taken from the module configuration
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Largest accepted upload, in bytes
    pub max_file_size: usize,
    /// Zero disables the entity caches
    pub cache_ttl: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            max_file_size: 20 * 1024 * 1024,
            cache_ttl: Duration::from_secs(30),
        }
    }
}

struct Caches {
    clients: EntityCache<ClientData>,
    cases: EntityCache<CaseData>,
    documents: EntityCache<DocumentData>,
    tasks: EntityCache<TaskData>,
    appointments: EntityCache<AppointmentData>,
}

impl Caches {
    fn new(ttl: Duration) -> Self {
        Self {
            clients: EntityCache::new(ttl),
            cases: EntityCache::new(ttl),
            documents: EntityCache::new(ttl),
            tasks: EntityCache::new(ttl),
            appointments: EntityCache::new(ttl),
        }
    }

    fn purge_expired(&self) -> usize {
        self.clients.purge_expired()
            + self.cases.purge_expired()
            + self.documents.purge_expired()
            + self.tasks.purge_expired()
            + self.appointments.purge_expired()
    }
}

/// Domain service for the practice entities
pub struct Service {
    repos: Repositories,
    objects: Arc<dyn ObjectStore>,
    cipher: EnvelopeCipher,
    signer: SignedUrlSigner,
    caches: Caches,
    max_file_size: usize,
}

fn internal(operation: &'static str) -> impl FnOnce(anyhow::Error) -> PracticeError {
    move |err| {
        tracing::error!(operation, error = ?err, "Repository call failed");
        PracticeError::Internal
    }
}

fn storage(operation: &'static str) -> impl FnOnce(anyhow::Error) -> PracticeError {
    move |err| {
        tracing::error!(operation, error = ?err, "Object store call failed");
        PracticeError::Storage {
            message: format!("{operation} failed"),
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Object key for an uploaded file: `{owner}/{uuid}-{sanitized name}`
pub fn object_key(owner: Uuid, file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let mut sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(100)
        .collect();
    sanitized = sanitized.trim_start_matches('.').to_string();
    if sanitized.is_empty() {
        sanitized = "file".to_string();
    }
    format!("{owner}/{}-{sanitized}", Uuid::new_v4())
}

// ===== Generic owner-scoped helpers =====

async fn fetch<T>(
    repo: &dyn OwnedRepository<T>,
    cache: &EntityCache<T>,
    resource: &'static str,
    owner: Uuid,
    id: Uuid,
) -> Result<Record<T>, PracticeError>
where
    T: Clone + Send + Sync + 'static,
{
    if let Some(hit) = cache.get(owner, id) {
        return Ok(hit);
    }
    let seen = cache.generation(owner);
    let record = repo
        .find(owner, id)
        .await
        .map_err(internal(resource))?
        .ok_or_else(|| PracticeError::not_found(resource, id))?;
    cache.put(&record, seen);
    Ok(record)
}

async fn fetch_all<T>(
    repo: &dyn OwnedRepository<T>,
    cache: &EntityCache<T>,
    resource: &'static str,
    owner: Uuid,
) -> Result<Vec<Record<T>>, PracticeError>
where
    T: Clone + Send + Sync + 'static,
{
    if let Some(hit) = cache.get_list(owner) {
        return Ok(hit);
    }
    let seen = cache.generation(owner);
    let records = repo.list(owner).await.map_err(internal(resource))?;
    cache.put_list(owner, &records, seen);
    Ok(records)
}

async fn insert<T>(
    repo: &dyn OwnedRepository<T>,
    cache: &EntityCache<T>,
    resource: &'static str,
    ctx: &AuthContext,
    data: T,
) -> Result<Record<T>, PracticeError>
where
    T: Clone + Send + Sync + 'static,
{
    let now = Utc::now();
    let record = Record {
        id: Uuid::new_v4(),
        user_id: ctx.user_id,
        data,
        created_at: now,
        updated_at: now,
    };
    let created = repo.insert(&record).await.map_err(internal(resource))?;
    cache.invalidate_list(ctx.user_id);
    tracing::info!(resource, id = %created.id, user_id = %ctx.user_id, "Created");
    Ok(created)
}

async fn replace<T>(
    repo: &dyn OwnedRepository<T>,
    cache: &EntityCache<T>,
    resource: &'static str,
    ctx: &AuthContext,
    id: Uuid,
    data: T,
) -> Result<Record<T>, PracticeError>
where
    T: Clone + Send + Sync + 'static,
{
    let now = Utc::now();
    let record = Record {
        id,
        user_id: ctx.user_id,
        data,
        created_at: now,
        updated_at: now,
    };
    let updated = repo.update(&record).await.map_err(internal(resource));
    cache.invalidate(ctx.user_id, id);
    updated?.ok_or_else(|| PracticeError::not_found(resource, id))
}

async fn remove<T>(
    repo: &dyn OwnedRepository<T>,
    cache: &EntityCache<T>,
    resource: &'static str,
    ctx: &AuthContext,
    id: Uuid,
) -> Result<(), PracticeError>
where
    T: Clone + Send + Sync + 'static,
{
    let removed = repo.delete(ctx.user_id, id).await.map_err(internal(resource));
    cache.invalidate(ctx.user_id, id);
    if !removed? {
        return Err(PracticeError::not_found(resource, id));
    }
    tracing::info!(resource, %id, user_id = %ctx.user_id, "Deleted");
    Ok(())
}

impl Service {
    /// Create a new service instance
    pub fn new(
        repos: Repositories,
        objects: Arc<dyn ObjectStore>,
        cipher: EnvelopeCipher,
        signer: SignedUrlSigner,
        options: ServiceOptions,
    ) -> Self {
        Self {
            repos,
            objects,
            cipher,
            signer,
            caches: Caches::new(options.cache_ttl),
            max_file_size: options.max_file_size,
        }
    }

    /// Drop expired cache entries; returns how many were removed
    pub fn purge_expired_caches(&self) -> usize {
        self.caches.purge_expired()
    }

    // ===== Clients =====

    pub async fn create_client(
        &self,
        ctx: &AuthContext,
        data: ClientData,
    ) -> Result<Client, PracticeError> {
        validation::validate_client(&data)?;
        insert(&*self.repos.clients, &self.caches.clients, "client", ctx, data).await
    }

    pub async fn get_client(&self, ctx: &AuthContext, id: Uuid) -> Result<Client, PracticeError> {
        fetch(&*self.repos.clients, &self.caches.clients, "client", ctx.user_id, id).await
    }

    pub async fn list_clients(&self, ctx: &AuthContext) -> Result<Vec<Client>, PracticeError> {
        fetch_all(&*self.repos.clients, &self.caches.clients, "client", ctx.user_id).await
    }

    pub async fn update_client(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        data: ClientData,
    ) -> Result<Client, PracticeError> {
        validation::validate_client(&data)?;
        replace(&*self.repos.clients, &self.caches.clients, "client", ctx, id, data).await
    }

    /// Delete a client; its cases, documents, tasks and appointments are left in place
    pub async fn delete_client(&self, ctx: &AuthContext, id: Uuid) -> Result<(), PracticeError> {
        remove(&*self.repos.clients, &self.caches.clients, "client", ctx, id).await
    }

    /// Clients whose name, e-mail or document number contains `term`
    pub async fn search_clients(
        &self,
        ctx: &AuthContext,
        term: &str,
    ) -> Result<Vec<Client>, PracticeError> {
        let needle = term.trim().to_lowercase();
        let clients = self.list_clients(ctx).await?;
        if needle.is_empty() {
            return Ok(clients);
        }
        Ok(clients
            .into_iter()
            .filter(|c| {
                contains_ci(&c.data.name, &needle)
                    || c.data.email.as_deref().is_some_and(|e| contains_ci(e, &needle))
                    || c.data
                        .document_number
                        .as_deref()
                        .is_some_and(|d| contains_ci(d, &needle))
            })
            .collect())
    }

    // ===== Cases =====

    pub async fn create_case(
        &self,
        ctx: &AuthContext,
        data: CaseData,
    ) -> Result<Case, PracticeError> {
        validation::validate_case(&data)?;
        // a new case must point at a client the caller can see
        self.get_client(ctx, data.client_id).await?;
        insert(&*self.repos.cases, &self.caches.cases, "case", ctx, data).await
    }

    pub async fn get_case(&self, ctx: &AuthContext, id: Uuid) -> Result<Case, PracticeError> {
        fetch(&*self.repos.cases, &self.caches.cases, "case", ctx.user_id, id).await
    }

    pub async fn list_cases(&self, ctx: &AuthContext) -> Result<Vec<Case>, PracticeError> {
        fetch_all(&*self.repos.cases, &self.caches.cases, "case", ctx.user_id).await
    }

    /// Cases of one client; the client itself must be visible to the caller
    pub async fn list_cases_for_client(
        &self,
        ctx: &AuthContext,
        client_id: Uuid,
    ) -> Result<Vec<Case>, PracticeError> {
        self.get_client(ctx, client_id).await?;
        Ok(self
            .list_cases(ctx)
            .await?
            .into_iter()
            .filter(|c| c.data.client_id == client_id)
            .collect())
    }

    pub async fn update_case(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        data: CaseData,
    ) -> Result<Case, PracticeError> {
        validation::validate_case(&data)?;
        let current = self.get_case(ctx, id).await?;
        if current.data.client_id != data.client_id {
            self.get_client(ctx, data.client_id).await?;
        }
        replace(&*self.repos.cases, &self.caches.cases, "case", ctx, id, data).await
    }

    pub async fn delete_case(&self, ctx: &AuthContext, id: Uuid) -> Result<(), PracticeError> {
        remove(&*self.repos.cases, &self.caches.cases, "case", ctx, id).await
    }

    // ===== Documents =====

    /// Store a file and its metadata row, encrypting the file when a password is given
    pub async fn upload_document(
        &self,
        ctx: &AuthContext,
        new: NewDocument,
        bytes: Vec<u8>,
        password: Option<String>,
    ) -> Result<Document, PracticeError> {
        validation::validate_document(&new.meta)?;
        if bytes.is_empty() {
            return Err(PracticeError::validation("file is empty"));
        }
        if bytes.len() > self.max_file_size {
            return Err(PracticeError::validation(format!(
                "file exceeds the maximum size of {} bytes",
                self.max_file_size
            )));
        }
        let password = password.filter(|p| !p.is_empty());

        let file_size = i64::try_from(bytes.len()).map_err(|_| PracticeError::Internal)?;
        let encrypted = password.is_some();
        let stored = match password {
            Some(password) => {
                let cipher = self.cipher;
                tokio::task::spawn_blocking(move || cipher.encrypt(&bytes, &password))
                    .await
                    .map_err(|err| {
                        tracing::error!(error = ?err, "Encryption task failed");
                        PracticeError::Internal
                    })?
                    .map_err(|err| {
                        tracing::error!(error = %err, "Document encryption failed");
                        PracticeError::Internal
                    })?
            }
            None => bytes,
        };

        let key = object_key(ctx.user_id, &new.file_name);
        self.objects
            .put(&key, &stored)
            .await
            .map_err(storage("upload"))?;

        let data = DocumentData {
            meta: new.meta,
            file_path: key.clone(),
            file_size,
            mime_type: new.mime_type,
            encrypted,
            encryption_ref: encrypted.then(|| ENVELOPE_SCHEME.to_string()),
        };
        match insert(
            &*self.repos.documents,
            &self.caches.documents,
            "document",
            ctx,
            data,
        )
        .await
        {
            Ok(document) => Ok(document),
            Err(err) => {
                if let Err(cleanup) = self.objects.delete(&key).await {
                    tracing::warn!(key = %key, error = ?cleanup, "Failed to remove orphaned object");
                }
                Err(err)
            }
        }
    }

    pub async fn get_document(
        &self,
        ctx: &AuthContext,
        id: Uuid,
    ) -> Result<Document, PracticeError> {
        fetch(
            &*self.repos.documents,
            &self.caches.documents,
            "document",
            ctx.user_id,
            id,
        )
        .await
    }

    pub async fn list_documents(&self, ctx: &AuthContext) -> Result<Vec<Document>, PracticeError> {
        fetch_all(
            &*self.repos.documents,
            &self.caches.documents,
            "document",
            ctx.user_id,
        )
        .await
    }

    /// Replace the editable metadata; the stored file is untouched
    pub async fn update_document(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        meta: DocumentMetadata,
    ) -> Result<Document, PracticeError> {
        validation::validate_document(&meta)?;
        let current = self.get_document(ctx, id).await?;
        let data = DocumentData {
            meta,
            ..current.data
        };
        replace(
            &*self.repos.documents,
            &self.caches.documents,
            "document",
            ctx,
            id,
            data,
        )
        .await
    }

    /// Delete the row, then the stored object (best effort)
    pub async fn delete_document(&self, ctx: &AuthContext, id: Uuid) -> Result<(), PracticeError> {
        let document = self.get_document(ctx, id).await?;
        remove(
            &*self.repos.documents,
            &self.caches.documents,
            "document",
            ctx,
            id,
        )
        .await?;
        if let Err(err) = self.objects.delete(&document.data.file_path).await {
            tracing::warn!(key = %document.data.file_path, error = ?err, "Failed to remove stored object");
        }
        Ok(())
    }

    /// Read a document's file, decrypting it when it was uploaded with a password
    pub async fn download_document(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        password: Option<String>,
    ) -> Result<(Document, Vec<u8>), PracticeError> {
        let document = self.get_document(ctx, id).await?;
        let stored = self
            .objects
            .get(&document.data.file_path)
            .await
            .map_err(storage("download"))?
            .ok_or_else(|| PracticeError::not_found("file", &document.data.file_path))?;

        if !document.data.encrypted {
            return Ok((document, stored));
        }
        let Some(password) = password.filter(|p| !p.is_empty()) else {
            return Err(PracticeError::InvalidPassword);
        };
        let cipher = self.cipher;
        let plaintext = tokio::task::spawn_blocking(move || cipher.decrypt(&stored, &password))
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, "Decryption task failed");
                PracticeError::Internal
            })?
            .map_err(|err| {
                tracing::warn!(document_id = %id, error = %err, "Document decryption failed");
                PracticeError::InvalidPassword
            })?;
        Ok((document, plaintext))
    }

    /// Time-limited URL serving the stored object as is
    pub async fn document_signed_url(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<SignedUrl, PracticeError> {
        let document = self.get_document(ctx, id).await?;
        Ok(self.signer.sign(&document.data.file_path, now))
    }

    /// Serve an object addressed by a signed URL
    pub async fn open_signed_object(
        &self,
        key: &str,
        expires: i64,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<u8>, PracticeError> {
        self.signer
            .verify(key, expires, signature, now)
            .map_err(|err| {
                tracing::warn!(key, error = %err, "Rejected signed URL");
                PracticeError::Unauthenticated
            })?;
        self.objects
            .get(key)
            .await
            .map_err(storage("download"))?
            .ok_or_else(|| PracticeError::not_found("file", key))
    }

    /// Documents whose name or type label contains `term`
    pub async fn search_documents(
        &self,
        ctx: &AuthContext,
        term: &str,
    ) -> Result<Vec<Document>, PracticeError> {
        let needle = term.trim().to_lowercase();
        let documents = self.list_documents(ctx).await?;
        if needle.is_empty() {
            return Ok(documents);
        }
        Ok(documents
            .into_iter()
            .filter(|d| {
                contains_ci(&d.data.meta.name, &needle)
                    || d.data
                        .meta
                        .document_type
                        .as_deref()
                        .is_some_and(|t| contains_ci(t, &needle))
            })
            .collect())
    }

    // ===== Tasks =====

    pub async fn create_task(
        &self,
        ctx: &AuthContext,
        data: TaskData,
    ) -> Result<Task, PracticeError> {
        validation::validate_task(&data)?;
        insert(&*self.repos.tasks, &self.caches.tasks, "task", ctx, data).await
    }

    pub async fn get_task(&self, ctx: &AuthContext, id: Uuid) -> Result<Task, PracticeError> {
        fetch(&*self.repos.tasks, &self.caches.tasks, "task", ctx.user_id, id).await
    }

    pub async fn list_tasks(&self, ctx: &AuthContext) -> Result<Vec<Task>, PracticeError> {
        fetch_all(&*self.repos.tasks, &self.caches.tasks, "task", ctx.user_id).await
    }

    pub async fn update_task(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        data: TaskData,
    ) -> Result<Task, PracticeError> {
        validation::validate_task(&data)?;
        replace(&*self.repos.tasks, &self.caches.tasks, "task", ctx, id, data).await
    }

    pub async fn delete_task(&self, ctx: &AuthContext, id: Uuid) -> Result<(), PracticeError> {
        remove(&*self.repos.tasks, &self.caches.tasks, "task", ctx, id).await
    }

    pub async fn tasks_due_on(
        &self,
        ctx: &AuthContext,
        date: NaiveDate,
    ) -> Result<Vec<Task>, PracticeError> {
        Ok(self
            .list_tasks(ctx)
            .await?
            .into_iter()
            .filter(|t| t.data.due_date == Some(date))
            .collect())
    }

    /// Tasks in `pending` status, earliest due date first (undated last)
    pub async fn pending_tasks(&self, ctx: &AuthContext) -> Result<Vec<Task>, PracticeError> {
        let mut tasks: Vec<Task> = self
            .list_tasks(ctx)
            .await?
            .into_iter()
            .filter(|t| t.data.status == TaskStatus::Pending)
            .collect();
        tasks.sort_by_key(|t| (t.data.due_date.is_none(), t.data.due_date));
        Ok(tasks)
    }

    // ===== Appointments =====

    pub async fn create_appointment(
        &self,
        ctx: &AuthContext,
        data: AppointmentData,
    ) -> Result<Appointment, PracticeError> {
        validation::validate_appointment(&data)?;
        insert(
            &*self.repos.appointments,
            &self.caches.appointments,
            "appointment",
            ctx,
            data,
        )
        .await
    }

    pub async fn get_appointment(
        &self,
        ctx: &AuthContext,
        id: Uuid,
    ) -> Result<Appointment, PracticeError> {
        fetch(
            &*self.repos.appointments,
            &self.caches.appointments,
            "appointment",
            ctx.user_id,
            id,
        )
        .await
    }

    pub async fn list_appointments(
        &self,
        ctx: &AuthContext,
    ) -> Result<Vec<Appointment>, PracticeError> {
        fetch_all(
            &*self.repos.appointments,
            &self.caches.appointments,
            "appointment",
            ctx.user_id,
        )
        .await
    }

    pub async fn update_appointment(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        data: AppointmentData,
    ) -> Result<Appointment, PracticeError> {
        validation::validate_appointment(&data)?;
        replace(
            &*self.repos.appointments,
            &self.caches.appointments,
            "appointment",
            ctx,
            id,
            data,
        )
        .await
    }

    pub async fn delete_appointment(
        &self,
        ctx: &AuthContext,
        id: Uuid,
    ) -> Result<(), PracticeError> {
        remove(
            &*self.repos.appointments,
            &self.caches.appointments,
            "appointment",
            ctx,
            id,
        )
        .await
    }

    /// Appointments on `date`, by start time
    pub async fn appointments_on(
        &self,
        ctx: &AuthContext,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, PracticeError> {
        let mut appointments: Vec<Appointment> = self
            .list_appointments(ctx)
            .await?
            .into_iter()
            .filter(|a| a.data.date == date)
            .collect();
        appointments.sort_by_key(|a| a.data.start_time);
        Ok(appointments)
    }

    // ===== Profile =====

    pub async fn get_profile(&self, ctx: &AuthContext) -> Result<Profile, PracticeError> {
        self.repos
            .profiles
            .find(ctx.user_id)
            .await
            .map_err(internal("profile"))?
            .ok_or_else(|| PracticeError::not_found("profile", ctx.user_id))
    }

    pub async fn update_profile(
        &self,
        ctx: &AuthContext,
        update: ProfileUpdate,
    ) -> Result<Profile, PracticeError> {
        validation::validate_profile(&update)?;
        let current = self.get_profile(ctx).await?;
        let profile = Profile {
            full_name: update.full_name.trim().to_string(),
            role: update.role,
            phone: update.phone,
            bar_number: update.bar_number,
            updated_at: Utc::now(),
            ..current
        };
        self.repos
            .profiles
            .update(&profile)
            .await
            .map_err(internal("profile"))?
            .ok_or_else(|| PracticeError::not_found("profile", ctx.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_is_owner_prefixed_and_sanitized() {
        let owner = Uuid::new_v4();
        let key = object_key(owner, "../../etc/Petição inicial.pdf");
        let (prefix, rest) = key.split_once('/').unwrap();

        assert_eq!(prefix, owner.to_string());
        assert!(!rest.contains('/'));
        assert!(rest.ends_with("-Peti__o_inicial.pdf"));
    }

    #[test]
    fn test_object_key_never_empty_or_hidden() {
        let owner = Uuid::new_v4();
        assert!(object_key(owner, "").ends_with("-file"));
        assert!(object_key(owner, "...").ends_with("-file"));
        assert!(object_key(owner, ".env").ends_with("-env"));
    }
}
