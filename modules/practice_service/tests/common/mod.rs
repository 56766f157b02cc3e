//! Shared fixtures and in-memory backends for the integration tests

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use parking_lot::{Mutex, RwLock};
use practice_service::contract::*;
use practice_service::domain::repository::{ObjectStore, OwnedRepository, ProfileRepository};
use practice_service::domain::{
    CompletionRequest, EnvelopeCipher, LanguageModel, LlmError, Repositories, Service,
    ServiceOptions, SignedUrlSigner,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use uuid::Uuid;

/// Iteration count low enough to keep the tests fast
pub const TEST_ITERATIONS: u32 = 1_000;

pub fn print_test_header(test_name: &str, purpose: &str) {
    println!("\n🧪 TEST: {test_name}");
    println!("📋 PURPOSE: {purpose}");
}

// ===== Mock backends =====

/// Pauses one `find` after it has read its row
#[derive(Clone, Default)]
pub struct FindGate {
    /// Signalled once the row has been read
    pub reached: Arc<Notify>,
    /// Notify to let the paused `find` return
    pub release: Arc<Notify>,
}

pub struct MockRepo<T> {
    rows: RwLock<Vec<Record<T>>>,
    finds: AtomicUsize,
    gate: Mutex<Option<FindGate>>,
}

impl<T> MockRepo<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            finds: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    /// Make the next `find` wait on the returned gate
    pub fn hold_next_find(&self) -> FindGate {
        let gate = FindGate::default();
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    /// Number of `find` calls that reached the repository
    pub fn find_calls(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn count(&self) -> usize {
        self.rows.read().len()
    }
}

#[async_trait]
impl<T> OwnedRepository<T> for MockRepo<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn insert(&self, record: &Record<T>) -> Result<Record<T>> {
        self.rows.write().push(record.clone());
        Ok(record.clone())
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<Record<T>>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        let row = self
            .rows
            .read()
            .iter()
            .find(|r| r.user_id == owner && r.id == id)
            .cloned();
        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            gate.reached.notify_one();
            gate.release.notified().await;
        }
        Ok(row)
    }

    async fn list(&self, owner: Uuid) -> Result<Vec<Record<T>>> {
        Ok(self
            .rows
            .read()
            .iter()
            .rev()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect())
    }

    async fn update(&self, record: &Record<T>) -> Result<Option<Record<T>>> {
        let mut rows = self.rows.write();
        let Some(row) = rows
            .iter_mut()
            .find(|r| r.user_id == record.user_id && r.id == record.id)
        else {
            return Ok(None);
        };
        row.data = record.data.clone();
        row.updated_at = record.updated_at;
        Ok(Some(row.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        let mut rows = self.rows.write();
        let before = rows.len();
        rows.retain(|r| !(r.user_id == owner && r.id == id));
        Ok(rows.len() != before)
    }
}

#[derive(Default)]
pub struct MockProfileRepo {
    rows: RwLock<HashMap<Uuid, (Profile, String)>>,
}

#[async_trait]
impl ProfileRepository for MockProfileRepo {
    async fn create(&self, profile: &Profile, password_hash: &str) -> Result<Profile> {
        self.rows
            .write()
            .insert(profile.id, (profile.clone(), password_hash.to_string()));
        Ok(profile.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Profile>> {
        Ok(self.rows.read().get(&id).map(|(p, _)| p.clone()))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<(Profile, String)>> {
        Ok(self
            .rows
            .read()
            .values()
            .find(|(p, _)| p.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update(&self, profile: &Profile) -> Result<Option<Profile>> {
        let mut rows = self.rows.write();
        Ok(rows.get_mut(&profile.id).map(|(stored, _)| {
            *stored = profile.clone();
            stored.clone()
        }))
    }
}

#[derive(Default)]
pub struct MockObjectStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MockObjectStore {
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.objects.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.objects.read().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects.write().remove(key);
        Ok(())
    }
}

/// Language model that records every request and answers with a fixed text
pub struct RecordingModel {
    reply: String,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl RecordingModel {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// Content of the last user message sent in the most recent request
    pub fn last_prompt(&self) -> Option<String> {
        self.requests
            .lock()
            .last()
            .and_then(|r| r.messages.last())
            .map(|m| m.content.clone())
    }
}

#[async_trait]
impl LanguageModel for RecordingModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().push(request);
        Ok(self.reply.clone())
    }
}

pub enum Failure {
    MissingKey,
    Upstream,
}

/// Language model that always fails
pub struct FailingModel(pub Failure);

#[async_trait]
impl LanguageModel for FailingModel {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
        Err(match self.0 {
            Failure::MissingKey => LlmError::MissingApiKey,
            Failure::Upstream => LlmError::Http {
                status: 503,
                body: "upstream unavailable".to_string(),
            },
        })
    }
}

// ===== Service fixture =====

pub struct Fixture {
    pub service: Arc<Service>,
    pub clients: Arc<MockRepo<ClientData>>,
    pub cases: Arc<MockRepo<CaseData>>,
    pub documents: Arc<MockRepo<DocumentData>>,
    pub tasks: Arc<MockRepo<TaskData>>,
    pub appointments: Arc<MockRepo<AppointmentData>>,
    pub profiles: Arc<MockProfileRepo>,
    pub objects: Arc<MockObjectStore>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_options(ServiceOptions::default())
    }

    pub fn with_options(options: ServiceOptions) -> Self {
        let clients = Arc::new(MockRepo::new());
        let cases = Arc::new(MockRepo::new());
        let documents = Arc::new(MockRepo::new());
        let tasks = Arc::new(MockRepo::new());
        let appointments = Arc::new(MockRepo::new());
        let profiles = Arc::new(MockProfileRepo::default());
        let objects = Arc::new(MockObjectStore::default());

        let repos = Repositories {
            clients: clients.clone(),
            cases: cases.clone(),
            documents: documents.clone(),
            tasks: tasks.clone(),
            appointments: appointments.clone(),
            profiles: profiles.clone(),
        };
        let signer = SignedUrlSigner::new(
            "test-signing-secret",
            "http://localhost:8080",
            chrono::Duration::minutes(15),
        );
        let service = Arc::new(Service::new(
            repos,
            objects.clone(),
            EnvelopeCipher::new(TEST_ITERATIONS),
            signer,
            options,
        ));

        Self {
            service,
            clients,
            cases,
            documents,
            tasks,
            appointments,
            profiles,
            objects,
        }
    }
}

pub fn ctx() -> AuthContext {
    let id = Uuid::new_v4();
    AuthContext::new(id, format!("{id}@example.com"))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn client_data(name: &str) -> ClientData {
    ClientData {
        name: name.to_string(),
        email: None,
        phone: None,
        document_number: None,
        address: None,
        notes: None,
        client_type: ClientType::Individual,
        status: ClientStatus::Active,
    }
}

pub fn case_data(client_id: Uuid, title: &str) -> CaseData {
    CaseData {
        client_id,
        title: title.to_string(),
        case_number: None,
        description: None,
        status: CaseStatus::Open,
        priority: Priority::Medium,
        value: None,
        court: None,
        judge: None,
        start_date: None,
        end_date: None,
    }
}

pub fn task_data(title: &str, due: Option<NaiveDate>) -> TaskData {
    TaskData {
        title: title.to_string(),
        description: None,
        case_id: None,
        client_id: None,
        assigned_to: None,
        status: TaskStatus::Pending,
        priority: Priority::Medium,
        due_date: due,
    }
}

pub fn appointment_data(title: &str, on: NaiveDate, at: NaiveTime) -> AppointmentData {
    AppointmentData {
        title: title.to_string(),
        description: None,
        case_id: None,
        client_id: None,
        date: on,
        start_time: at,
        end_time: None,
        location: None,
        appointment_type: None,
        status: AppointmentStatus::Scheduled,
    }
}

pub fn new_document(name: &str, file_name: &str) -> NewDocument {
    NewDocument {
        meta: DocumentMetadata {
            name: name.to_string(),
            case_id: None,
            client_id: None,
            document_type: None,
            status: DocumentStatus::Draft,
        },
        file_name: file_name.to_string(),
        mime_type: Some("application/pdf".to_string()),
    }
}
