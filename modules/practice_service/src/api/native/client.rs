//! Native client implementation - wraps the domain service for in-process calls

use crate::contract::{
    Appointment, AuthContext, Case, Client, Document, PracticeApi, PracticeError, Task,
};
use crate::domain::Service;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

/// Read API backed directly by the domain service
///
/// Used by the assistant so lookups go through the same owner scoping and
/// caches as the REST endpoints.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl PracticeApi for NativeClient {
    async fn search_clients(
        &self,
        ctx: &AuthContext,
        term: &str,
    ) -> Result<Vec<Client>, PracticeError> {
        self.service.search_clients(ctx, term).await
    }

    async fn cases_for_client(
        &self,
        ctx: &AuthContext,
        client_id: Uuid,
    ) -> Result<Vec<Case>, PracticeError> {
        self.service.list_cases_for_client(ctx, client_id).await
    }

    async fn search_documents(
        &self,
        ctx: &AuthContext,
        term: &str,
    ) -> Result<Vec<Document>, PracticeError> {
        self.service.search_documents(ctx, term).await
    }

    async fn tasks_due_on(
        &self,
        ctx: &AuthContext,
        date: NaiveDate,
    ) -> Result<Vec<Task>, PracticeError> {
        self.service.tasks_due_on(ctx, date).await
    }

    async fn pending_tasks(&self, ctx: &AuthContext) -> Result<Vec<Task>, PracticeError> {
        self.service.pending_tasks(ctx).await
    }

    async fn appointments_on(
        &self,
        ctx: &AuthContext,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, PracticeError> {
        self.service.appointments_on(ctx, date).await
    }
}
