//! Native client trait for inter-module communication
//!
//! The read-side API the legal assistant uses to look things up.
//! NO HTTP - direct function calls.

use super::{
    error::PracticeError,
    model::{Appointment, AuthContext, Case, Client, Document, Task},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Practice service read API
#[async_trait]
pub trait PracticeApi: Send + Sync {
    /// Clients whose name, e-mail or document number contains `term` (case-insensitive)
    async fn search_clients(
        &self,
        ctx: &AuthContext,
        term: &str,
    ) -> Result<Vec<Client>, PracticeError>;

    /// Cases linked to a client
    async fn cases_for_client(
        &self,
        ctx: &AuthContext,
        client_id: Uuid,
    ) -> Result<Vec<Case>, PracticeError>;

    /// Documents whose name or type contains `term` (case-insensitive)
    async fn search_documents(
        &self,
        ctx: &AuthContext,
        term: &str,
    ) -> Result<Vec<Document>, PracticeError>;

    /// Tasks due on a given day
    async fn tasks_due_on(
        &self,
        ctx: &AuthContext,
        date: NaiveDate,
    ) -> Result<Vec<Task>, PracticeError>;

    /// Tasks still in `pending` status
    async fn pending_tasks(&self, ctx: &AuthContext) -> Result<Vec<Task>, PracticeError>;

    /// Appointments on a given day, by start time
    async fn appointments_on(
        &self,
        ctx: &AuthContext,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, PracticeError>;
}
