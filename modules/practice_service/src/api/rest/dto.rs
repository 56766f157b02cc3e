//! REST DTOs with serde derives for HTTP API
//!
//! Enumerated fields travel as lowercase strings and are checked when the
//! request is mapped onto the contract types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ===== Auth DTOs =====

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignUpRequest {
    #[schema(example = "maria@silva.adv.br")]
    pub email: String,
    pub password: String,
    #[schema(example = "Maria Silva")]
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionUserDto {
    pub id: Uuid,
    pub email: String,
}

/// Issued session; send `access_token` as a bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUserDto,
}

// ===== Profile DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileDto {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
    /// OAB registration number
    pub bar_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bar_number: Option<String>,
}

// ===== Client DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// CPF or CNPJ
    pub document_number: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    #[schema(example = "individual")]
    pub client_type: String,
    #[schema(example = "active")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create or replace a client
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ClientRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// `individual` (default) or `company`
    #[serde(default)]
    pub client_type: Option<String>,
    /// `active` (default), `inactive` or `potential`
    #[serde(default)]
    pub status: Option<String>,
}

// ===== Case DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub case_number: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub value: Option<Decimal>,
    pub court: Option<String>,
    pub judge: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CaseRequest {
    pub client_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `open` (default), `pending`, `closed` or `appeal`
    #[serde(default)]
    pub status: Option<String>,
    /// `low`, `medium` (default), `high` or `urgent`
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub judge: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

// ===== Document DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub case_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: Option<String>,
    pub document_type: Option<String>,
    pub status: String,
    pub encrypted: bool,
    pub encryption_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Document metadata; the `metadata` part of an upload and the body of an update
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DocumentMetadataRequest {
    pub name: String,
    #[serde(default)]
    pub case_id: Option<Uuid>,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub document_type: Option<String>,
    /// `draft` (default), `review`, `approved` or `signed`
    #[serde(default)]
    pub status: Option<String>,
}

/// Multipart upload form (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadDocumentForm {
    /// JSON-encoded [`DocumentMetadataRequest`]
    pub metadata: String,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Encrypts the stored file when present
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DownloadRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignedUrlDto {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SignedObjectQuery {
    /// Unix expiry timestamp
    pub expires: i64,
    /// Hex SHA-256 signature
    pub signature: String,
}

// ===== Task DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub case_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub case_id: Option<Uuid>,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    /// `pending` (default), `in_progress`, `completed` or `cancelled`
    #[serde(default)]
    pub status: Option<String>,
    /// `low`, `medium` (default), `high` or `urgent`
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

// ===== Appointment DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppointmentDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub case_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub date: NaiveDate,
    #[schema(value_type = String, example = "14:30:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub appointment_type: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AppointmentRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub case_id: Option<Uuid>,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    pub date: NaiveDate,
    #[schema(value_type = String, example = "14:30:00")]
    pub start_time: NaiveTime,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub appointment_type: Option<String>,
    /// `scheduled` (default), `confirmed`, `completed`, `cancelled` or `rescheduled`
    #[serde(default)]
    pub status: Option<String>,
}

// ===== Dashboard and report DTOs =====

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// Reference day; defaults to the server's current date
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardDto {
    pub total_clients: usize,
    pub active_clients: usize,
    pub open_cases: usize,
    pub pending_tasks: usize,
    pub overdue_tasks: usize,
    pub today_appointments: usize,
    pub upcoming_appointments: usize,
    pub open_case_value: Decimal,
    pub next_tasks: Vec<TaskDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CountDto {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientValueDto {
    pub client_id: Uuid,
    pub client_name: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDto {
    pub cases_by_status: Vec<CountDto>,
    pub cases_by_priority: Vec<CountDto>,
    pub tasks_by_status: Vec<CountDto>,
    pub documents_by_status: Vec<CountDto>,
    pub clients_by_type: Vec<CountDto>,
    pub case_value_by_client: Vec<ClientValueDto>,
}

// ===== Assistant DTOs =====

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssistantMessageRequest {
    #[schema(example = "gerar petição inicial para cliente Maria")]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssistantReplyDto {
    #[schema(example = "generate_petition")]
    pub intent: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessageDto {
    /// `user` or `assistant`
    pub role: String,
    pub content: String,
}

// ===== Misc =====

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub status: String,
}
