//! Contract models for the practice service
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use super::error::PracticeError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Declares a closed set of lowercase string values stored as text columns.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident ($label:literal) { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every accepted value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = PracticeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(PracticeError::validation(format!(
                        "invalid {} '{}', expected one of: {}",
                        $label,
                        other,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }
    };
}

string_enum! {
    /// Client kind
    ClientType("client type") {
        Individual => "individual",
        Company => "company",
    }
}

string_enum! {
    /// Client lifecycle status
    ClientStatus("client status") {
        Active => "active",
        Inactive => "inactive",
        Potential => "potential",
    }
}

string_enum! {
    /// Case status
    CaseStatus("case status") {
        Open => "open",
        Pending => "pending",
        Closed => "closed",
        Appeal => "appeal",
    }
}

string_enum! {
    /// Priority shared by cases and tasks
    Priority("priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

string_enum! {
    /// Document review workflow
    DocumentStatus("document status") {
        Draft => "draft",
        Review => "review",
        Approved => "approved",
        Signed => "signed",
    }
}

string_enum! {
    /// Task status
    TaskStatus("task status") {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

string_enum! {
    /// Appointment status
    AppointmentStatus("appointment status") {
        Scheduled => "scheduled",
        Confirmed => "confirmed",
        Completed => "completed",
        Cancelled => "cancelled",
        Rescheduled => "rescheduled",
    }
}

/// A row owned by exactly one authenticated user
///
/// `created_at` and `updated_at` are assigned by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<T> {
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type Client = Record<ClientData>;
pub type Case = Record<CaseData>;
pub type Document = Record<DocumentData>;
pub type Task = Record<TaskData>;
pub type Appointment = Record<AppointmentData>;

/// Editable client fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientData {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// CPF or CNPJ
    pub document_number: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub client_type: ClientType,
    pub status: ClientStatus,
}

/// Editable case fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseData {
    /// Owning client (soft link, no cascade)
    pub client_id: Uuid,
    pub title: String,
    pub case_number: Option<String>,
    pub description: Option<String>,
    pub status: CaseStatus,
    pub priority: Priority,
    /// Monetary value, two decimal places
    pub value: Option<Decimal>,
    pub court: Option<String>,
    pub judge: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Stored document: metadata plus file bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentData {
    pub meta: DocumentMetadata,
    /// Object key in the object store
    pub file_path: String,
    /// Size of the original (plaintext) file in bytes
    pub file_size: i64,
    pub mime_type: Option<String>,
    pub encrypted: bool,
    /// Envelope scheme identifier when `encrypted`; never a password or key
    pub encryption_ref: Option<String>,
}

/// User-editable document metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub name: String,
    pub case_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    /// Free-form label (petição, contrato, procuração, ...)
    pub document_type: Option<String>,
    pub status: DocumentStatus,
}

/// Upload request for a new document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub meta: DocumentMetadata,
    /// Original file name, used to build the object key
    pub file_name: String,
    pub mime_type: Option<String>,
}

/// Editable task fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
    pub title: String,
    pub description: Option<String>,
    pub case_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    /// Assignee profile id
    pub assigned_to: Option<Uuid>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

/// Editable appointment fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentData {
    pub title: String,
    pub description: Option<String>,
    pub case_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    /// Free-form label (audiência, reunião, prazo, ...)
    pub appointment_type: Option<String>,
    pub status: AppointmentStatus,
}

/// One profile per authenticated user; `id` is the user id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
    /// Bar registration number (OAB)
    pub bar_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable profile fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub bar_number: Option<String>,
}

/// Authenticated caller; every write is scoped to `user_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
}

impl AuthContext {
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}

/// Issued on sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthContext,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_clients: usize,
    pub active_clients: usize,
    pub open_cases: usize,
    pub pending_tasks: usize,
    pub overdue_tasks: usize,
    pub today_appointments: usize,
    pub upcoming_appointments: usize,
    /// Sum of the value of cases that are not closed
    pub open_case_value: Decimal,
    /// Next open tasks by due date
    pub next_tasks: Vec<Task>,
}

/// Aggregates for the reports page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PracticeReport {
    pub cases_by_status: Vec<(CaseStatus, usize)>,
    pub cases_by_priority: Vec<(Priority, usize)>,
    pub tasks_by_status: Vec<(TaskStatus, usize)>,
    pub documents_by_status: Vec<(DocumentStatus, usize)>,
    pub clients_by_type: Vec<(ClientType, usize)>,
    /// (client id, client name, summed case value), highest first
    pub case_value_by_client: Vec<(Uuid, String, Decimal)>,
}
