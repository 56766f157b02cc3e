//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.

pub mod client;
pub mod error;
pub mod model;

pub use client::PracticeApi;
pub use error::PracticeError;
pub use model::{
    Appointment, AppointmentData, AppointmentStatus, AuthContext, Case, CaseData, CaseStatus,
    Client, ClientData, ClientStatus, ClientType, DashboardSummary, Document, DocumentData,
    DocumentMetadata, DocumentStatus, NewDocument, PracticeReport, Priority, Profile,
    ProfileUpdate, Record, Session, Task, TaskData, TaskStatus,
};
