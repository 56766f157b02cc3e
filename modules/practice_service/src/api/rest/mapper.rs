//! Mapping between REST DTOs and contract models

use super::dto::*;
use crate::contract::{
    Appointment, AppointmentData, AppointmentStatus, Case, CaseData, CaseStatus, Client,
    ClientData, ClientStatus, ClientType, DashboardSummary, Document, DocumentMetadata,
    DocumentStatus, PracticeError, PracticeReport, Priority, Profile, ProfileUpdate, Session,
    Task, TaskData, TaskStatus,
};
use crate::domain::{AssistantReply, ChatMessage};
use std::str::FromStr;

/// Parse an optional enum field, falling back to `default` when absent or blank
fn parse_or<E: FromStr<Err = PracticeError>>(
    value: Option<String>,
    default: E,
) -> Result<E, PracticeError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => text.parse(),
    }
}

/// Blank optional strings are stored as absent
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn counts<E: std::fmt::Display>(items: Vec<(E, usize)>) -> Vec<CountDto> {
    items
        .into_iter()
        .map(|(value, count)| CountDto {
            value: value.to_string(),
            count,
        })
        .collect()
}

// ===== Auth / profile =====

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.access_token,
            token_type: "Bearer".to_string(),
            expires_at: session.expires_at,
            user: SessionUserDto {
                id: session.user.user_id,
                email: session.user.email,
            },
        }
    }
}

impl From<Profile> for ProfileDto {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            full_name: profile.full_name,
            role: profile.role,
            phone: profile.phone,
            bar_number: profile.bar_number,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            full_name: req.full_name,
            role: clean(req.role),
            phone: clean(req.phone),
            bar_number: clean(req.bar_number),
        }
    }
}

// ===== Clients =====

impl From<Client> for ClientDto {
    fn from(client: Client) -> Self {
        let data = client.data;
        Self {
            id: client.id,
            user_id: client.user_id,
            name: data.name,
            email: data.email,
            phone: data.phone,
            document_number: data.document_number,
            address: data.address,
            notes: data.notes,
            client_type: data.client_type.to_string(),
            status: data.status.to_string(),
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

impl TryFrom<ClientRequest> for ClientData {
    type Error = PracticeError;

    fn try_from(req: ClientRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: req.name.trim().to_string(),
            email: clean(req.email),
            phone: clean(req.phone),
            document_number: clean(req.document_number),
            address: clean(req.address),
            notes: clean(req.notes),
            client_type: parse_or(req.client_type, ClientType::Individual)?,
            status: parse_or(req.status, ClientStatus::Active)?,
        })
    }
}

// ===== Cases =====

impl From<Case> for CaseDto {
    fn from(case: Case) -> Self {
        let data = case.data;
        Self {
            id: case.id,
            user_id: case.user_id,
            client_id: data.client_id,
            title: data.title,
            case_number: data.case_number,
            description: data.description,
            status: data.status.to_string(),
            priority: data.priority.to_string(),
            value: data.value,
            court: data.court,
            judge: data.judge,
            start_date: data.start_date,
            end_date: data.end_date,
            created_at: case.created_at,
            updated_at: case.updated_at,
        }
    }
}

impl TryFrom<CaseRequest> for CaseData {
    type Error = PracticeError;

    fn try_from(req: CaseRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            client_id: req.client_id,
            title: req.title.trim().to_string(),
            case_number: clean(req.case_number),
            description: clean(req.description),
            status: parse_or(req.status, CaseStatus::Open)?,
            priority: parse_or(req.priority, Priority::Medium)?,
            value: req.value.map(|v| v.round_dp(2)),
            court: clean(req.court),
            judge: clean(req.judge),
            start_date: req.start_date,
            end_date: req.end_date,
        })
    }
}

// ===== Documents =====

impl From<Document> for DocumentDto {
    fn from(document: Document) -> Self {
        let data = document.data;
        Self {
            id: document.id,
            user_id: document.user_id,
            case_id: data.meta.case_id,
            client_id: data.meta.client_id,
            name: data.meta.name,
            file_path: data.file_path,
            file_size: data.file_size,
            mime_type: data.mime_type,
            document_type: data.meta.document_type,
            status: data.meta.status.to_string(),
            encrypted: data.encrypted,
            encryption_ref: data.encryption_ref,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}

impl TryFrom<DocumentMetadataRequest> for DocumentMetadata {
    type Error = PracticeError;

    fn try_from(req: DocumentMetadataRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: req.name.trim().to_string(),
            case_id: req.case_id,
            client_id: req.client_id,
            document_type: clean(req.document_type),
            status: parse_or(req.status, DocumentStatus::Draft)?,
        })
    }
}

// ===== Tasks =====

impl From<Task> for TaskDto {
    fn from(task: Task) -> Self {
        let data = task.data;
        Self {
            id: task.id,
            user_id: task.user_id,
            title: data.title,
            description: data.description,
            case_id: data.case_id,
            client_id: data.client_id,
            assigned_to: data.assigned_to,
            status: data.status.to_string(),
            priority: data.priority.to_string(),
            due_date: data.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

impl TryFrom<TaskRequest> for TaskData {
    type Error = PracticeError;

    fn try_from(req: TaskRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: req.title.trim().to_string(),
            description: clean(req.description),
            case_id: req.case_id,
            client_id: req.client_id,
            assigned_to: req.assigned_to,
            status: parse_or(req.status, TaskStatus::Pending)?,
            priority: parse_or(req.priority, Priority::Medium)?,
            due_date: req.due_date,
        })
    }
}

// ===== Appointments =====

impl From<Appointment> for AppointmentDto {
    fn from(appointment: Appointment) -> Self {
        let data = appointment.data;
        Self {
            id: appointment.id,
            user_id: appointment.user_id,
            title: data.title,
            description: data.description,
            case_id: data.case_id,
            client_id: data.client_id,
            date: data.date,
            start_time: data.start_time,
            end_time: data.end_time,
            location: data.location,
            appointment_type: data.appointment_type,
            status: data.status.to_string(),
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        }
    }
}

impl TryFrom<AppointmentRequest> for AppointmentData {
    type Error = PracticeError;

    fn try_from(req: AppointmentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: req.title.trim().to_string(),
            description: clean(req.description),
            case_id: req.case_id,
            client_id: req.client_id,
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
            location: clean(req.location),
            appointment_type: clean(req.appointment_type),
            status: parse_or(req.status, AppointmentStatus::Scheduled)?,
        })
    }
}

// ===== Dashboard / reports =====

impl From<DashboardSummary> for DashboardDto {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            total_clients: summary.total_clients,
            active_clients: summary.active_clients,
            open_cases: summary.open_cases,
            pending_tasks: summary.pending_tasks,
            overdue_tasks: summary.overdue_tasks,
            today_appointments: summary.today_appointments,
            upcoming_appointments: summary.upcoming_appointments,
            open_case_value: summary.open_case_value,
            next_tasks: summary.next_tasks.into_iter().map(TaskDto::from).collect(),
        }
    }
}

impl From<PracticeReport> for ReportDto {
    fn from(report: PracticeReport) -> Self {
        Self {
            cases_by_status: counts(report.cases_by_status),
            cases_by_priority: counts(report.cases_by_priority),
            tasks_by_status: counts(report.tasks_by_status),
            documents_by_status: counts(report.documents_by_status),
            clients_by_type: counts(report.clients_by_type),
            case_value_by_client: report
                .case_value_by_client
                .into_iter()
                .map(|(client_id, client_name, total)| ClientValueDto {
                    client_id,
                    client_name,
                    total,
                })
                .collect(),
        }
    }
}

// ===== Assistant =====

impl From<AssistantReply> for AssistantReplyDto {
    fn from(reply: AssistantReply) -> Self {
        Self {
            intent: reply.intent.as_str().to_string(),
            content: reply.content,
        }
    }
}

impl From<ChatMessage> for ChatMessageDto {
    fn from(message: ChatMessage) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn task_request(status: Option<&str>) -> TaskRequest {
        TaskRequest {
            title: " Protocolar contestação ".to_string(),
            description: Some("   ".to_string()),
            case_id: None,
            client_id: None,
            assigned_to: None,
            status: status.map(str::to_string),
            priority: None,
            due_date: None,
        }
    }

    #[test]
    fn test_defaults_and_trimming() {
        let data = TaskData::try_from(task_request(None)).unwrap();
        assert_eq!(data.title, "Protocolar contestação");
        assert_eq!(data.description, None);
        assert_eq!(data.status, TaskStatus::Pending);
        assert_eq!(data.priority, Priority::Medium);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = TaskData::try_from(task_request(Some("done"))).unwrap_err();
        assert!(matches!(err, PracticeError::Validation { .. }));
        assert!(TaskData::try_from(task_request(Some("in_progress"))).is_ok());
    }

    #[test]
    fn test_case_value_is_rounded_to_cents() {
        let req = CaseRequest {
            client_id: Uuid::new_v4(),
            title: "Ação de despejo".to_string(),
            case_number: None,
            description: None,
            status: Some("appeal".to_string()),
            priority: Some("urgent".to_string()),
            value: Some(rust_decimal::Decimal::new(123_456, 3)),
            court: None,
            judge: None,
            start_date: None,
            end_date: None,
        };
        let data = CaseData::try_from(req).unwrap();
        assert_eq!(data.status, CaseStatus::Appeal);
        assert_eq!(data.priority, Priority::Urgent);
        assert_eq!(data.value, Some(rust_decimal::Decimal::new(12_346, 2)));
    }
}
