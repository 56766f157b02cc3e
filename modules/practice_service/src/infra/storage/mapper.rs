//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models. Reading a row with
//! an unknown enum value is an error rather than a silent default.

use super::entity::{appointments, cases, clients, documents, profiles, tasks};
use crate::contract::{
    Appointment, AppointmentData, Case, CaseData, Client, ClientData, Document, DocumentData,
    DocumentMetadata, Profile, Record, Task, TaskData,
};
use anyhow::{anyhow, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;

fn cents(value: Decimal) -> Result<i64> {
    (value * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .ok_or_else(|| anyhow!("case value {value} is out of range"))
}

fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

// ===== Profile Conversions =====

impl From<profiles::Model> for Profile {
    fn from(entity: profiles::Model) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            full_name: entity.full_name,
            role: entity.role,
            phone: entity.phone,
            bar_number: entity.bar_number,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

pub fn profile_active_model(profile: &Profile, password_hash: &str) -> profiles::ActiveModel {
    profiles::ActiveModel {
        id: Set(profile.id),
        email: Set(profile.email.to_lowercase()),
        password_hash: Set(password_hash.to_string()),
        full_name: Set(profile.full_name.clone()),
        role: Set(profile.role.clone()),
        phone: Set(profile.phone.clone()),
        bar_number: Set(profile.bar_number.clone()),
        created_at: Set(profile.created_at),
        updated_at: Set(profile.updated_at),
    }
}

// ===== Client Conversions =====

impl TryFrom<clients::Model> for Client {
    type Error = anyhow::Error;

    fn try_from(entity: clients::Model) -> Result<Self> {
        Ok(Record {
            id: entity.id,
            user_id: entity.user_id,
            data: ClientData {
                name: entity.name,
                email: entity.email,
                phone: entity.phone,
                document_number: entity.document_number,
                address: entity.address,
                notes: entity.notes,
                client_type: entity.client_type.parse()?,
                status: entity.status.parse()?,
            },
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl TryFrom<&Client> for clients::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &Client) -> Result<Self> {
        let data = &model.data;
        Ok(Self {
            id: Set(model.id),
            user_id: Set(model.user_id),
            name: Set(data.name.clone()),
            email: Set(data.email.clone()),
            phone: Set(data.phone.clone()),
            document_number: Set(data.document_number.clone()),
            address: Set(data.address.clone()),
            notes: Set(data.notes.clone()),
            client_type: Set(data.client_type.as_str().to_string()),
            status: Set(data.status.as_str().to_string()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        })
    }
}

// ===== Case Conversions =====

impl TryFrom<cases::Model> for Case {
    type Error = anyhow::Error;

    fn try_from(entity: cases::Model) -> Result<Self> {
        Ok(Record {
            id: entity.id,
            user_id: entity.user_id,
            data: CaseData {
                client_id: entity.client_id,
                title: entity.title,
                case_number: entity.case_number,
                description: entity.description,
                status: entity.status.parse()?,
                priority: entity.priority.parse()?,
                value: entity.value_cents.map(from_cents),
                court: entity.court,
                judge: entity.judge,
                start_date: entity.start_date,
                end_date: entity.end_date,
            },
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl TryFrom<&Case> for cases::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &Case) -> Result<Self> {
        let data = &model.data;
        Ok(Self {
            id: Set(model.id),
            user_id: Set(model.user_id),
            client_id: Set(data.client_id),
            title: Set(data.title.clone()),
            case_number: Set(data.case_number.clone()),
            description: Set(data.description.clone()),
            status: Set(data.status.as_str().to_string()),
            priority: Set(data.priority.as_str().to_string()),
            value_cents: Set(data.value.map(cents).transpose()?),
            court: Set(data.court.clone()),
            judge: Set(data.judge.clone()),
            start_date: Set(data.start_date),
            end_date: Set(data.end_date),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        })
    }
}

// ===== Document Conversions =====

impl TryFrom<documents::Model> for Document {
    type Error = anyhow::Error;

    fn try_from(entity: documents::Model) -> Result<Self> {
        Ok(Record {
            id: entity.id,
            user_id: entity.user_id,
            data: DocumentData {
                meta: DocumentMetadata {
                    name: entity.name,
                    case_id: entity.case_id,
                    client_id: entity.client_id,
                    document_type: entity.document_type,
                    status: entity.status.parse()?,
                },
                file_path: entity.file_path,
                file_size: entity.file_size,
                mime_type: entity.mime_type,
                encrypted: entity.encrypted,
                encryption_ref: entity.encryption_ref,
            },
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl TryFrom<&Document> for documents::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &Document) -> Result<Self> {
        let data = &model.data;
        Ok(Self {
            id: Set(model.id),
            user_id: Set(model.user_id),
            case_id: Set(data.meta.case_id),
            client_id: Set(data.meta.client_id),
            name: Set(data.meta.name.clone()),
            file_path: Set(data.file_path.clone()),
            file_size: Set(data.file_size),
            mime_type: Set(data.mime_type.clone()),
            document_type: Set(data.meta.document_type.clone()),
            status: Set(data.meta.status.as_str().to_string()),
            encrypted: Set(data.encrypted),
            encryption_ref: Set(data.encryption_ref.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        })
    }
}

// ===== Task Conversions =====

impl TryFrom<tasks::Model> for Task {
    type Error = anyhow::Error;

    fn try_from(entity: tasks::Model) -> Result<Self> {
        Ok(Record {
            id: entity.id,
            user_id: entity.user_id,
            data: TaskData {
                title: entity.title,
                description: entity.description,
                case_id: entity.case_id,
                client_id: entity.client_id,
                assigned_to: entity.assigned_to,
                status: entity.status.parse()?,
                priority: entity.priority.parse()?,
                due_date: entity.due_date,
            },
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl TryFrom<&Task> for tasks::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &Task) -> Result<Self> {
        let data = &model.data;
        Ok(Self {
            id: Set(model.id),
            user_id: Set(model.user_id),
            case_id: Set(data.case_id),
            client_id: Set(data.client_id),
            assigned_to: Set(data.assigned_to),
            title: Set(data.title.clone()),
            description: Set(data.description.clone()),
            status: Set(data.status.as_str().to_string()),
            priority: Set(data.priority.as_str().to_string()),
            due_date: Set(data.due_date),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        })
    }
}

// ===== Appointment Conversions =====

impl TryFrom<appointments::Model> for Appointment {
    type Error = anyhow::Error;

    fn try_from(entity: appointments::Model) -> Result<Self> {
        Ok(Record {
            id: entity.id,
            user_id: entity.user_id,
            data: AppointmentData {
                title: entity.title,
                description: entity.description,
                case_id: entity.case_id,
                client_id: entity.client_id,
                date: entity.date,
                start_time: entity.start_time,
                end_time: entity.end_time,
                location: entity.location,
                appointment_type: entity.appointment_type,
                status: entity.status.parse()?,
            },
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl TryFrom<&Appointment> for appointments::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &Appointment) -> Result<Self> {
        let data = &model.data;
        Ok(Self {
            id: Set(model.id),
            user_id: Set(model.user_id),
            case_id: Set(data.case_id),
            client_id: Set(data.client_id),
            title: Set(data.title.clone()),
            description: Set(data.description.clone()),
            location: Set(data.location.clone()),
            date: Set(data.date),
            start_time: Set(data.start_time),
            end_time: Set(data.end_time),
            appointment_type: Set(data.appointment_type.clone()),
            status: Set(data.status.as_str().to_string()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_case_value_is_stored_in_cents() {
        assert_eq!(cents(Decimal::new(150_075, 2)).unwrap(), 150_075);
        assert_eq!(cents(Decimal::new(1_999, 3)).unwrap(), 200);
        assert_eq!(from_cents(150_075), Decimal::new(150_075, 2));
    }

    #[test]
    fn test_unknown_status_in_row_is_an_error() {
        let row = tasks::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            case_id: None,
            client_id: None,
            assigned_to: None,
            title: "Protocolar recurso".to_string(),
            description: None,
            status: "done".to_string(),
            priority: "high".to_string(),
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(Task::try_from(row).is_err());
    }
}
