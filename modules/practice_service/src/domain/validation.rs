//! Form-level validation for practice entities
//!
//! Only shape checks live here: required fields, lengths, e-mail format and
//! non-negative amounts. Cross-field rules (e.g. an appointment ending before it
//! starts) are not enforced.

use crate::contract::{
    AppointmentData, CaseData, ClientData, DocumentMetadata, PracticeError, ProfileUpdate,
    TaskData,
};

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_TEXT_LEN: usize = 10_000;

fn required(field: &str, value: &str) -> Result<(), PracticeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PracticeError::validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(PracticeError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn optional_text(field: &str, value: Option<&str>) -> Result<(), PracticeError> {
    match value {
        Some(text) if text.chars().count() > MAX_TEXT_LEN => Err(PracticeError::validation(
            format!("{field} must be at most {MAX_TEXT_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

/// Minimal e-mail shape check: `local@domain.tld`, no whitespace
pub fn validate_email(email: &str) -> Result<(), PracticeError> {
    let email = email.trim();
    let invalid = || PracticeError::validation(format!("'{email}' is not a valid e-mail address"));

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return Err(invalid());
    };
    if host.is_empty() || tld.len() < 2 {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_client(data: &ClientData) -> Result<(), PracticeError> {
    required("name", &data.name)?;
    if let Some(email) = data.email.as_deref().filter(|e| !e.trim().is_empty()) {
        validate_email(email)?;
    }
    optional_text("notes", data.notes.as_deref())?;
    optional_text("address", data.address.as_deref())
}

pub fn validate_case(data: &CaseData) -> Result<(), PracticeError> {
    required("title", &data.title)?;
    if let Some(value) = data.value {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(PracticeError::validation("value must not be negative"));
        }
    }
    optional_text("description", data.description.as_deref())
}

pub fn validate_document(meta: &DocumentMetadata) -> Result<(), PracticeError> {
    required("name", &meta.name)
}

pub fn validate_task(data: &TaskData) -> Result<(), PracticeError> {
    required("title", &data.title)?;
    optional_text("description", data.description.as_deref())
}

pub fn validate_appointment(data: &AppointmentData) -> Result<(), PracticeError> {
    required("title", &data.title)?;
    optional_text("description", data.description.as_deref())
}

pub fn validate_profile(update: &ProfileUpdate) -> Result<(), PracticeError> {
    required("full_name", &update.full_name)
}

/// Sign-up password policy
pub fn validate_password(password: &str) -> Result<(), PracticeError> {
    if password.chars().count() < 8 {
        return Err(PracticeError::validation(
            "password must be at least 8 characters",
        ));
    }
    Ok(())
}
