//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::PracticeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize, ToSchema)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// A URI reference that identifies the specific occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request").with_detail(detail)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

impl From<PracticeError> for Problem {
    fn from(error: PracticeError) -> Self {
        map_domain_error(error)
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: PracticeError) -> Problem {
    match error {
        PracticeError::NotFound { resource, id } => {
            Problem::new(StatusCode::NOT_FOUND, format!("{resource} not found"))
                .with_detail(format!("{resource} with id '{id}' was not found"))
        }

        PracticeError::Validation { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
        }

        PracticeError::Unauthenticated => Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized")
            .with_detail("A valid session is required"),

        PracticeError::InvalidCredentials => {
            Problem::new(StatusCode::UNAUTHORIZED, "Invalid Credentials")
                .with_detail("Invalid e-mail or password")
        }

        PracticeError::InvalidPassword => {
            Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Invalid Password")
                .with_detail("The file could not be decrypted with the given password")
        }

        PracticeError::Conflict { reason } => {
            Problem::new(StatusCode::CONFLICT, "Conflict").with_detail(reason)
        }

        PracticeError::Storage { message } => {
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Storage Error").with_detail(message)
        }

        PracticeError::Internal => {
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_detail("An unexpected error occurred")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            map_domain_error(PracticeError::not_found("client", "x")).status,
            404
        );
        assert_eq!(
            map_domain_error(PracticeError::validation("bad")).status,
            400
        );
        assert_eq!(map_domain_error(PracticeError::Unauthenticated).status, 401);
        assert_eq!(map_domain_error(PracticeError::InvalidPassword).status, 422);
        assert_eq!(map_domain_error(PracticeError::Internal).status, 500);
    }

    #[test]
    fn test_internal_detail_is_generic() {
        let problem = map_domain_error(PracticeError::Internal);
        assert_eq!(problem.detail.as_deref(), Some("An unexpected error occurred"));
    }
}
