//! Route registration and OpenAPI document

use super::{dto::*, error::Problem, handlers};
use crate::domain::{Assistant, AuthService, Service};
use axum::{
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    routing::get,
    routing::post,
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

/// Multipart framing and the metadata part ride on top of the file itself
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(title = "LegalDesk API", description = "Legal practice management"),
    paths(
        handlers::health,
        handlers::sign_up,
        handlers::sign_in,
        handlers::session,
        handlers::get_profile,
        handlers::update_profile,
        handlers::list_clients,
        handlers::search_clients,
        handlers::create_client,
        handlers::get_client,
        handlers::update_client,
        handlers::delete_client,
        handlers::client_cases,
        handlers::list_cases,
        handlers::create_case,
        handlers::get_case,
        handlers::update_case,
        handlers::delete_case,
        handlers::list_documents,
        handlers::upload_document,
        handlers::get_document,
        handlers::update_document,
        handlers::delete_document,
        handlers::download_document,
        handlers::document_signed_url,
        handlers::signed_object,
        handlers::list_tasks,
        handlers::create_task,
        handlers::get_task,
        handlers::update_task,
        handlers::delete_task,
        handlers::list_appointments,
        handlers::create_appointment,
        handlers::get_appointment,
        handlers::update_appointment,
        handlers::delete_appointment,
        handlers::dashboard,
        handlers::reports,
        handlers::assistant_history,
        handlers::assistant_send,
        handlers::assistant_clear,
    ),
    components(schemas(
        Problem,
        SignUpRequest, SignInRequest, SessionDto, SessionUserDto,
        ProfileDto, UpdateProfileRequest,
        ClientDto, ClientRequest,
        CaseDto, CaseRequest,
        DocumentDto, DocumentMetadataRequest, UploadDocumentForm, DownloadRequest, SignedUrlDto,
        TaskDto, TaskRequest,
        AppointmentDto, AppointmentRequest,
        DashboardDto, ReportDto, CountDto, ClientValueDto,
        AssistantMessageRequest, AssistantReplyDto, ChatMessageDto,
        HealthDto,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Sign-up, sign-in and sessions"),
        (name = "clients"),
        (name = "cases"),
        (name = "documents", description = "Files with optional password encryption"),
        (name = "tasks"),
        (name = "appointments"),
        (name = "reports", description = "Dashboard and aggregate reports"),
        (name = "assistant", description = "Chat assistant"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found(uri: Uri) -> Problem {
    Problem::new(StatusCode::NOT_FOUND, "Not Found")
        .with_detail("No route matches the request")
        .with_instance(uri.path())
}

/// Register all REST routes on `router`
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    auth: Arc<AuthService>,
    assistant: Arc<Assistant>,
    max_file_size: usize,
) -> Router {
    router
        .route("/health", get(handlers::health))
        .route("/openapi.json", get(openapi_json))
        // Auth and profile
        .route("/auth/sign-up", post(handlers::sign_up))
        .route("/auth/sign-in", post(handlers::sign_in))
        .route("/auth/session", get(handlers::session))
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        // Clients
        .route(
            "/clients",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route("/clients/search", get(handlers::search_clients))
        .route(
            "/clients/{id}",
            get(handlers::get_client)
                .put(handlers::update_client)
                .delete(handlers::delete_client),
        )
        .route("/clients/{id}/cases", get(handlers::client_cases))
        // Cases
        .route(
            "/cases",
            get(handlers::list_cases).post(handlers::create_case),
        )
        .route(
            "/cases/{id}",
            get(handlers::get_case)
                .put(handlers::update_case)
                .delete(handlers::delete_case),
        )
        // Documents
        .route(
            "/documents",
            get(handlers::list_documents).post(handlers::upload_document),
        )
        .route(
            "/documents/{id}",
            get(handlers::get_document)
                .put(handlers::update_document)
                .delete(handlers::delete_document),
        )
        .route(
            "/documents/{id}/download",
            post(handlers::download_document),
        )
        .route(
            "/documents/{id}/signed-url",
            get(handlers::document_signed_url),
        )
        .route("/storage/{*key}", get(handlers::signed_object))
        // Tasks
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        // Appointments
        .route(
            "/appointments",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route(
            "/appointments/{id}",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .delete(handlers::delete_appointment),
        )
        // Dashboard and reports
        .route("/dashboard", get(handlers::dashboard))
        .route("/reports", get(handlers::reports))
        // Assistant
        .route(
            "/assistant/messages",
            get(handlers::assistant_history)
                .post(handlers::assistant_send)
                .delete(handlers::assistant_clear),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_file_size + MULTIPART_OVERHEAD))
        .layer(Extension(service))
        .layer(Extension(auth))
        .layer(Extension(assistant))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_bearer_scheme_and_paths() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().unwrap();
        assert!(components.security_schemes.contains_key("bearer"));
        assert!(doc.paths.paths.contains_key("/documents/{id}/download"));
        assert!(doc.paths.paths.contains_key("/assistant/messages"));
    }
}
