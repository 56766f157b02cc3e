//! HTTP request handlers - thin layer that delegates to the domain services

use super::{auth::AuthUser, dto::*, error::Problem};
use crate::contract::{
    AppointmentData, CaseData, ClientData, DocumentMetadata, NewDocument, TaskData,
};
use crate::domain::{Assistant, AuthService, Service};
use axum::{
    extract::{Multipart, Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use bytes::Bytes;
use chrono::{Local, Utc};
use std::sync::Arc;
use uuid::Uuid;

type ApiResult<T> = Result<T, Problem>;

fn list<T, D: From<T>>(items: Vec<T>) -> Json<Vec<D>> {
    Json(items.into_iter().map(D::from).collect())
}

/// `Content-Disposition` value with a header-safe file name
fn attachment(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

fn file_response(bytes: Vec<u8>, mime_type: Option<&str>, file_name: Option<&str>) -> Response {
    let content_type = mime_type
        .and_then(|m| m.parse::<mime::Mime>().ok())
        .unwrap_or(mime::APPLICATION_OCTET_STREAM);
    match file_name {
        Some(name) => (
            [
                (header::CONTENT_TYPE, content_type.to_string()),
                (header::CONTENT_DISPOSITION, attachment(name)),
            ],
            bytes,
        )
            .into_response(),
        None => ([(header::CONTENT_TYPE, content_type.to_string())], bytes).into_response(),
    }
}

// ===== Health =====

#[utoipa::path(get, path = "/health", tag = "system", responses((status = 200, body = HealthDto)))]
pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

// ===== Auth =====

#[utoipa::path(
    post, path = "/auth/sign-up", tag = "auth",
    request_body = SignUpRequest,
    responses(
        (status = 201, body = ProfileDto),
        (status = 400, body = Problem),
        (status = 409, body = Problem)
    )
)]
pub async fn sign_up(
    Extension(auth): Extension<Arc<AuthService>>,
    Json(req): Json<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<ProfileDto>)> {
    let profile = auth
        .sign_up(&req.email, &req.password, &req.full_name)
        .await?;
    Ok((StatusCode::CREATED, Json(profile.into())))
}

#[utoipa::path(
    post, path = "/auth/sign-in", tag = "auth",
    request_body = SignInRequest,
    responses((status = 200, body = SessionDto), (status = 401, body = Problem))
)]
pub async fn sign_in(
    Extension(auth): Extension<Arc<AuthService>>,
    Json(req): Json<SignInRequest>,
) -> ApiResult<Json<SessionDto>> {
    let session = auth.sign_in(&req.email, &req.password).await?;
    Ok(Json(session.into()))
}

#[utoipa::path(
    get, path = "/auth/session", tag = "auth",
    responses((status = 200, body = SessionUserDto), (status = 401, body = Problem)),
    security(("bearer" = []))
)]
pub async fn session(AuthUser(ctx): AuthUser) -> Json<SessionUserDto> {
    Json(SessionUserDto {
        id: ctx.user_id,
        email: ctx.email,
    })
}

// ===== Profile =====

#[utoipa::path(
    get, path = "/profile", tag = "profile",
    responses((status = 200, body = ProfileDto), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn get_profile(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
) -> ApiResult<Json<ProfileDto>> {
    Ok(Json(service.get_profile(&ctx).await?.into()))
}

#[utoipa::path(
    put, path = "/profile", tag = "profile",
    request_body = UpdateProfileRequest,
    responses((status = 200, body = ProfileDto), (status = 400, body = Problem)),
    security(("bearer" = []))
)]
pub async fn update_profile(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileDto>> {
    Ok(Json(service.update_profile(&ctx, req.into()).await?.into()))
}

// ===== Clients =====

#[utoipa::path(
    get, path = "/clients", tag = "clients",
    responses((status = 200, body = Vec<ClientDto>)),
    security(("bearer" = []))
)]
pub async fn list_clients(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
) -> ApiResult<Json<Vec<ClientDto>>> {
    Ok(list(service.list_clients(&ctx).await?))
}

#[utoipa::path(
    get, path = "/clients/search", tag = "clients",
    params(SearchQuery),
    responses((status = 200, body = Vec<ClientDto>)),
    security(("bearer" = []))
)]
pub async fn search_clients(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<ClientDto>>> {
    let term = query.q.unwrap_or_default();
    Ok(list(service.search_clients(&ctx, &term).await?))
}

#[utoipa::path(
    post, path = "/clients", tag = "clients",
    request_body = ClientRequest,
    responses((status = 201, body = ClientDto), (status = 400, body = Problem)),
    security(("bearer" = []))
)]
pub async fn create_client(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Json(req): Json<ClientRequest>,
) -> ApiResult<(StatusCode, Json<ClientDto>)> {
    let client = service
        .create_client(&ctx, ClientData::try_from(req)?)
        .await?;
    Ok((StatusCode::CREATED, Json(client.into())))
}

#[utoipa::path(
    get, path = "/clients/{id}", tag = "clients",
    params(("id" = Uuid, Path, description = "Client id")),
    responses((status = 200, body = ClientDto), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn get_client(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ClientDto>> {
    Ok(Json(service.get_client(&ctx, id).await?.into()))
}

#[utoipa::path(
    put, path = "/clients/{id}", tag = "clients",
    params(("id" = Uuid, Path, description = "Client id")),
    request_body = ClientRequest,
    responses((status = 200, body = ClientDto), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn update_client(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ClientRequest>,
) -> ApiResult<Json<ClientDto>> {
    let client = service
        .update_client(&ctx, id, ClientData::try_from(req)?)
        .await?;
    Ok(Json(client.into()))
}

#[utoipa::path(
    delete, path = "/clients/{id}", tag = "clients",
    params(("id" = Uuid, Path, description = "Client id")),
    responses((status = 204), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn delete_client(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    service.delete_client(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/clients/{id}/cases", tag = "clients",
    params(("id" = Uuid, Path, description = "Client id")),
    responses((status = 200, body = Vec<CaseDto>), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn client_cases(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<CaseDto>>> {
    Ok(list(service.list_cases_for_client(&ctx, id).await?))
}

// ===== Cases =====

#[utoipa::path(
    get, path = "/cases", tag = "cases",
    responses((status = 200, body = Vec<CaseDto>)),
    security(("bearer" = []))
)]
pub async fn list_cases(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
) -> ApiResult<Json<Vec<CaseDto>>> {
    Ok(list(service.list_cases(&ctx).await?))
}

#[utoipa::path(
    post, path = "/cases", tag = "cases",
    request_body = CaseRequest,
    responses((status = 201, body = CaseDto), (status = 400, body = Problem), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn create_case(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Json(req): Json<CaseRequest>,
) -> ApiResult<(StatusCode, Json<CaseDto>)> {
    let case = service.create_case(&ctx, CaseData::try_from(req)?).await?;
    Ok((StatusCode::CREATED, Json(case.into())))
}

#[utoipa::path(
    get, path = "/cases/{id}", tag = "cases",
    params(("id" = Uuid, Path, description = "Case id")),
    responses((status = 200, body = CaseDto), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn get_case(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CaseDto>> {
    Ok(Json(service.get_case(&ctx, id).await?.into()))
}

#[utoipa::path(
    put, path = "/cases/{id}", tag = "cases",
    params(("id" = Uuid, Path, description = "Case id")),
    request_body = CaseRequest,
    responses((status = 200, body = CaseDto), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn update_case(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CaseRequest>,
) -> ApiResult<Json<CaseDto>> {
    let case = service
        .update_case(&ctx, id, CaseData::try_from(req)?)
        .await?;
    Ok(Json(case.into()))
}

#[utoipa::path(
    delete, path = "/cases/{id}", tag = "cases",
    params(("id" = Uuid, Path, description = "Case id")),
    responses((status = 204), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn delete_case(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    service.delete_case(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Documents =====

#[utoipa::path(
    get, path = "/documents", tag = "documents",
    params(SearchQuery),
    responses((status = 200, body = Vec<DocumentDto>)),
    security(("bearer" = []))
)]
pub async fn list_documents(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<DocumentDto>>> {
    let documents = match query.q {
        Some(term) => service.search_documents(&ctx, &term).await?,
        None => service.list_documents(&ctx).await?,
    };
    Ok(list(documents))
}

#[utoipa::path(
    post, path = "/documents", tag = "documents",
    request_body(content = UploadDocumentForm, content_type = "multipart/form-data"),
    responses((status = 201, body = DocumentDto), (status = 400, body = Problem)),
    security(("bearer" = []))
)]
pub async fn upload_document(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<DocumentDto>)> {
    let mut metadata: Option<DocumentMetadataRequest> = None;
    let mut file: Option<(String, Option<String>, Bytes)> = None;
    let mut password: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Problem::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "metadata" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Problem::bad_request(e.body_text()))?;
                metadata = Some(serde_json::from_str(&text).map_err(|e| {
                    Problem::bad_request(format!("invalid metadata: {e}"))
                })?);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("file").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Problem::bad_request(e.body_text()))?;
                file = Some((file_name, content_type, bytes));
            }
            "password" => {
                password = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| Problem::bad_request(e.body_text()))?,
                );
            }
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let metadata = metadata.ok_or_else(|| Problem::bad_request("missing 'metadata' part"))?;
    let (file_name, mime_type, bytes) =
        file.ok_or_else(|| Problem::bad_request("missing 'file' part"))?;

    let new = NewDocument {
        meta: DocumentMetadata::try_from(metadata)?,
        file_name,
        mime_type,
    };
    let document = service
        .upload_document(&ctx, new, bytes.to_vec(), password)
        .await?;
    Ok((StatusCode::CREATED, Json(document.into())))
}

#[utoipa::path(
    get, path = "/documents/{id}", tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses((status = 200, body = DocumentDto), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn get_document(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DocumentDto>> {
    Ok(Json(service.get_document(&ctx, id).await?.into()))
}

#[utoipa::path(
    put, path = "/documents/{id}", tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    request_body = DocumentMetadataRequest,
    responses((status = 200, body = DocumentDto), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn update_document(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<DocumentMetadataRequest>,
) -> ApiResult<Json<DocumentDto>> {
    let document = service
        .update_document(&ctx, id, DocumentMetadata::try_from(req)?)
        .await?;
    Ok(Json(document.into()))
}

#[utoipa::path(
    delete, path = "/documents/{id}", tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses((status = 204), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn delete_document(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    service.delete_document(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post, path = "/documents/{id}/download", tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 404, body = Problem),
        (status = 422, body = Problem)
    ),
    security(("bearer" = []))
)]
pub async fn download_document(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
    body: Option<Json<DownloadRequest>>,
) -> ApiResult<Response> {
    let password = body.and_then(|Json(req)| req.password);
    let (document, bytes) = service.download_document(&ctx, id, password).await?;
    Ok(file_response(
        bytes,
        document.data.mime_type.as_deref(),
        Some(&document.data.meta.name),
    ))
}

#[utoipa::path(
    get, path = "/documents/{id}/signed-url", tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses((status = 200, body = SignedUrlDto), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn document_signed_url(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SignedUrlDto>> {
    let signed = service.document_signed_url(&ctx, id, Utc::now()).await?;
    Ok(Json(SignedUrlDto {
        url: signed.url,
        expires_at: signed.expires_at,
    }))
}

#[utoipa::path(
    get, path = "/storage/{key}", tag = "documents",
    params(("key" = String, Path, description = "Object key"), SignedObjectQuery),
    responses(
        (status = 200, description = "Stored object", content_type = "application/octet-stream"),
        (status = 401, body = Problem)
    )
)]
pub async fn signed_object(
    Extension(service): Extension<Arc<Service>>,
    Path(key): Path<String>,
    Query(query): Query<SignedObjectQuery>,
) -> ApiResult<Response> {
    let bytes = service
        .open_signed_object(&key, query.expires, &query.signature, Utc::now())
        .await?;
    Ok(file_response(bytes, None, None))
}

// ===== Tasks =====

#[utoipa::path(
    get, path = "/tasks", tag = "tasks",
    responses((status = 200, body = Vec<TaskDto>)),
    security(("bearer" = []))
)]
pub async fn list_tasks(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
) -> ApiResult<Json<Vec<TaskDto>>> {
    Ok(list(service.list_tasks(&ctx).await?))
}

#[utoipa::path(
    post, path = "/tasks", tag = "tasks",
    request_body = TaskRequest,
    responses((status = 201, body = TaskDto), (status = 400, body = Problem)),
    security(("bearer" = []))
)]
pub async fn create_task(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Json(req): Json<TaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskDto>)> {
    let task = service.create_task(&ctx, TaskData::try_from(req)?).await?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

#[utoipa::path(
    get, path = "/tasks/{id}", tag = "tasks",
    params(("id" = Uuid, Path, description = "Task id")),
    responses((status = 200, body = TaskDto), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn get_task(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskDto>> {
    Ok(Json(service.get_task(&ctx, id).await?.into()))
}

#[utoipa::path(
    put, path = "/tasks/{id}", tag = "tasks",
    params(("id" = Uuid, Path, description = "Task id")),
    request_body = TaskRequest,
    responses((status = 200, body = TaskDto), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn update_task(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<Json<TaskDto>> {
    let task = service
        .update_task(&ctx, id, TaskData::try_from(req)?)
        .await?;
    Ok(Json(task.into()))
}

#[utoipa::path(
    delete, path = "/tasks/{id}", tag = "tasks",
    params(("id" = Uuid, Path, description = "Task id")),
    responses((status = 204), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn delete_task(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    service.delete_task(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Appointments =====

#[utoipa::path(
    get, path = "/appointments", tag = "appointments",
    responses((status = 200, body = Vec<AppointmentDto>)),
    security(("bearer" = []))
)]
pub async fn list_appointments(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
) -> ApiResult<Json<Vec<AppointmentDto>>> {
    Ok(list(service.list_appointments(&ctx).await?))
}

#[utoipa::path(
    post, path = "/appointments", tag = "appointments",
    request_body = AppointmentRequest,
    responses((status = 201, body = AppointmentDto), (status = 400, body = Problem)),
    security(("bearer" = []))
)]
pub async fn create_appointment(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Json(req): Json<AppointmentRequest>,
) -> ApiResult<(StatusCode, Json<AppointmentDto>)> {
    let appointment = service
        .create_appointment(&ctx, AppointmentData::try_from(req)?)
        .await?;
    Ok((StatusCode::CREATED, Json(appointment.into())))
}

#[utoipa::path(
    get, path = "/appointments/{id}", tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses((status = 200, body = AppointmentDto), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn get_appointment(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AppointmentDto>> {
    Ok(Json(service.get_appointment(&ctx, id).await?.into()))
}

#[utoipa::path(
    put, path = "/appointments/{id}", tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = AppointmentRequest,
    responses((status = 200, body = AppointmentDto), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn update_appointment(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AppointmentRequest>,
) -> ApiResult<Json<AppointmentDto>> {
    let appointment = service
        .update_appointment(&ctx, id, AppointmentData::try_from(req)?)
        .await?;
    Ok(Json(appointment.into()))
}

#[utoipa::path(
    delete, path = "/appointments/{id}", tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses((status = 204), (status = 404, body = Problem)),
    security(("bearer" = []))
)]
pub async fn delete_appointment(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    service.delete_appointment(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Dashboard / reports =====

#[utoipa::path(
    get, path = "/dashboard", tag = "reports",
    params(DashboardQuery),
    responses((status = 200, body = DashboardDto)),
    security(("bearer" = []))
)]
pub async fn dashboard(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardDto>> {
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    Ok(Json(service.dashboard(&ctx, today).await?.into()))
}

#[utoipa::path(
    get, path = "/reports", tag = "reports",
    responses((status = 200, body = ReportDto)),
    security(("bearer" = []))
)]
pub async fn reports(
    Extension(service): Extension<Arc<Service>>,
    AuthUser(ctx): AuthUser,
) -> ApiResult<Json<ReportDto>> {
    Ok(Json(service.report(&ctx).await?.into()))
}

// ===== Assistant =====

#[utoipa::path(
    get, path = "/assistant/messages", tag = "assistant",
    responses((status = 200, body = Vec<ChatMessageDto>)),
    security(("bearer" = []))
)]
pub async fn assistant_history(
    Extension(assistant): Extension<Arc<Assistant>>,
    AuthUser(ctx): AuthUser,
) -> Json<Vec<ChatMessageDto>> {
    list(assistant.history(&ctx))
}

#[utoipa::path(
    post, path = "/assistant/messages", tag = "assistant",
    request_body = AssistantMessageRequest,
    responses((status = 200, body = AssistantReplyDto), (status = 400, body = Problem)),
    security(("bearer" = []))
)]
pub async fn assistant_send(
    Extension(assistant): Extension<Arc<Assistant>>,
    AuthUser(ctx): AuthUser,
    Json(req): Json<AssistantMessageRequest>,
) -> ApiResult<Json<AssistantReplyDto>> {
    let today = Local::now().date_naive();
    let reply = assistant.handle(&ctx, &req.message, today).await?;
    Ok(Json(reply.into()))
}

#[utoipa::path(
    delete, path = "/assistant/messages", tag = "assistant",
    responses((status = 204)),
    security(("bearer" = []))
)]
pub async fn assistant_clear(
    Extension(assistant): Extension<Arc<Assistant>>,
    AuthUser(ctx): AuthUser,
) -> StatusCode {
    assistant.clear(&ctx);
    StatusCode::NO_CONTENT
}
