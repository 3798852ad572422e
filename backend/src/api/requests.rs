//! Request API handlers and their DTOs.
//!
//! Entities are mapped to DTOs by hand at this seam; the wire contract is
//! what these structs say, not whatever the domain happens to look like.

use actix_web::{get, post, put, web, HttpRequest, HttpResponse};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::attachment::AttachmentInfo;
use crate::domain::{
    CreateRequestInput, EditRequestInput, Error, Request, RequestDetails, RequestPriority,
    RequestResponse, RequestSearchFilters, RequestStatus, RequestsPage, UploadedFile, UserId,
};

use super::error::{ApiError, ApiResult};
use super::identity::{require_viewer, resolve_viewer};
use super::AppState;

/// Query parameters accepted by the request list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct RequestsListQuery {
    /// 1-based page index; defaults to the first page.
    page: Option<i64>,
    /// Exact request id.
    request_id: Option<i32>,
    /// Substring of the title, case-insensitive.
    title: Option<String>,
    /// Substring of the description, case-insensitive.
    description: Option<String>,
    /// Exact lifecycle state.
    status: Option<RequestStatus>,
    /// Exact priority.
    priority: Option<RequestPriority>,
    /// Exact owning category.
    category_id: Option<i32>,
    /// Exact assigned team.
    assigned_team_id: Option<i32>,
    /// Exact assigned user.
    assigned_user_id: Option<String>,
    /// Exact author.
    author_id: Option<String>,
    /// Created on or before this instant (RFC 3339).
    created_before: Option<DateTime<Utc>>,
    /// Created on or after this instant (RFC 3339).
    created_after: Option<DateTime<Utc>>,
    /// Updated on or before this instant (RFC 3339).
    updated_before: Option<DateTime<Utc>>,
    /// Updated on or after this instant (RFC 3339).
    updated_after: Option<DateTime<Utc>>,
}

impl RequestsListQuery {
    fn into_parts(self) -> (RequestSearchFilters, i64) {
        let page = self.page.unwrap_or(1);
        let filters = RequestSearchFilters {
            request_id: self.request_id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            category_id: self.category_id,
            assigned_team_id: self.assigned_team_id,
            assigned_user_id: self.assigned_user_id.map(UserId::new),
            author_id: self.author_id.map(UserId::new),
            created_before: self.created_before,
            created_after: self.created_after,
            updated_before: self.updated_before,
            updated_after: self.updated_after,
        };
        (filters, page)
    }
}

/// One row of the request list.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestListItemDto {
    id: i32,
    title: String,
    status: RequestStatus,
    priority: RequestPriority,
    category_id: i32,
    author_id: UserId,
    assigned_user_id: Option<UserId>,
    assigned_team_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<Request> for RequestListItemDto {
    fn from(request: Request) -> Self {
        Self {
            id: request.id,
            title: request.title,
            status: request.status,
            priority: request.priority,
            category_id: request.category_id,
            author_id: request.author_id,
            assigned_user_id: request.assigned_user_id,
            assigned_team_id: request.assigned_team_id,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// One page of the request list plus the echoed filters.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestsPageDto {
    items: Vec<RequestListItemDto>,
    page_index: i64,
    total_items: usize,
    total_pages: usize,
    has_previous_page: bool,
    has_next_page: bool,
    filters: RequestSearchFilters,
}

impl From<RequestsPage> for RequestsPageDto {
    fn from(page: RequestsPage) -> Self {
        let requests = page.requests;
        let page_index = requests.page_index();
        let total_items = requests.total_items();
        let total_pages = requests.total_pages();
        let has_previous_page = requests.has_previous_page();
        let has_next_page = requests.has_next_page();
        Self {
            items: requests.map(RequestListItemDto::from).into_items(),
            page_index,
            total_items,
            total_pages,
            has_previous_page,
            has_next_page,
            filters: page.filters,
        }
    }
}

/// A response (comment) on a request.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDto {
    id: i32,
    author_id: UserId,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<RequestResponse> for ResponseDto {
    fn from(response: RequestResponse) -> Self {
        Self {
            id: response.id,
            author_id: response.author_id,
            text: response.text,
            created_at: response.created_at,
        }
    }
}

/// Detail view of a request, including the viewer's action flags.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetailsDto {
    id: i32,
    title: String,
    description: String,
    status: RequestStatus,
    priority: RequestPriority,
    category_id: i32,
    author_id: UserId,
    assigned_user_id: Option<UserId>,
    assigned_team_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    responses: Vec<ResponseDto>,
    attachments: Vec<AttachmentInfo>,
    allow_assign: bool,
    allow_edit: bool,
}

impl From<RequestDetails> for RequestDetailsDto {
    fn from(details: RequestDetails) -> Self {
        let request = details.request;
        Self {
            id: request.id,
            title: request.title,
            description: request.description,
            status: request.status,
            priority: request.priority,
            category_id: request.category_id,
            author_id: request.author_id,
            assigned_user_id: request.assigned_user_id,
            assigned_team_id: request.assigned_team_id,
            created_at: request.created_at,
            updated_at: request.updated_at,
            responses: details.responses.into_iter().map(ResponseDto::from).collect(),
            attachments: details.attachments,
            allow_assign: details.permissions.allow_assign,
            allow_edit: details.permissions.allow_edit,
        }
    }
}

/// An uploaded file, base64-encoded for JSON transport.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadDto {
    /// File name as chosen by the client.
    file_name: String,
    /// Declared content type.
    content_type: String,
    /// Base64-encoded file contents.
    data: String,
}

/// Body of the create endpoint.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestDto {
    /// Short summary; required.
    title: String,
    /// Full problem description; required.
    description: String,
    /// Urgency of the request.
    priority: RequestPriority,
    /// Owning category.
    category_id: i32,
    /// Files to attach, if any.
    #[serde(default)]
    files: Vec<UploadDto>,
}

/// Body of the edit endpoint; replaces the request's mutable fields.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditRequestDto {
    /// New priority.
    priority: RequestPriority,
    /// New owning category.
    category_id: i32,
    /// New lifecycle state.
    status: RequestStatus,
    /// New assignee, or absent to unassign.
    assigned_user_id: Option<String>,
    /// New team queue, or absent to unroute.
    assigned_team_id: Option<i32>,
}

/// Body of the add-response endpoint.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddResponseDto {
    /// Comment body; required.
    text: String,
}

/// Identifier of a freshly created request.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedDto {
    /// The new request's id.
    id: i32,
}

fn decode_upload(dto: UploadDto) -> Result<UploadedFile, ApiError> {
    let bytes = BASE64.decode(dto.data.as_bytes()).map_err(|err| {
        ApiError::from(
            Error::invalid_request(format!("file {} is not valid base64: {err}", dto.file_name)),
        )
    })?;
    Ok(UploadedFile {
        file_name: dto.file_name,
        content_type: dto.content_type,
        bytes,
    })
}

/// List requests, newest first, filtered and paginated.
#[utoipa::path(
    get,
    path = "/requests",
    context_path = "/api/v1",
    params(RequestsListQuery),
    responses(
        (status = 200, description = "One page of requests", body = RequestsPageDto),
        (status = 503, description = "Request store unavailable", body = ApiError)
    ),
    tags = ["requests"],
    operation_id = "listRequests"
)]
#[get("/requests")]
pub async fn list_requests(
    state: web::Data<AppState>,
    query: web::Query<RequestsListQuery>,
) -> ApiResult<web::Json<RequestsPageDto>> {
    let (filters, page_index) = query.into_inner().into_parts();
    let page = state.requests.list(filters, page_index).await?;
    Ok(web::Json(RequestsPageDto::from(page)))
}

/// Fetch one request with responses, attachments and the caller's
/// action flags.
#[utoipa::path(
    get,
    path = "/requests/{id}",
    context_path = "/api/v1",
    params(("id" = i32, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request detail", body = RequestDetailsDto),
        (status = 404, description = "Request not found", body = ApiError)
    ),
    tags = ["requests"],
    operation_id = "getRequest"
)]
#[get("/requests/{id}")]
pub async fn get_request(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> ApiResult<web::Json<RequestDetailsDto>> {
    let viewer = resolve_viewer(&req, state.viewers.as_ref()).await?;
    let details = state
        .requests
        .details(path.into_inner(), viewer.as_ref())
        .await?;
    Ok(web::Json(RequestDetailsDto::from(details)))
}

/// Submit a new request with optional attachments.
#[utoipa::path(
    post,
    path = "/requests",
    context_path = "/api/v1",
    request_body = CreateRequestDto,
    responses(
        (status = 201, description = "Request created", body = CreatedDto),
        (status = 400, description = "Validation failure", body = ApiError),
        (status = 401, description = "No viewer resolved", body = ApiError),
        (status = 422, description = "Attachment policy violation", body = ApiError)
    ),
    tags = ["requests"],
    operation_id = "createRequest"
)]
#[post("/requests")]
pub async fn create_request(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateRequestDto>,
) -> ApiResult<HttpResponse> {
    let viewer = require_viewer(&req, state.viewers.as_ref()).await?;
    let dto = body.into_inner();

    let files = dto
        .files
        .into_iter()
        .map(decode_upload)
        .collect::<Result<Vec<_>, _>>()?;

    let id = state
        .requests
        .create(
            CreateRequestInput {
                title: dto.title,
                description: dto.description,
                priority: dto.priority,
                category_id: dto.category_id,
                files,
            },
            &viewer,
        )
        .await?;
    Ok(HttpResponse::Created().json(CreatedDto { id }))
}

/// Claim the request for the calling viewer.
#[utoipa::path(
    post,
    path = "/requests/{id}/assign",
    context_path = "/api/v1",
    params(("id" = i32, Path, description = "Request id")),
    responses(
        (status = 204, description = "Request assigned"),
        (status = 401, description = "No viewer resolved", body = ApiError),
        (status = 404, description = "Request not found", body = ApiError),
        (status = 409, description = "Concurrent modification", body = ApiError)
    ),
    tags = ["requests"],
    operation_id = "assignRequest"
)]
#[post("/requests/{id}/assign")]
pub async fn assign_request(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let viewer = require_viewer(&req, state.viewers.as_ref()).await?;
    state.requests.assign(path.into_inner(), &viewer).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Replace the request's mutable fields.
#[utoipa::path(
    put,
    path = "/requests/{id}",
    context_path = "/api/v1",
    params(("id" = i32, Path, description = "Request id")),
    request_body = EditRequestDto,
    responses(
        (status = 204, description = "Request updated"),
        (status = 401, description = "No viewer resolved", body = ApiError),
        (status = 404, description = "Request not found", body = ApiError),
        (status = 409, description = "Concurrent modification", body = ApiError)
    ),
    tags = ["requests"],
    operation_id = "editRequest"
)]
#[put("/requests/{id}")]
pub async fn edit_request(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: web::Json<EditRequestDto>,
) -> ApiResult<HttpResponse> {
    require_viewer(&req, state.viewers.as_ref()).await?;
    let dto = body.into_inner();
    state
        .requests
        .edit(EditRequestInput {
            id: path.into_inner(),
            priority: dto.priority,
            category_id: dto.category_id,
            status: dto.status,
            assigned_user_id: dto.assigned_user_id.map(UserId::new),
            assigned_team_id: dto.assigned_team_id,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Append a response to the request.
#[utoipa::path(
    post,
    path = "/requests/{id}/responses",
    context_path = "/api/v1",
    params(("id" = i32, Path, description = "Request id")),
    request_body = AddResponseDto,
    responses(
        (status = 204, description = "Response recorded"),
        (status = 400, description = "Blank response text", body = ApiError),
        (status = 401, description = "No viewer resolved", body = ApiError),
        (status = 404, description = "Request not found", body = ApiError)
    ),
    tags = ["requests"],
    operation_id = "addResponse"
)]
#[post("/requests/{id}/responses")]
pub async fn add_response(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: web::Json<AddResponseDto>,
) -> ApiResult<HttpResponse> {
    let viewer = require_viewer(&req, state.viewers.as_ref()).await?;
    state
        .requests
        .add_response(path.into_inner(), &body.text, &viewer)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Download a stored attachment.
#[utoipa::path(
    get,
    path = "/attachments/{id}",
    context_path = "/api/v1",
    params(("id" = i32, Path, description = "Attachment id")),
    responses(
        (status = 200, description = "Attachment bytes, served with the stored content type"),
        (status = 404, description = "Attachment not found", body = ApiError)
    ),
    tags = ["requests"],
    operation_id = "getAttachment"
)]
#[get("/attachments/{id}")]
pub async fn get_attachment(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let attachment = state.requests.attachment(path.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .content_type(attachment.content_type.clone())
        .insert_header((
            actix_web::http::header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", attachment.file_name),
        ))
        .body(attachment.payload))
}
