//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated specification covering the request
//! endpoints and health probes. Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::api::error::ApiError;
use crate::api::requests::{
    AddResponseDto, CreateRequestDto, CreatedDto, EditRequestDto, RequestDetailsDto,
    RequestListItemDto, RequestsPageDto, ResponseDto, UploadDto,
};
use crate::domain::attachment::AttachmentInfo;
use crate::domain::{ErrorCode, RequestPriority, RequestSearchFilters, RequestStatus, UserId};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Request desk API",
        description = "HTTP interface for submitting, routing and working support requests.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::api::requests::list_requests,
        crate::api::requests::get_request,
        crate::api::requests::create_request,
        crate::api::requests::assign_request,
        crate::api::requests::edit_request,
        crate::api::requests::add_response,
        crate::api::requests::get_attachment,
        crate::api::health::ready,
        crate::api::health::live,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        UserId,
        RequestStatus,
        RequestPriority,
        RequestSearchFilters,
        AttachmentInfo,
        RequestListItemDto,
        RequestsPageDto,
        ResponseDto,
        RequestDetailsDto,
        UploadDto,
        CreateRequestDto,
        EditRequestDto,
        AddResponseDto,
        CreatedDto,
    )),
    tags(
        (name = "requests", description = "Request lifecycle and search"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;
