//! Request lifecycle orchestration.
//!
//! The service composes the filter compiler, the assignment authorization
//! rules and the attachment validator on top of the [`RequestRepository`]
//! port. View types returned here are transport agnostic; the HTTP adapter
//! maps them to DTOs explicitly.
//!
//! [`RequestRepository`]: crate::domain::ports::RequestRepository

pub mod service;


use pagination::PaginatedList;

use super::attachment::{AttachmentInfo, UploadedFile};
use super::filters::RequestSearchFilters;
use super::permissions::RequestPermissions;
use super::request::{Request, RequestPriority, RequestResponse, RequestStatus};
use super::viewer::UserId;

pub use service::RequestService;

/// One page of the request list plus the echoed filter criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestsPage {
    /// The windowed, filtered requests.
    pub requests: PaginatedList<Request>,
    /// The criteria the page was produced with, echoed for the caller.
    pub filters: RequestSearchFilters,
}

/// Detail view of one request for a specific viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDetails {
    /// The request itself.
    pub request: Request,
    /// Responses ordered by creation time ascending.
    pub responses: Vec<RequestResponse>,
    /// Attachment metadata; payloads are fetched individually.
    pub attachments: Vec<AttachmentInfo>,
    /// Action flags computed fresh for the viewer.
    pub permissions: RequestPermissions,
}

/// Input for submitting a new request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequestInput {
    /// Short summary; required.
    pub title: String,
    /// Full problem description; required.
    pub description: String,
    /// Urgency chosen by the submitter.
    pub priority: RequestPriority,
    /// Owning category.
    pub category_id: i32,
    /// Uploaded files, validated before persistence.
    pub files: Vec<UploadedFile>,
}

/// Input for overwriting a request's mutable fields.
///
/// Title, description, author and creation time are not editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequestInput {
    /// Target request.
    pub id: i32,
    /// New priority.
    pub priority: RequestPriority,
    /// New owning category.
    pub category_id: i32,
    /// New lifecycle state.
    pub status: RequestStatus,
    /// New assignee, or `None` to unassign.
    pub assigned_user_id: Option<UserId>,
    /// New team queue, or `None` to unroute.
    pub assigned_team_id: Option<i32>,
}
