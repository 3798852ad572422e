//! The request lifecycle service.
//!
//! Orchestrates creation, assignment, editing and commenting, enforcing
//! the invariants the storage layer cannot: immutable authorship, status
//! initialization, update-timestamp maintenance and attachment policy.

use std::sync::Arc;

use chrono::Utc;
use pagination::PaginatedList;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::attachment::{process_uploads, Attachment, AttachmentError, AttachmentInfo};
use crate::domain::filters::RequestSearchFilters;
use crate::domain::permissions::RequestPermissions;
use crate::domain::ports::{
    NewRequest, NewRequestResponse, RequestRepository, RequestRepositoryError,
};
use crate::domain::request::{RequestStatus, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};
use crate::domain::viewer::Viewer;
use crate::domain::Error;

use super::{CreateRequestInput, EditRequestInput, RequestDetails, RequestsPage};

/// Lifecycle service over the [`RequestRepository`] port.
#[derive(Clone)]
pub struct RequestService {
    repo: Arc<dyn RequestRepository>,
}

impl RequestService {
    /// Create a new service over the given repository.
    pub fn new(repo: Arc<dyn RequestRepository>) -> Self {
        Self { repo }
    }

    fn map_repo_error(error: RequestRepositoryError) -> Error {
        match error {
            RequestRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("request store unavailable: {message}"))
            }
            RequestRepositoryError::Query { message } => {
                Error::internal(format!("request store error: {message}"))
            }
            RequestRepositoryError::NotFound { id } => {
                Error::not_found("request not found").with_details(json!({ "requestId": id }))
            }
            RequestRepositoryError::VersionConflict { id, .. } => {
                Error::conflict("request was edited by someone else, please retry")
                    .with_details(json!({ "requestId": id }))
            }
        }
    }

    /// List requests ordered by creation time descending, filtered and
    /// windowed to the requested page.
    pub async fn list(
        &self,
        filters: RequestSearchFilters,
        page_index: i64,
    ) -> Result<RequestsPage, Error> {
        debug!(page_index, "listing requests");

        let requests = self
            .repo
            .list(&filters)
            .await
            .map_err(Self::map_repo_error)?;
        let page = PaginatedList::create(requests, page_index);

        info!(
            page_index,
            page_len = page.items().len(),
            total = page.total_items(),
            "retrieved requests"
        );
        Ok(RequestsPage {
            requests: page,
            filters,
        })
    }

    /// Fetch one request with its responses, attachment metadata and the
    /// viewer's action flags. Anonymous viewers still get the detail data,
    /// permission-gated to deny-all.
    pub async fn details(
        &self,
        id: i32,
        viewer: Option<&Viewer>,
    ) -> Result<RequestDetails, Error> {
        let Some(request) = self
            .repo
            .find_by_id(id)
            .await
            .map_err(Self::map_repo_error)?
        else {
            warn!(request_id = id, "request not found");
            return Err(Self::map_repo_error(RequestRepositoryError::NotFound { id }));
        };

        let responses = self
            .repo
            .responses_for(id)
            .await
            .map_err(Self::map_repo_error)?;
        let attachments = self
            .repo
            .attachments_for(id)
            .await
            .map_err(Self::map_repo_error)?
            .iter()
            .map(AttachmentInfo::from)
            .collect();

        let permissions = RequestPermissions::evaluate(&request, viewer);
        debug!(
            request_id = id,
            allow_assign = permissions.allow_assign,
            allow_edit = permissions.allow_edit,
            "computed permissions"
        );

        Ok(RequestDetails {
            request,
            responses,
            attachments,
            permissions,
        })
    }

    /// Submit a new request on behalf of `author`; returns the new id.
    ///
    /// The whole creation aborts, persisting nothing, when any upload
    /// violates the attachment policy.
    pub async fn create(&self, input: CreateRequestInput, author: &Viewer) -> Result<i32, Error> {
        validate_create(&input)?;

        let attachments = process_uploads(input.files).map_err(|err| match err {
            AttachmentError::InvalidFileType { file_name } => {
                Error::invalid_file("invalid file type")
                    .with_details(json!({ "fileName": file_name }))
            }
        })?;

        let id = self
            .repo
            .insert(NewRequest {
                title: input.title,
                description: input.description,
                status: RequestStatus::Open,
                priority: input.priority,
                category_id: input.category_id,
                author_id: author.id.clone(),
                created_at: Utc::now(),
                attachments,
            })
            .await
            .map_err(Self::map_repo_error)?;

        info!(request_id = id, author = %author.id, "created request");
        Ok(id)
    }

    /// Claim the request for `viewer`: assignee becomes the viewer, the
    /// team queue becomes the viewer's team, and the update timestamp is
    /// stamped. Status is left untouched.
    pub async fn assign(&self, id: i32, viewer: &Viewer) -> Result<(), Error> {
        let Some(request) = self
            .repo
            .find_by_id(id)
            .await
            .map_err(Self::map_repo_error)?
        else {
            warn!(request_id = id, "request not found for assignment");
            return Err(Self::map_repo_error(RequestRepositoryError::NotFound { id }));
        };

        let read_version = request.version;
        let mut updated = request;
        updated.assigned_user_id = Some(viewer.id.clone());
        updated.assigned_team_id = viewer.team_id;
        updated.updated_at = Some(Utc::now());

        self.repo
            .update(&updated, read_version)
            .await
            .map_err(Self::map_repo_error)?;

        info!(
            request_id = id,
            assignee = %viewer.id,
            team_id = viewer.team_id,
            "assigned request"
        );
        Ok(())
    }

    /// Overwrite the request's mutable fields and stamp the update
    /// timestamp. Assignee and team are written independently here;
    /// their consistency is only guaranteed by [`Self::assign`].
    pub async fn edit(&self, input: EditRequestInput) -> Result<(), Error> {
        let Some(request) = self
            .repo
            .find_by_id(input.id)
            .await
            .map_err(Self::map_repo_error)?
        else {
            warn!(request_id = input.id, "request not found for edit");
            return Err(Self::map_repo_error(RequestRepositoryError::NotFound {
                id: input.id,
            }));
        };

        let read_version = request.version;
        let mut updated = request;
        updated.priority = input.priority;
        updated.category_id = input.category_id;
        updated.status = input.status;
        updated.assigned_user_id = input.assigned_user_id;
        updated.assigned_team_id = input.assigned_team_id;
        updated.updated_at = Some(Utc::now());

        self.repo
            .update(&updated, read_version)
            .await
            .map_err(Self::map_repo_error)?;

        info!(request_id = input.id, "updated request");
        Ok(())
    }

    /// Append a response to an existing request.
    pub async fn add_response(
        &self,
        request_id: i32,
        text: &str,
        author: &Viewer,
    ) -> Result<(), Error> {
        if text.trim().is_empty() {
            return Err(Error::invalid_request("response text is required")
                .with_details(json!({ "field": "text" })));
        }

        if self
            .repo
            .find_by_id(request_id)
            .await
            .map_err(Self::map_repo_error)?
            .is_none()
        {
            warn!(request_id, "request not found for response");
            return Err(Self::map_repo_error(RequestRepositoryError::NotFound {
                id: request_id,
            }));
        }

        let response_id = self
            .repo
            .insert_response(NewRequestResponse {
                request_id,
                author_id: author.id.clone(),
                text: text.to_owned(),
                created_at: Utc::now(),
            })
            .await
            .map_err(Self::map_repo_error)?;

        info!(request_id, response_id, author = %author.id, "added response");
        Ok(())
    }

    /// Fetch a stored attachment by id.
    pub async fn attachment(&self, id: i32) -> Result<Attachment, Error> {
        self.repo
            .find_attachment(id)
            .await
            .map_err(Self::map_repo_error)?
            .ok_or_else(|| {
                warn!(attachment_id = id, "attachment not found");
                Error::not_found("attachment not found")
                    .with_details(json!({ "attachmentId": id }))
            })
    }
}

fn validate_create(input: &CreateRequestInput) -> Result<(), Error> {
    if input.title.trim().is_empty() {
        return Err(Error::invalid_request("title is required")
            .with_details(json!({ "field": "title" })));
    }
    if input.title.chars().count() > MAX_TITLE_LEN {
        return Err(Error::invalid_request("title is too long")
            .with_details(json!({ "field": "title", "max": MAX_TITLE_LEN })));
    }
    if input.description.trim().is_empty() {
        return Err(Error::invalid_request("description is required")
            .with_details(json!({ "field": "description" })));
    }
    if input.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(Error::invalid_request("description is too long")
            .with_details(json!({ "field": "description", "max": MAX_DESCRIPTION_LEN })));
    }
    Ok(())
}
