//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the request store and the identity collaborator). Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants instead of returning `anyhow::Result`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::attachment::{Attachment, NewAttachment};
use super::filters::RequestSearchFilters;
use super::request::{Request, RequestPriority, RequestResponse, RequestStatus};
use super::viewer::{UserId, Viewer};

/// Errors surfaced by [`RequestRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestRepositoryError {
    /// Store connectivity or transaction failures.
    #[error("request store connection failed: {message}")]
    Connection {
        /// Adapter-provided failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("request store query failed: {message}")]
    Query {
        /// Adapter-provided failure description.
        message: String,
    },
    /// The referenced request does not exist.
    #[error("request {id} not found")]
    NotFound {
        /// Missing request id.
        id: i32,
    },
    /// The record changed since it was read; the write was refused.
    #[error("request {id} was modified concurrently (expected version {expected})")]
    VersionConflict {
        /// Contested request id.
        id: i32,
        /// Version the losing writer based its update on.
        expected: u32,
    },
}

impl RequestRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Errors surfaced by [`ViewerDirectory`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewerDirectoryError {
    /// The identity collaborator could not be queried.
    #[error("viewer directory lookup failed: {message}")]
    Lookup {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl ViewerDirectoryError {
    /// Helper for lookup failures.
    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }
}

/// A request awaiting its first persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRequest {
    /// Short summary.
    pub title: String,
    /// Full problem description.
    pub description: String,
    /// Initial lifecycle state; always `Open` for submissions.
    pub status: RequestStatus,
    /// Urgency chosen by the submitter.
    pub priority: RequestPriority,
    /// Owning category.
    pub category_id: i32,
    /// Immutable submitter id.
    pub author_id: UserId,
    /// Creation instant stamped by the service.
    pub created_at: DateTime<Utc>,
    /// Validated attachments created alongside the request.
    pub attachments: Vec<NewAttachment>,
}

/// A comment awaiting persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRequestResponse {
    /// Parent request.
    pub request_id: i32,
    /// Comment author.
    pub author_id: UserId,
    /// Comment body.
    pub text: String,
    /// Creation instant stamped by the service.
    pub created_at: DateTime<Utc>,
}

/// Persistence port for requests, their responses and attachments.
///
/// `update` implements optimistic concurrency: the write only succeeds if
/// the stored version still equals `expected_version`, and the surviving
/// record carries `expected_version + 1`. A losing writer receives
/// [`RequestRepositoryError::VersionConflict`] and must re-fetch before
/// retrying.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// All requests ordered by creation time descending, narrowed by
    /// `filters`.
    async fn list(
        &self,
        filters: &RequestSearchFilters,
    ) -> Result<Vec<Request>, RequestRepositoryError>;

    /// Fetch a request by id.
    async fn find_by_id(&self, id: i32) -> Result<Option<Request>, RequestRepositoryError>;

    /// Persist a new request with its attachments; returns the new id.
    async fn insert(&self, request: NewRequest) -> Result<i32, RequestRepositoryError>;

    /// Overwrite a request's mutable state, conditioned on its version.
    async fn update(
        &self,
        request: &Request,
        expected_version: u32,
    ) -> Result<(), RequestRepositoryError>;

    /// Append a response to its parent request; returns the new id.
    async fn insert_response(
        &self,
        response: NewRequestResponse,
    ) -> Result<i32, RequestRepositoryError>;

    /// Responses of one request, ordered by creation time ascending.
    async fn responses_for(
        &self,
        request_id: i32,
    ) -> Result<Vec<RequestResponse>, RequestRepositoryError>;

    /// Attachments of one request.
    async fn attachments_for(
        &self,
        request_id: i32,
    ) -> Result<Vec<Attachment>, RequestRepositoryError>;

    /// Fetch a single attachment by id.
    async fn find_attachment(
        &self,
        id: i32,
    ) -> Result<Option<Attachment>, RequestRepositoryError>;
}

/// Read-only port onto the external identity collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ViewerDirectory: Send + Sync {
    /// Resolve a principal id to a viewer, or `None` when unknown.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Viewer>, ViewerDirectoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn repository_errors_render_their_context() {
        let conflict = RequestRepositoryError::VersionConflict { id: 3, expected: 2 };
        assert_eq!(
            conflict.to_string(),
            "request 3 was modified concurrently (expected version 2)"
        );

        let missing = RequestRepositoryError::NotFound { id: 9 };
        assert_eq!(missing.to_string(), "request 9 not found");

        let query = RequestRepositoryError::query("row decode failed");
        assert!(query.to_string().contains("row decode failed"));
    }

    #[rstest]
    fn directory_errors_render_their_context() {
        let err = ViewerDirectoryError::lookup("identity provider timeout");
        assert!(err.to_string().contains("identity provider timeout"));
    }
}
