//! Request and response entities.
//!
//! A request is the central trackable entity: submitted by an author,
//! routed to a category, optionally assigned to a user and that user's
//! team, and progressed through a status lifecycle. Entities are flat
//! records holding foreign-key ids; the core never walks a pointer graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::viewer::UserId;

/// Maximum accepted title length, in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum accepted description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Lifecycle state of a request.
///
/// Assignment does not imply a transition; status only changes through an
/// explicit edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted and awaiting work.
    #[default]
    Open,
    /// Someone is actively working the request.
    InProgress,
    /// Work finished, awaiting confirmation.
    Resolved,
    /// Terminal state.
    Closed,
}

/// Urgency assigned by the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestPriority {
    /// Can wait.
    Low,
    /// Default urgency.
    Medium,
    /// Needs prompt attention.
    High,
    /// Drop everything.
    Critical,
}

/// A tracked request.
///
/// ## Invariants
/// - `author_id` is set at creation and never changes.
/// - `created_at` is set once; `updated_at` is stamped by assign/edit.
/// - `version` is the optimistic-concurrency token maintained by the
///   persistence collaborator; callers treat it as opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Storage-assigned identifier.
    pub id: i32,
    /// Short summary, at most [`MAX_TITLE_LEN`] characters.
    pub title: String,
    /// Full problem description, at most [`MAX_DESCRIPTION_LEN`] characters.
    pub description: String,
    /// Current lifecycle state.
    pub status: RequestStatus,
    /// Urgency of the request.
    pub priority: RequestPriority,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Stamped by mutating assign/edit operations.
    pub updated_at: Option<DateTime<Utc>>,
    /// Owning category.
    pub category_id: i32,
    /// Submitter; immutable after creation.
    pub author_id: UserId,
    /// User currently responsible, if any.
    pub assigned_user_id: Option<UserId>,
    /// Team queue the request sits in, if any.
    pub assigned_team_id: Option<i32>,
    /// Optimistic-concurrency token.
    pub version: u32,
}

/// An append-only comment on a request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestResponse {
    /// Storage-assigned identifier.
    pub id: i32,
    /// Parent request.
    pub request_id: i32,
    /// Comment author.
    pub author_id: UserId,
    /// Comment body.
    pub text: String,
    /// Set once at creation; responses are never edited.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn status_defaults_to_open() {
        assert_eq!(RequestStatus::default(), RequestStatus::Open);
    }

    #[rstest]
    fn enums_use_snake_case_codes() {
        let status = serde_json::to_string(&RequestStatus::InProgress).expect("status serializes");
        assert_eq!(status, "\"in_progress\"");

        let priority =
            serde_json::to_string(&RequestPriority::Critical).expect("priority serializes");
        assert_eq!(priority, "\"critical\"");

        let parsed: RequestStatus =
            serde_json::from_str("\"open\"").expect("status parses back");
        assert_eq!(parsed, RequestStatus::Open);
    }
}
