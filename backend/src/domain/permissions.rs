//! Assignment authorization: who may claim or edit a request.
//!
//! The two flags are computed fresh on every details fetch for the viewer
//! at hand and are never persisted. Authorization compares stable ids,
//! never display names.

use serde::Serialize;
use utoipa::ToSchema;

use super::request::Request;
use super::viewer::Viewer;

/// Per-viewer action flags for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestPermissions {
    /// May the viewer claim the request for themselves now.
    pub allow_assign: bool,
    /// May the viewer edit the request's fields.
    pub allow_edit: bool,
}

impl RequestPermissions {
    /// Both actions denied; the anonymous-viewer default.
    pub const DENY_ALL: Self = Self {
        allow_assign: false,
        allow_edit: false,
    };

    /// Compute the flags for `viewer` against the request's current
    /// assignment state.
    ///
    /// Editing is reserved for the current assignee. Claiming is open to
    /// anyone when the request sits in no team queue, to members of the
    /// assigned team, and to admins; the current assignee never re-claims.
    /// An unresolvable viewer gets [`Self::DENY_ALL`].
    #[must_use]
    pub fn evaluate(request: &Request, viewer: Option<&Viewer>) -> Self {
        let Some(viewer) = viewer else {
            return Self::DENY_ALL;
        };

        let already_assigned = request.assigned_user_id.as_ref() == Some(&viewer.id);
        let unrouted = request.assigned_team_id.is_none();
        let member_of_assigned_team = request
            .assigned_team_id
            .is_some_and(|team| viewer.team_id == Some(team));

        Self {
            allow_assign: !already_assigned
                && (member_of_assigned_team || unrouted || viewer.is_admin()),
            allow_edit: already_assigned,
        }
    }
}
