//! The resolved principal performing an operation.
//!
//! Identity, sessions and credential checks belong to an external
//! collaborator; the core only ever sees the already-resolved [`Viewer`]
//! passed explicitly into each operation. No ambient principal is threaded
//! through the domain.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role name granting the right to claim any request not already held.
pub const ADMIN_ROLE: &str = "Admin";

/// Opaque identifier owned by the identity collaborator.
///
/// The core never inspects the format; it only compares for equality.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a raw principal identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated actor as consumed by the core: stable id, display
/// name, optional team affiliation and the set of role names granted by
/// the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// Stable principal identifier.
    pub id: UserId,
    /// Name shown in UIs; never used for authorization decisions.
    pub display_name: String,
    /// Team the viewer belongs to, if any.
    pub team_id: Option<i32>,
    /// Role names granted to the viewer.
    pub roles: BTreeSet<String>,
}

impl Viewer {
    /// Construct a viewer with no team and no roles.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            display_name: display_name.into(),
            team_id: None,
            roles: BTreeSet::new(),
        }
    }

    /// Set the viewer's team affiliation.
    #[must_use]
    pub fn with_team(mut self, team_id: i32) -> Self {
        self.team_id = Some(team_id);
        self
    }

    /// Grant an additional role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Whether the viewer holds the [`ADMIN_ROLE`] role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(ADMIN_ROLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn admin_check_is_exact_on_role_name() {
        let admin = Viewer::new("u1", "Ada").with_role(ADMIN_ROLE);
        let lowercase = Viewer::new("u2", "Bo").with_role("admin");

        assert!(admin.is_admin());
        assert!(!lowercase.is_admin());
        assert!(!Viewer::new("u3", "Cy").is_admin());
    }

    #[rstest]
    fn builder_sets_team_and_roles() {
        let viewer = Viewer::new("u1", "Ada").with_team(5).with_role("Support");

        assert_eq!(viewer.team_id, Some(5));
        assert!(viewer.roles.contains("Support"));
        assert_eq!(viewer.id.as_str(), "u1");
    }
}
