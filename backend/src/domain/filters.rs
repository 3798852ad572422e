//! Search filter criteria and their compilation into a request predicate.
//!
//! Every field is optional; absence means "no constraint". Specified fields
//! combine with logical AND. Filtering preserves the order of the incoming
//! collection; callers pre-sort by creation time descending.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::request::{Request, RequestPriority, RequestStatus};
use super::viewer::UserId;

/// Optional predicates narrowing a request list query.
///
/// Blank strings behave like absent filters, mirroring how form inputs
/// arrive from clients. Title and description match as case-insensitive
/// substrings; ids and enums match exactly; timestamp bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestSearchFilters {
    /// Exact request id.
    pub request_id: Option<i32>,
    /// Substring of the title, case-insensitive.
    pub title: Option<String>,
    /// Substring of the description, case-insensitive.
    pub description: Option<String>,
    /// Exact lifecycle state.
    pub status: Option<RequestStatus>,
    /// Exact priority.
    pub priority: Option<RequestPriority>,
    /// Exact owning category.
    pub category_id: Option<i32>,
    /// Exact assigned team.
    pub assigned_team_id: Option<i32>,
    /// Exact assigned user.
    pub assigned_user_id: Option<UserId>,
    /// Exact author.
    pub author_id: Option<UserId>,
    /// Created on or before this instant.
    pub created_before: Option<DateTime<Utc>>,
    /// Created on or after this instant.
    pub created_after: Option<DateTime<Utc>>,
    /// Last updated on or before this instant; never matches an
    /// untouched request.
    pub updated_before: Option<DateTime<Utc>>,
    /// Last updated on or after this instant; never matches an
    /// untouched request.
    pub updated_after: Option<DateTime<Utc>>,
}

impl RequestSearchFilters {
    /// Whether no constraint is specified at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `request` satisfies every specified predicate.
    #[must_use]
    pub fn matches(&self, request: &Request) -> bool {
        self.request_id.is_none_or(|id| request.id == id)
            && substring_matches(self.title.as_deref(), &request.title)
            && substring_matches(self.description.as_deref(), &request.description)
            && self.status.is_none_or(|status| request.status == status)
            && self
                .priority
                .is_none_or(|priority| request.priority == priority)
            && self.category_id.is_none_or(|id| request.category_id == id)
            && self
                .assigned_team_id
                .is_none_or(|id| request.assigned_team_id == Some(id))
            && id_matches(self.assigned_user_id.as_ref(), request.assigned_user_id.as_ref())
            && self
                .author_id
                .as_ref()
                .is_none_or(|id| request.author_id == *id)
            && self
                .created_before
                .is_none_or(|bound| request.created_at <= bound)
            && self
                .created_after
                .is_none_or(|bound| request.created_at >= bound)
            && self
                .updated_before
                .is_none_or(|bound| request.updated_at.is_some_and(|at| at <= bound))
            && self
                .updated_after
                .is_none_or(|bound| request.updated_at.is_some_and(|at| at >= bound))
    }

    /// Keep the matching subset of `requests`, preserving their order.
    #[must_use]
    pub fn apply(&self, requests: Vec<Request>) -> Vec<Request> {
        if self.is_empty() {
            return requests;
        }
        requests
            .into_iter()
            .filter(|request| self.matches(request))
            .collect()
    }
}

/// Case-insensitive substring check; blank needles impose no constraint.
fn substring_matches(needle: Option<&str>, haystack: &str) -> bool {
    match needle.map(str::trim) {
        None | Some("") => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}

/// Exact user-id equality; an unassigned request never matches a user filter.
fn id_matches(filter: Option<&UserId>, actual: Option<&UserId>) -> bool {
    filter.is_none_or(|wanted| actual == Some(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn stamp(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).single().expect("valid date")
    }

    #[fixture]
    fn request() -> Request {
        Request {
            id: 7,
            title: "Printer broken".to_owned(),
            description: "The 3rd floor printer jams on every job".to_owned(),
            status: RequestStatus::Open,
            priority: RequestPriority::Medium,
            created_at: stamp(10),
            updated_at: Some(stamp(12)),
            category_id: 1,
            author_id: UserId::new("u1"),
            assigned_user_id: Some(UserId::new("u2")),
            assigned_team_id: Some(5),
            version: 1,
        }
    }

    #[rstest]
    fn empty_filters_are_the_identity_transform(request: Request) {
        let filters = RequestSearchFilters::default();
        assert!(filters.is_empty());
        assert!(filters.matches(&request));

        let input = vec![request.clone(), request];
        assert_eq!(filters.apply(input.clone()), input);
    }

    #[rstest]
    #[case::title_substring(RequestSearchFilters { title: Some("printer".into()), ..Default::default() }, true)]
    #[case::title_miss(RequestSearchFilters { title: Some("monitor".into()), ..Default::default() }, false)]
    #[case::blank_title_ignored(RequestSearchFilters { title: Some("   ".into()), ..Default::default() }, true)]
    #[case::description_substring(RequestSearchFilters { description: Some("JAMS".into()), ..Default::default() }, true)]
    #[case::status_hit(RequestSearchFilters { status: Some(RequestStatus::Open), ..Default::default() }, true)]
    #[case::status_miss(RequestSearchFilters { status: Some(RequestStatus::Closed), ..Default::default() }, false)]
    #[case::priority_hit(RequestSearchFilters { priority: Some(RequestPriority::Medium), ..Default::default() }, true)]
    #[case::category_miss(RequestSearchFilters { category_id: Some(2), ..Default::default() }, false)]
    #[case::team_hit(RequestSearchFilters { assigned_team_id: Some(5), ..Default::default() }, true)]
    #[case::assignee_hit(RequestSearchFilters { assigned_user_id: Some(UserId::new("u2")), ..Default::default() }, true)]
    #[case::assignee_miss(RequestSearchFilters { assigned_user_id: Some(UserId::new("u9")), ..Default::default() }, false)]
    #[case::author_hit(RequestSearchFilters { author_id: Some(UserId::new("u1")), ..Default::default() }, true)]
    #[case::request_id_hit(RequestSearchFilters { request_id: Some(7), ..Default::default() }, true)]
    fn single_field_predicates(
        request: Request,
        #[case] filters: RequestSearchFilters,
        #[case] expected: bool,
    ) {
        assert_eq!(filters.matches(&request), expected);
    }

    #[rstest]
    fn timestamp_bounds_are_inclusive(request: Request) {
        let on_create = RequestSearchFilters {
            created_before: Some(request.created_at),
            created_after: Some(request.created_at),
            ..Default::default()
        };
        assert!(on_create.matches(&request));

        let too_early = RequestSearchFilters {
            created_before: Some(stamp(9)),
            ..Default::default()
        };
        assert!(!too_early.matches(&request));
    }

    #[rstest]
    fn updated_bounds_never_match_untouched_requests(mut request: Request) {
        request.updated_at = None;
        let filters = RequestSearchFilters {
            updated_before: Some(stamp(28)),
            ..Default::default()
        };
        assert!(!filters.matches(&request));
    }

    #[rstest]
    fn user_filter_skips_unassigned_requests(mut request: Request) {
        request.assigned_user_id = None;
        let filters = RequestSearchFilters {
            assigned_user_id: Some(UserId::new("u2")),
            ..Default::default()
        };
        assert!(!filters.matches(&request));
    }

    #[rstest]
    fn predicates_combine_with_and(request: Request) {
        let filters = RequestSearchFilters {
            status: Some(RequestStatus::Open),
            assigned_team_id: Some(4),
            ..Default::default()
        };
        assert!(!filters.matches(&request));
    }

    #[rstest]
    fn apply_keeps_order_of_matching_subset(request: Request) {
        let mut closed = request.clone();
        closed.id = 8;
        closed.status = RequestStatus::Closed;
        let mut open_newer = request.clone();
        open_newer.id = 9;

        let filters = RequestSearchFilters {
            status: Some(RequestStatus::Open),
            ..Default::default()
        };
        let kept = filters.apply(vec![open_newer.clone(), closed, request.clone()]);
        assert_eq!(kept, vec![open_newer, request]);
    }
}
