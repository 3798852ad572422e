//! Viewer resolution at the HTTP boundary.
//!
//! Authentication terminates upstream; the deployment's auth proxy forwards
//! the authenticated principal id in a request header. This module turns
//! that opaque id into a [`Viewer`] through the [`ViewerDirectory`] port.
//! An absent or unknown principal resolves to `None` rather than an error:
//! read endpoints degrade to deny-all permissions, mutating endpoints
//! reject with 401.

use actix_web::HttpRequest;
use tracing::warn;

use crate::domain::ports::ViewerDirectory;
use crate::domain::viewer::{UserId, Viewer};
use crate::domain::Error;

use super::error::ApiError;

/// Header carrying the authenticated principal id.
pub const VIEWER_ID_HEADER: &str = "x-viewer-id";

/// Resolve the current viewer, if any.
///
/// Only a failing identity collaborator is an error; a missing or unknown
/// principal is a normal anonymous request.
pub async fn resolve_viewer(
    req: &HttpRequest,
    directory: &dyn ViewerDirectory,
) -> Result<Option<Viewer>, ApiError> {
    let Some(raw) = req.headers().get(VIEWER_ID_HEADER) else {
        return Ok(None);
    };
    let Ok(principal) = raw.to_str() else {
        warn!("viewer header is not valid UTF-8");
        return Ok(None);
    };

    let viewer = directory
        .find_by_id(&UserId::new(principal))
        .await
        .map_err(|err| {
            ApiError::from(Error::service_unavailable(format!(
                "identity collaborator unavailable: {err}"
            )))
        })?;

    if viewer.is_none() {
        warn!(principal, "principal did not resolve to a viewer");
    }
    Ok(viewer)
}

/// Resolve the current viewer or reject with 401.
pub async fn require_viewer(
    req: &HttpRequest,
    directory: &dyn ViewerDirectory,
) -> Result<Viewer, ApiError> {
    resolve_viewer(req, directory)
        .await?
        .ok_or_else(|| ApiError::from(Error::unauthorized("authentication required")))
}
