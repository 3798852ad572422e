//! Inbound HTTP adapter: handlers, DTOs and the error envelope.

pub mod error;
pub mod health;
pub mod identity;
pub mod requests;

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::ViewerDirectory;
use crate::domain::RequestService;

pub use error::{ApiError, ApiResult};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The request lifecycle service.
    pub requests: RequestService,
    /// The identity collaborator resolving principal ids to viewers.
    pub viewers: Arc<dyn ViewerDirectory>,
}

impl AppState {
    /// Bundle the service and the identity port into handler state.
    pub fn new(requests: RequestService, viewers: Arc<dyn ViewerDirectory>) -> Self {
        Self { requests, viewers }
    }
}

/// Register every route; shared between the binary and integration tests.
///
/// Callers still provide `web::Data<AppState>` and
/// `web::Data<HealthState>` via `app_data`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(requests::list_requests)
            .service(requests::get_request)
            .service(requests::create_request)
            .service(requests::assign_request)
            .service(requests::edit_request)
            .service(requests::add_response)
            .service(requests::get_attachment),
    )
    .service(health::ready)
    .service(health::live);
}
