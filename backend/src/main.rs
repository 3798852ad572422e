//! Backend entry-point: wires REST endpoints and OpenAPI docs.

use std::env;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::api::health::HealthState;
use backend::api::{self, AppState};
use backend::domain::{RequestService, Viewer, ADMIN_ROLE};
use backend::outbound::persistence::{MemoryRequestRepository, MemoryViewerDirectory};
#[cfg(debug_assertions)]
use backend::ApiDoc;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());

    let repository = Arc::new(MemoryRequestRepository::new());
    let directory = Arc::new(seeded_directory());
    let state = AppState::new(RequestService::new(repository), directory);

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(server_health_state.clone())
            .configure(api::configure);

        #[cfg(debug_assertions)]
        let app = app
            .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

/// Demo principals standing in for the external identity collaborator.
fn seeded_directory() -> MemoryViewerDirectory {
    MemoryViewerDirectory::with_viewers([
        Viewer::new("admin", "Avery Admin").with_role(ADMIN_ROLE),
        Viewer::new("u-support-1", "Sam Support").with_team(1),
        Viewer::new("u-support-2", "Toni Support").with_team(1),
        Viewer::new("u-net-1", "Nia Network").with_team(2),
    ])
}
