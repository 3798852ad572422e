//! HTTP integration tests exercising the full app wiring.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};

use backend::api::health::HealthState;
use backend::api::{self, AppState};
use backend::domain::{RequestService, Viewer, ADMIN_ROLE};
use backend::outbound::persistence::{MemoryRequestRepository, MemoryViewerDirectory};

fn app_state() -> AppState {
    let repo = Arc::new(MemoryRequestRepository::new());
    let directory = Arc::new(MemoryViewerDirectory::with_viewers([
        Viewer::new("admin", "Avery").with_role(ADMIN_ROLE),
        Viewer::new("u1", "Ada").with_team(1),
        Viewer::new("u2", "Bo").with_team(5),
        Viewer::new("u3", "Cy").with_team(5),
    ]));
    AppState::new(RequestService::new(repo), directory)
}

macro_rules! spawn_app {
    () => {{
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .app_data(health)
                .configure(api::configure),
        )
        .await
    }};
}

fn create_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "It broke",
        "priority": "medium",
        "categoryId": 1,
    })
}

#[actix_web::test]
async fn health_probes_respond() {
    let app = spawn_app!();

    let ready = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/ready").to_request(),
    )
    .await;
    assert_eq!(ready.status(), StatusCode::OK);

    let live = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/live").to_request(),
    )
    .await;
    assert_eq!(live.status(), StatusCode::OK);
}

#[actix_web::test]
async fn create_requires_a_resolvable_viewer() {
    let app = spawn_app!();

    let anonymous = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/requests")
            .set_json(create_body("No viewer"))
            .to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let unknown = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/requests")
            .insert_header(("x-viewer-id", "ghost"))
            .set_json(create_body("Unknown viewer"))
            .to_request(),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_then_fetch_roundtrip() {
    let app = spawn_app!();

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/requests")
            .insert_header(("x-viewer-id", "u1"))
            .set_json(create_body("Printer broken"))
            .to_request(),
    )
    .await;
    assert_eq!(created["id"], 1);

    // Anonymous fetch still serves the data, permission-gated.
    let details: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/requests/1")
            .to_request(),
    )
    .await;
    assert_eq!(details["title"], "Printer broken");
    assert_eq!(details["status"], "open");
    assert_eq!(details["authorId"], "u1");
    assert_eq!(details["assignedUserId"], Value::Null);
    assert_eq!(details["allowAssign"], false);
    assert_eq!(details["allowEdit"], false);
}

#[actix_web::test]
async fn assignment_flow_over_http() {
    let app = spawn_app!();

    let _: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/requests")
            .insert_header(("x-viewer-id", "u1"))
            .set_json(create_body("VPN flaky"))
            .to_request(),
    )
    .await;

    let assigned = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/requests/1/assign")
            .insert_header(("x-viewer-id", "u2"))
            .to_request(),
    )
    .await;
    assert_eq!(assigned.status(), StatusCode::NO_CONTENT);

    let as_claimant: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/requests/1")
            .insert_header(("x-viewer-id", "u2"))
            .to_request(),
    )
    .await;
    assert_eq!(as_claimant["assignedUserId"], "u2");
    assert_eq!(as_claimant["assignedTeamId"], 5);
    assert_eq!(as_claimant["status"], "open");
    assert_eq!(as_claimant["allowAssign"], false);
    assert_eq!(as_claimant["allowEdit"], true);

    let as_teammate: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/requests/1")
            .insert_header(("x-viewer-id", "u3"))
            .to_request(),
    )
    .await;
    assert_eq!(as_teammate["allowAssign"], true);
    assert_eq!(as_teammate["allowEdit"], false);
}

#[actix_web::test]
async fn missing_request_maps_to_404() {
    let app = spawn_app!();

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/requests/999")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn list_filters_through_query_parameters() {
    let app = spawn_app!();

    for title in ["Printer broken", "Printer jammed", "VPN flaky"] {
        let _: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/requests")
                .insert_header(("x-viewer-id", "u1"))
                .set_json(create_body(title))
                .to_request(),
        )
        .await;
    }

    let page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/requests?title=printer&status=open&page=1")
            .to_request(),
    )
    .await;
    assert_eq!(page["totalItems"], 2);
    assert_eq!(page["hasNextPage"], false);
    assert_eq!(page["filters"]["title"], "printer");
    let items = page["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
}

#[actix_web::test]
async fn attachments_upload_and_download() {
    let app = spawn_app!();

    let body = json!({
        "title": "With attachment",
        "description": "See attached",
        "priority": "low",
        "categoryId": 1,
        "files": [{
            "fileName": "notes.txt",
            "contentType": "text/plain",
            "data": BASE64.encode(b"hello attachment"),
        }],
    });
    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/requests")
            .insert_header(("x-viewer-id", "u1"))
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(created["id"], 1);

    let details: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/requests/1")
            .to_request(),
    )
    .await;
    let attachment_id = details["attachments"][0]["id"]
        .as_i64()
        .expect("attachment id");

    let download = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/attachments/{attachment_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(download.status(), StatusCode::OK);
    let content_type = download
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    assert_eq!(content_type.as_deref(), Some("text/plain"));
    let bytes = test::read_body(download).await;
    assert_eq!(bytes.as_ref(), b"hello attachment");
}

#[actix_web::test]
async fn disallowed_upload_is_rejected_with_422() {
    let app = spawn_app!();

    let body = json!({
        "title": "Sneaky",
        "description": "Runs great",
        "priority": "low",
        "categoryId": 1,
        "files": [{
            "fileName": "payload.exe",
            "contentType": "application/octet-stream",
            "data": BASE64.encode(b"MZ..."),
        }],
    });
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/requests")
            .insert_header(("x-viewer-id", "u1"))
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error: Value = test::read_body_json(response).await;
    assert_eq!(error["code"], "invalid_file");
    assert_eq!(error["details"]["fileName"], "payload.exe");
}

#[actix_web::test]
async fn edit_and_respond_over_http() {
    let app = spawn_app!();

    let _: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/requests")
            .insert_header(("x-viewer-id", "u1"))
            .set_json(create_body("Escalate me"))
            .to_request(),
    )
    .await;

    let edited = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/requests/1")
            .insert_header(("x-viewer-id", "u2"))
            .set_json(json!({
                "priority": "critical",
                "categoryId": 2,
                "status": "in_progress",
                "assignedUserId": "u2",
                "assignedTeamId": 5,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(edited.status(), StatusCode::NO_CONTENT);

    let responded = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/requests/1/responses")
            .insert_header(("x-viewer-id", "u2"))
            .set_json(json!({ "text": "Looking into it" }))
            .to_request(),
    )
    .await;
    assert_eq!(responded.status(), StatusCode::NO_CONTENT);

    let details: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/requests/1")
            .to_request(),
    )
    .await;
    assert_eq!(details["priority"], "critical");
    assert_eq!(details["status"], "in_progress");
    assert_eq!(details["updatedAt"].is_string(), true);
    assert_eq!(details["responses"][0]["text"], "Looking into it");
    assert_eq!(details["responses"][0]["authorId"], "u2");
}
