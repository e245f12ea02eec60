pub mod assistant;
pub mod config;
pub mod error;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;

pub use config::Config;

use middleware::AuthClient;
use pipeline::ReportOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ReportOrchestrator>,
    pub auth: Option<AuthClient>,
}

pub fn create_router(state: AppState) -> Router {
    let reports = Router::new()
        .route(
            "/report/generate",
            post(routes::reports::generate_report),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_bearer,
        ));

    let api = Router::new()
        .route("/status", get(routes::status::status))
        .route("/health", get(routes::status::health))
        .merge(reports);

    Router::new().nest("/api", api).with_state(state)
}

/// Caps request handling time. Without a timeout a report request stays open
/// until its run reaches a terminal status.
pub fn with_request_timeout(router: Router, timeout: Option<Duration>) -> Router {
    match timeout {
        Some(timeout) => router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        )),
        None => router,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use tower::ServiceExt;

    use crate::assistant::RunStatus;
    use crate::pipeline::RunPoller;
    use crate::pipeline::testing::ScriptedAssistant;

    // ~1000s of polling at the default interval before the run completes
    fn slow_run_router() -> Router {
        let mut statuses = vec![Ok(RunStatus::InProgress); 200];
        statuses.push(Ok(RunStatus::Completed));
        let api = ScriptedAssistant::new().with_statuses(statuses);
        let orchestrator = ReportOrchestrator::new(Arc::new(api), "asst_test")
            .with_poller(RunPoller::default());

        create_router(AppState {
            orchestrator: Arc::new(orchestrator),
            auth: None,
        })
    }

    fn report_request() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/report/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"content": "X", "imagesBase64": []}"#))
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_run_is_not_cut_off_without_timeout() {
        let app = with_request_timeout(slow_run_router(), None);

        let response = app.oneshot(report_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_timeout_ends_request() {
        let app = with_request_timeout(slow_run_router(), Some(Duration::from_secs(600)));

        let response = app.oneshot(report_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
