use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;

use crate::AppState;
use crate::assistant::MessagePage;
use crate::error::{AppError, AppResult, INVALID_BODY_MESSAGE};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportBody {
    #[serde(default)]
    pub content: Option<String>,
    pub images_base64: Vec<String>,
}

pub async fn generate_report(
    State(state): State<AppState>,
    payload: Result<Json<GenerateReportBody>, JsonRejection>,
) -> AppResult<Json<MessagePage>> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected report request body");
        AppError::Validation(INVALID_BODY_MESSAGE.to_string())
    })?;

    let content = body
        .content
        .filter(|content| !content.is_empty())
        .ok_or_else(|| AppError::Validation(INVALID_BODY_MESSAGE.to_string()))?;

    tracing::info!(images = body.images_base64.len(), "Images received");

    let messages = state
        .orchestrator
        .generate_report(&content, &body.images_base64)
        .await?;

    Ok(Json(messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::assistant::RunStatus;
    use crate::create_router;
    use crate::middleware::AuthClient;
    use crate::pipeline::testing::{ScriptedAssistant, encode};
    use crate::pipeline::{ReportOrchestrator, RunPoller};

    fn state_with(api: ScriptedAssistant, auth: Option<AuthClient>) -> AppState {
        let orchestrator = ReportOrchestrator::new(Arc::new(api), "asst_test")
            .with_poller(RunPoller::new(Duration::from_millis(1)));
        AppState {
            orchestrator: Arc::new(orchestrator),
            auth,
        }
    }

    fn completing() -> ScriptedAssistant {
        ScriptedAssistant::new().with_statuses(vec![Ok(RunStatus::Completed)])
    }

    fn post_report(body: &str, bearer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/report/generate")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_body_deserialize_camel_case() {
        let body: GenerateReportBody =
            serde_json::from_str(r#"{"content": "X", "imagesBase64": ["aGk="]}"#).unwrap();
        assert_eq!(body.content.as_deref(), Some("X"));
        assert_eq!(body.images_base64, vec!["aGk="]);
    }

    #[test]
    fn test_body_requires_image_array() {
        assert!(serde_json::from_str::<GenerateReportBody>(r#"{"content": "X"}"#).is_err());
        assert!(
            serde_json::from_str::<GenerateReportBody>(r#"{"content": "X", "imagesBase64": "aGk="}"#)
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_generate_report_success() {
        let app = create_router(state_with(completing(), None));

        let body = json!({"content": "Summarize findings", "imagesBase64": [encode("img")]});
        let response = app
            .oneshot(post_report(&body.to_string(), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["object"], "list");
        assert_eq!(json["data"][0]["role"], "assistant");
    }

    #[tokio::test]
    async fn test_empty_content_is_bad_request() {
        let app = create_router(state_with(completing(), None));

        let response = app
            .oneshot(post_report(r#"{"content": "", "imagesBase64": []}"#, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["error"], INVALID_BODY_MESSAGE);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let cases = vec![
            r#"{"content": "X", "imagesBase64": "not-an-array"}"#,
            r#"{"imagesBase64": []}"#,
            "not json at all",
        ];

        for body in cases {
            let app = create_router(state_with(completing(), None));
            let response = app.oneshot(post_report(body, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        }
    }

    #[tokio::test]
    async fn test_pipeline_failure_is_server_error_with_message() {
        let api = ScriptedAssistant::new().with_statuses(vec![Ok(RunStatus::Cancelled)]);
        let app = create_router(state_with(api, None));

        let response = app
            .oneshot(post_report(r#"{"content": "X", "imagesBase64": []}"#, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            read_json(response).await["error"],
            "Run run_1 failed with status: cancelled"
        );
    }

    #[tokio::test]
    async fn test_status_route() {
        let app = create_router(state_with(completing(), None));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({"status": "up"}));
    }

    #[tokio::test]
    async fn test_auth_required_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;
        let auth = Some(AuthClient::new(&server.uri()));
        let body = r#"{"content": "X", "imagesBase64": []}"#;

        let missing = create_router(state_with(completing(), auth.clone()))
            .oneshot(post_report(body, None))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            read_json(missing).await["message"],
            "Missing or invalid Authorization header"
        );

        let allowed = create_router(state_with(completing(), auth))
            .oneshot(post_report(body, Some("token-1")))
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_auth_service_failure_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/validate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let api = completing();
        let state = state_with(api, Some(AuthClient::new(&server.uri())));

        let response = create_router(state)
            .oneshot(post_report(
                r#"{"content": "X", "imagesBase64": []}"#,
                Some("token-1"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            read_json(response).await["message"],
            "Failed to validate token"
        );
    }
}
