use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use opentelemetry::trace::TraceContextExt;
use serde_json::json;
use thiserror::Error;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::pipeline::ReportError;

pub const INVALID_BODY_MESSAGE: &str =
    "Invalid request body. Expected { content: string, imagesBase64: string[] }";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Report(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn get_trace_id() -> Option<String> {
    let span = Span::current();
    let context = span.context();
    let span_ref = context.span();
    let span_context = span_ref.span_context();

    if span_context.is_valid() {
        Some(span_context.trace_id().to_string())
    } else {
        None
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut body = match &self {
            AppError::Validation(msg) => json!({ "error": msg }),
            AppError::Unauthorized(msg) => json!({ "message": msg }),
            AppError::Report(e) => {
                tracing::error!(
                    error = %e,
                    pipeline.stage = e.stage().as_str(),
                    "Error generating report"
                );
                json!({ "error": e.to_string() })
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Unhandled error");
                json!({ "error": "An unexpected error occurred" })
            }
        };

        if status.is_server_error()
            && let Some(trace_id) = get_trace_id()
        {
            body["trace_id"] = json!(trace_id);
        }

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
