use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::{AppState, error::AppError};

/// Client for the external authentication service.
#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `Ok(false)` means the service answered but did not identify a user.
    #[tracing::instrument(name = "auth.validate", skip(self, token))]
    pub async fn validate(&self, token: &str) -> anyhow::Result<bool> {
        let response = self
            .client
            .post(format!("{}/auth/validate", self.base_url))
            .bearer_auth(token)
            .json(&json!({}))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("auth service returned {status}");
        }

        let body: serde_json::Value = response.json().await?;
        Ok(body.get("id").is_some_and(|id| !id.is_null()))
    }
}

/// Rejects requests without a valid bearer token. A no-op when no auth
/// service is configured.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(auth) = state.auth.as_ref() else {
        return Ok(next.run(request).await);
    };

    let token = extract_token(request.headers())?;

    match auth.validate(&token).await {
        Ok(true) => {
            tracing::info!("Token validated successfully");
            Ok(next.run(request).await)
        }
        Ok(false) => Err(AppError::Unauthorized("Invalid token".to_string())),
        Err(e) => {
            tracing::error!(error = %e, "Token validation failed");
            Err(AppError::Unauthorized(
                "Failed to validate token".to_string(),
            ))
        }
    }
}

fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty());

    match token {
        Some(token) => Ok(token.to_string()),
        None => {
            tracing::warn!("Bearer token is missing or invalid");
            Err(AppError::Unauthorized(
                "Missing or invalid Authorization header".to_string(),
            ))
        }
    }
}
