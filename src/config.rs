use std::env;
use std::time::Duration;

use crate::assistant::openai::DEFAULT_BASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub assistant_id: String,
    pub poll_interval: Duration,
    pub poll_deadline: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub auth_app_url: Option<String>,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a number"),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set"),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            assistant_id: env::var("ASSISTANT_ID").expect("ASSISTANT_ID must be set"),
            poll_interval: Duration::from_millis(
                env::var("RUN_POLL_INTERVAL_MS")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .expect("RUN_POLL_INTERVAL_MS must be a number"),
            ),
            poll_deadline: env::var("RUN_POLL_DEADLINE_SECS").ok().map(|secs| {
                Duration::from_secs(
                    secs.parse()
                        .expect("RUN_POLL_DEADLINE_SECS must be a number"),
                )
            }),
            request_timeout: env::var("REQUEST_TIMEOUT_SECS").ok().map(|secs| {
                Duration::from_secs(
                    secs.parse()
                        .expect("REQUEST_TIMEOUT_SECS must be a number"),
                )
            }),
            auth_app_url: env::var("AUTH_APP_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "vision-report-generator".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
