use axum::Json;
use serde_json::{Value, json};

pub async fn status() -> Json<Value> {
    Json(json!({ "status": "up" }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
