pub mod chat;
pub mod error;
pub mod layouts;

use axum::Json;
use serde::{Deserialize, Serialize};

pub use error::ApiError;

/// Success body shared by every endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub response: String,
}

impl MessageResponse {
    /// Wraps `response` in a JSON body.
    pub fn json(response: impl Into<String>) -> Json<Self> {
        Json(MessageResponse {
            response: response.into(),
        })
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// Handler for GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
