use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::{debug, error};

use crate::handlers::{ApiError, MessageResponse};
use crate::prompt::build_design_prompt;
use crate::router::AppState;

pub const MISSING_API_KEY: &str = "Gemini API key not found";
pub const PROMPT_TOO_LONG: &str = "Your message is too long";

#[derive(Deserialize, Debug)]
pub struct ChatRequest {
    pub prompt: String,
}

// Handler for POST /chat
#[axum::debug_handler]
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(model) = state.chat.clone() else {
        error!("Chat requested but GEMINI_API_KEY is not configured");
        return Err(ApiError::internal(MISSING_API_KEY));
    };

    let prompt_chars = request.prompt.chars().count();
    debug!(prompt_chars, "Received chat prompt");
    if prompt_chars > state.limits.max_prompt_chars {
        return Err(ApiError::internal(PROMPT_TOO_LONG));
    }

    let prompt = build_design_prompt(&request.prompt);
    match model.generate(&prompt).await {
        Ok(text) => Ok(MessageResponse::json(text)),
        Err(e) => {
            error!(error = %e, "Model call failed");
            Err(ApiError::internal(e.to_string()))
        }
    }
}
