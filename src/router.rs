use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::db::repositories::LayoutStore;
use crate::gemini::ChatModel;
use crate::handlers::{self, chat::chat, layouts};

/// Request limits taken from configuration.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    pub history_depth: usize,
    pub max_prompt_chars: usize,
}

impl From<&Config> for Limits {
    fn from(config: &Config) -> Self {
        Limits {
            history_depth: config.history_depth,
            max_prompt_chars: config.max_prompt_chars,
        }
    }
}

// Define the application state struct
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LayoutStore>,
    /// `None` when no API key was configured.
    pub chat: Option<Arc<dyn ChatModel>>,
    pub limits: Limits,
}

// Function to create the Axum router
pub fn create_router(state: AppState) -> Router {
    // Browsers may call from any origin. Wildcard origins rule out credentials.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(chat))
        .route("/update-layout", patch(layouts::update_layout))
        .route("/get-saved-layout/:layout_no", get(layouts::get_saved_layout))
        .route("/create-new-layout", post(layouts::create_new_layout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
