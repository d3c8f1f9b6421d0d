#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use layout_assistant::db::repositories::MemoryLayoutStore;
use layout_assistant::gemini::{ChatError, ChatModel};
use layout_assistant::{create_router, AppState, Limits};

pub const LIMITS: Limits = Limits {
    history_depth: 4,
    max_prompt_chars: 1_048_576,
};

/// Model stub that records prompts and replies with a canned answer.
pub struct StubModel {
    pub reply: Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(StubModel {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(body: &str) -> Arc<Self> {
        Arc::new(StubModel {
            reply: Err(body.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for StubModel {
    async fn generate(&self, prompt: &str) -> Result<String, ChatError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(body) => Err(ChatError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: body.clone(),
            }),
        }
    }
}

pub fn app_with(chat: Option<Arc<dyn ChatModel>>, limits: Limits) -> Router {
    create_router(AppState {
        store: Arc::new(MemoryLayoutStore::new(limits.history_depth)),
        chat,
        limits,
    })
}

pub fn app() -> Router {
    app_with(None, LIMITS)
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
