use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::num::IntErrorKind;
use tracing::{debug, info};

use crate::handlers::{ApiError, MessageResponse};
use crate::router::AppState;

pub const INACCESSIBLE_INDEX: &str = "Inaccessible index";
pub const NO_LAYOUTS: &str = "No layouts have been stored in this database.";
pub const LAYOUT_EXISTS: &str =
    "Unable to create a new layout as there already exists one in the database.";

#[derive(Deserialize, Debug)]
pub struct LayoutRequest {
    #[serde(rename = "innerHTML")]
    pub inner_html: String,
}

// Handler for PATCH /update-layout
pub async fn update_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!(len = request.inner_html.len(), "Updating layout");
    let layout = state
        .store
        .save(request.inner_html)
        .await
        .map_err(ApiError::database)?;
    info!(layout_id = layout.id, "Layout updated");
    Ok(MessageResponse::json("Updated successfully"))
}

/// Resolves a path segment to a history index.
///
/// Any integer outside `0..history_depth`, however large, is an inaccessible
/// index; only a segment that is not an integer at all is a client error.
pub fn parse_layout_index(segment: &str, history_depth: usize) -> Result<usize, ApiError> {
    let layout_no = match segment.parse::<i64>() {
        Ok(n) => n,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                return Err(ApiError::internal(INACCESSIBLE_INDEX))
            }
            _ => {
                return Err(ApiError::new(
                    StatusCode::BAD_REQUEST,
                    format!("layout_no must be an integer, got {:?}", segment),
                ))
            }
        },
    };

    usize::try_from(layout_no)
        .ok()
        .filter(|i| *i < history_depth)
        .ok_or_else(|| ApiError::internal(INACCESSIBLE_INDEX))
}

// Handler for GET /get-saved-layout/:layout_no
// 0 is the newest layout, history_depth - 1 the oldest.
pub async fn get_saved_layout(
    State(state): State<AppState>,
    Path(layout_no): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!(%layout_no, "Fetching saved layout");
    let index = parse_layout_index(&layout_no, state.limits.history_depth)?;

    match state.store.nth_newest(index).await.map_err(ApiError::database)? {
        Some(layout) => Ok(MessageResponse::json(layout.inner_html)),
        None => Err(ApiError::new(StatusCode::NOT_IMPLEMENTED, NO_LAYOUTS)),
    }
}

// Handler for POST /create-new-layout
pub async fn create_new_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!(len = request.inner_html.len(), "Creating first layout");
    match state
        .store
        .create_first(request.inner_html)
        .await
        .map_err(ApiError::database)?
    {
        Some(layout) => {
            info!(layout_id = layout.id, "Layout created");
            Ok(MessageResponse::json("Created successfully"))
        }
        None => Err(ApiError::internal(LAYOUT_EXISTS)),
    }
}
