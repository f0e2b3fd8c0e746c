use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::models::{MapRequest, MappingResult};
use crate::state::AppState;

/// POST /api/map - Map a story and its tags onto the taxonomy.
///
/// Always answers with a well-formed `MappingResult` unless the story is
/// blank; backend trouble is absorbed by the keyword fallback.
pub async fn map_story(
    State(state): State<AppState>,
    Json(req): Json<MapRequest>,
) -> Result<Json<MappingResult>, (StatusCode, String)> {
    if req.story.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please enter a story description.".to_string(),
        ));
    }

    let tags = req.tags.into_tags();
    let result = state.mapper.map_story(&tags, &req.story).await;
    Ok(Json(result))
}
