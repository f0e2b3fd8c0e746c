use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::config::{CHAT_MODEL, CHAT_TEMPERATURE};
use crate::models::GenreEntry;
use crate::state::AppState;

/// GET /api/taxonomy - The taxonomy in construction order
pub async fn get_taxonomy(State(state): State<AppState>) -> Json<Vec<GenreEntry>> {
    Json(state.mapper.taxonomy().entries().to_vec())
}

/// Config response with API key redacted
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub llm_available: bool,
    pub llm_base_url: String,
    pub chat_model: &'static str,
    pub temperature: f32,
    pub has_api_key: bool,
    pub embedding_provider: String,
    pub retrieval_k: usize,
}

/// GET /api/config - Effective backend configuration
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let config = &state.config;
    Json(ConfigResponse {
        llm_available: state.mapper.has_llm(),
        llm_base_url: config.llm.base_url.clone(),
        chat_model: CHAT_MODEL,
        temperature: CHAT_TEMPERATURE,
        has_api_key: config.llm.is_configured(),
        embedding_provider: state.mapper.retriever().embedder_name().to_string(),
        retrieval_k: state.mapper.retriever().k(),
    })
}
