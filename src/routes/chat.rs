//! Chat HTTP endpoints.
//!
//! `POST /api/chat` composes an answer immediately; pacing the reply (the
//! typing indicator and its delay) is left to the client.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::answer::ResponseDescriptor;
use crate::random::ThreadRandom;
use crate::state::AppState;

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub text: String,
}

/// One quick-question button.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PresetSummary {
    pub question: String,
    pub aliases: Vec<String>,
}

/// `POST /api/chat`: answer one user message.
pub async fn compose(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ResponseDescriptor> {
    let text = req.text.trim();
    let answer = state.composer.compose(text, &mut ThreadRandom);
    info!(
        chars = text.chars().count(),
        chart = answer.chart_spec.is_some(),
        table = answer.table_spec.is_some(),
        "chat answer composed"
    );
    Json(answer)
}

/// `GET /api/presets`: preset questions in table order.
pub async fn list_presets(State(state): State<AppState>) -> Json<Vec<PresetSummary>> {
    let presets = state
        .composer
        .presets()
        .entries()
        .iter()
        .map(|entry| PresetSummary { question: entry.trigger_phrase.clone(), aliases: entry.aliases.clone() })
        .collect();
    Json(presets)
}
