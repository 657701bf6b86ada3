//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! is immutable after startup: the config and the preset table are shared
//! behind `Arc`s and every request composes its answer independently.

use std::sync::Arc;

use crate::answer::AnswerComposer;
use crate::config::Config;
use crate::presets::PresetTable;

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub composer: AnswerComposer,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, presets: PresetTable) -> Self {
        Self { config: Arc::new(config), composer: AnswerComposer::new(Arc::new(presets)) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
