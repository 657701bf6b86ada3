//! Answer composition — free text → canned response descriptor.
//!
//! DESIGN
//! ======
//! Resolution order: preset trigger phrase, preset alias, chart-intent
//! keywords, then a plain acknowledgment. Chart numbers are never stored in
//! presets; every chart answer gets a fresh 7-point series from the injected
//! [`RandomSource`], while table/image/list payloads are copied verbatim.

use std::sync::Arc;

use serde::Serialize;

use crate::presets::{ChartKind, ImageSpec, PresetEntry, PresetTable, TableSpec};
use crate::random::RandomSource;

#[cfg(test)]
#[path = "answer_test.rs"]
mod tests;

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
pub const SERIES_MIN: u32 = 20;
pub const SERIES_MAX: u32 = 120;
pub const SERIES_LABEL: &str = "访问量";
pub const DEFAULT_TEXT: &str = "好的。";

const CHART_KEYWORDS: [&str; 6] = ["图", "chart", "柱状", "折线", "line", "bar"];
const LINE_KEYWORDS: [&str; 2] = ["折线", "line"];

// =============================================================================
// TYPES
// =============================================================================

/// Chart kinds that actually render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
}

impl ChartType {
    fn from_kind(kind: ChartKind) -> Option<Self> {
        match kind {
            ChartKind::None => None,
            ChartKind::Bar => Some(Self::Bar),
            ChartKind::Line => Some(Self::Line),
        }
    }
}

/// Styling hints for the browser chart library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStyle {
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub fill: bool,
    pub tension: f64,
    pub point_radius: u32,
    pub point_background_color: &'static str,
}

impl ChartStyle {
    #[must_use]
    pub fn for_type(kind: ChartType) -> Self {
        match kind {
            ChartType::Bar => Self {
                border_color: "#6ea8fe",
                background_color: "rgba(110,168,254,0.35)",
                fill: true,
                tension: 0.35,
                point_radius: 0,
                point_background_color: "#6ea8fe",
            },
            ChartType::Line => Self {
                border_color: "#6ea8fe",
                background_color: "transparent",
                fill: false,
                tension: 0.35,
                point_radius: 3,
                point_background_color: "#6ea8fe",
            },
        }
    }
}

/// Declarative chart description handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartType,
    pub categories: Vec<String>,
    pub series: Vec<u32>,
    pub label: &'static str,
    pub style: ChartStyle,
}

impl ChartSpec {
    /// Weekday chart with a freshly drawn series.
    pub fn weekly<R: RandomSource + ?Sized>(kind: ChartType, random: &mut R) -> Self {
        Self {
            kind,
            categories: WEEKDAYS.iter().map(|d| (*d).to_string()).collect(),
            series: WEEKDAYS
                .iter()
                .map(|_| random.uniform_int(SERIES_MIN, SERIES_MAX))
                .collect(),
            label: SERIES_LABEL,
            style: ChartStyle::for_type(kind),
        }
    }
}

/// What the assistant says back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDescriptor {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_spec: Option<ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_spec: Option<TableSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_spec: Option<ImageSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_spec: Option<Vec<String>>,
}

impl ResponseDescriptor {
    /// Text-only answer.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), chart_spec: None, table_spec: None, image_spec: None, list_spec: None }
    }

    /// True when no chart, table, image or list is attached.
    #[must_use]
    pub fn is_text_only(&self) -> bool {
        self.chart_spec.is_none() && self.table_spec.is_none() && self.image_spec.is_none() && self.list_spec.is_none()
    }
}

// =============================================================================
// COMPOSER
// =============================================================================

/// Maps user text to a [`ResponseDescriptor`] using a preset table.
#[derive(Debug, Clone)]
pub struct AnswerComposer {
    presets: Arc<PresetTable>,
}

impl AnswerComposer {
    #[must_use]
    pub fn new(presets: Arc<PresetTable>) -> Self {
        Self { presets }
    }

    #[must_use]
    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    /// Compose the answer for `user_text`. Total: every input yields a
    /// descriptor, unmatched input gets [`DEFAULT_TEXT`].
    pub fn compose<R: RandomSource + ?Sized>(&self, user_text: &str, random: &mut R) -> ResponseDescriptor {
        if let Some(preset) = self.presets.find(user_text) {
            tracing::debug!(trigger = %preset.trigger_phrase, "preset matched");
            return from_preset(preset, random);
        }

        if let Some(kind) = detect_chart_intent(user_text) {
            tracing::debug!(?kind, "chart intent matched");
            let text = match kind {
                ChartType::Line => "这是折线图：",
                ChartType::Bar => "这是柱状图：",
            };
            return ResponseDescriptor {
                chart_spec: Some(ChartSpec::weekly(kind, random)),
                ..ResponseDescriptor::text(text)
            };
        }

        ResponseDescriptor::text(DEFAULT_TEXT)
    }
}

fn from_preset<R: RandomSource + ?Sized>(preset: &PresetEntry, random: &mut R) -> ResponseDescriptor {
    ResponseDescriptor {
        text: preset.response_text.clone(),
        chart_spec: ChartType::from_kind(preset.chart_kind).map(|kind| ChartSpec::weekly(kind, random)),
        table_spec: preset.table.clone(),
        image_spec: preset.image.clone(),
        list_spec: preset.list.clone(),
    }
}

/// Keyword fallback: `Some(kind)` when the text asks for a chart at all.
#[must_use]
pub fn detect_chart_intent(user_text: &str) -> Option<ChartType> {
    let lower = user_text.to_lowercase();
    if !CHART_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return None;
    }
    if LINE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Some(ChartType::Line)
    } else {
        Some(ChartType::Bar)
    }
}
