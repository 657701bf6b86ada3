//! Preset question table.
//!
//! DESIGN
//! ======
//! Presets are an ordered `Vec`, not a map: matching is first-match-wins in
//! declaration order, so the table order is part of the behavior. The table
//! is validated once at construction and shared read-only afterwards.

use std::collections::HashSet;

use serde::Serialize;

#[cfg(test)]
#[path = "presets_test.rs"]
mod tests;

// =============================================================================
// TYPES
// =============================================================================

/// Which chart, if any, a preset answer carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    None,
    Bar,
    Line,
}

/// Static table payload. Every row must have one cell per header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSpec {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableSpec {
    #[must_use]
    pub fn new(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        }
    }

    /// Check that every row is as wide as the header row.
    pub fn validate(&self) -> Result<(), PresetError> {
        let expected = self.headers.len();
        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != expected {
                return Err(PresetError::RaggedRow { row: index, expected, found: row.len() });
            }
        }
        Ok(())
    }
}

/// Static image payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSpec {
    pub src: String,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// A trigger phrase plus its canned response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetEntry {
    pub trigger_phrase: String,
    /// Each alias is a space-separated keyword list; all keywords must occur.
    pub aliases: Vec<String>,
    pub response_text: String,
    pub chart_kind: ChartKind,
    pub table: Option<TableSpec>,
    pub image: Option<ImageSpec>,
    pub list: Option<Vec<String>>,
}

impl PresetEntry {
    fn text(trigger_phrase: &str, response_text: &str, aliases: &[&str]) -> Self {
        Self {
            trigger_phrase: trigger_phrase.to_string(),
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
            response_text: response_text.to_string(),
            chart_kind: ChartKind::None,
            table: None,
            image: None,
            list: None,
        }
    }

    /// Whether the trigger phrase occurs verbatim in `input`.
    #[must_use]
    pub fn matches_trigger(&self, input: &str) -> bool {
        !self.trigger_phrase.is_empty() && input.contains(&self.trigger_phrase)
    }

    /// Whether any alias matches `input`.
    #[must_use]
    pub fn matches_alias(&self, input: &str) -> bool {
        self.aliases.iter().any(|alias| alias_matches(alias, input))
    }
}

fn alias_matches(alias: &str, input: &str) -> bool {
    let mut keywords = alias.split_whitespace().peekable();
    if keywords.peek().is_none() {
        return false;
    }
    keywords.all(|keyword| input.contains(keyword))
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PresetError {
    #[error("duplicate trigger phrase: {0}")]
    DuplicateTrigger(String),
    #[error("empty trigger phrase at position {0}")]
    EmptyTrigger(usize),
    #[error("table row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
}

// =============================================================================
// TABLE
// =============================================================================

/// Validated, ordered preset table.
#[derive(Debug, Clone)]
pub struct PresetTable {
    entries: Vec<PresetEntry>,
}

impl PresetTable {
    /// Validate and wrap `entries`, keeping their order.
    ///
    /// # Errors
    ///
    /// Fails on an empty or duplicated trigger phrase, or a table payload
    /// whose rows do not match its headers.
    pub fn new(entries: Vec<PresetEntry>) -> Result<Self, PresetError> {
        let mut seen = HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            if entry.trigger_phrase.is_empty() {
                return Err(PresetError::EmptyTrigger(index));
            }
            if !seen.insert(entry.trigger_phrase.as_str()) {
                return Err(PresetError::DuplicateTrigger(entry.trigger_phrase.clone()));
            }
            if let Some(table) = &entry.table {
                table.validate()?;
            }
        }
        Ok(Self { entries })
    }

    /// The demo's built-in presets.
    ///
    /// # Errors
    ///
    /// Only if the built-in definitions are edited into an invalid state.
    pub fn builtin() -> Result<Self, PresetError> {
        Self::new(builtin_entries())
    }

    #[must_use]
    pub fn entries(&self) -> &[PresetEntry] {
        &self.entries
    }

    /// First preset whose trigger phrase occurs in `input`, falling back to
    /// the first preset with a matching alias. Declaration order breaks ties.
    #[must_use]
    pub fn find(&self, input: &str) -> Option<&PresetEntry> {
        self.entries
            .iter()
            .find(|entry| entry.matches_trigger(input))
            .or_else(|| self.entries.iter().find(|entry| entry.matches_alias(input)))
    }
}

fn builtin_entries() -> Vec<PresetEntry> {
    vec![
        PresetEntry {
            chart_kind: ChartKind::Bar,
            ..PresetEntry::text(
                "查看最近7天访问量（柱状图）",
                "这是最近7天访问量的柱状图：",
                &["7天 访问量 柱状", "七天 柱状 图"],
            )
        },
        PresetEntry {
            chart_kind: ChartKind::Line,
            ..PresetEntry::text(
                "查看最近7天访问量（折线图）",
                "这是最近7天访问量的折线图：",
                &["7天 访问量 折线", "七天 折线 图"],
            )
        },
        PresetEntry {
            table: Some(TableSpec::new(
                &["渠道", "新增用户", "次日留存", "7日留存", "客单价"],
                &[
                    &["渠道 A", "24,310", "34.2%", "18.9%", "¥ 46.3"],
                    &["渠道 B", "18,905", "31.1%", "15.4%", "¥ 41.2"],
                    &["自然流量", "12,770", "39.5%", "21.7%", "¥ 35.8"],
                ],
            )),
            ..PresetEntry::text("查看渠道表现表格", "这是渠道表现表格：", &["渠道 表格", "渠道 表现", "渠道 数据"])
        },
        PresetEntry {
            image: Some(ImageSpec {
                src: "images/complex-diagram.svg".into(),
                alt: "产品结构示意".into(),
                caption: Some("系统架构与数据流总览".into()),
            }),
            ..PresetEntry::text(
                "查看产品结构（图片）",
                "这是产品结构图（示意）：",
                &["产品 结构", "产品 图片", "结构 图片"],
            )
        },
        PresetEntry {
            list: Some(vec![
                "增长主要来自自然流量与渠道A".into(),
                "复购提升与产品结构优化相关".into(),
                "建议扩大灰度并加强用户引导".into(),
            ]),
            ..PresetEntry::text("输出关键结论要点（纯文本）", "以下为关键结论要点：", &["关键 结论", "结论 要点"])
        },
    ]
}
