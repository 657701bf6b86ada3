use super::*;

fn table() -> PresetTable {
    PresetTable::builtin().expect("builtin presets are valid")
}

// =============================================================================
// Builtin table
// =============================================================================

#[test]
fn builtin_table_keeps_declaration_order() {
    let t = table();
    let phrases: Vec<&str> = t
        .entries()
        .iter()
        .map(|e| e.trigger_phrase.as_str())
        .collect();
    assert_eq!(
        phrases,
        vec![
            "查看最近7天访问量（柱状图）",
            "查看最近7天访问量（折线图）",
            "查看渠道表现表格",
            "查看产品结构（图片）",
            "输出关键结论要点（纯文本）",
        ]
    );
}

#[test]
fn builtin_channel_table_has_three_rows() {
    let t = table();
    let entry = &t.entries()[2];
    let spec = entry.table.as_ref().expect("channel preset carries a table");
    assert_eq!(spec.headers, vec!["渠道", "新增用户", "次日留存", "7日留存", "客单价"]);
    assert_eq!(spec.rows.len(), 3);
    assert_eq!(spec.rows[2][0], "自然流量");
}

// =============================================================================
// Matching
// =============================================================================

#[test]
fn find_matches_trigger_substring() {
    let t = table();
    let entry = t.find("请帮我查看渠道表现表格，谢谢").unwrap();
    assert_eq!(entry.response_text, "这是渠道表现表格：");
}

#[test]
fn find_prefers_earlier_trigger_on_tie() {
    let t = table();
    let entry = t
        .find("查看最近7天访问量（折线图）以及查看最近7天访问量（柱状图）")
        .unwrap();
    assert_eq!(entry.chart_kind, ChartKind::Bar);
}

#[test]
fn find_uses_alias_when_no_trigger_matches() {
    let t = table();
    let entry = t.find("渠道表格").unwrap();
    assert_eq!(entry.trigger_phrase, "查看渠道表现表格");
}

#[test]
fn alias_keywords_may_be_separated() {
    let t = table();
    let entry = t.find("七天的折线走势图").unwrap();
    assert_eq!(entry.chart_kind, ChartKind::Line);
}

#[test]
fn trigger_beats_earlier_alias() {
    let t = table();
    // The bar-chart preset is declared first and its alias matches, but the
    // channel preset's trigger phrase takes priority.
    let entry = t.find("七天 柱状 图 查看渠道表现表格").unwrap();
    assert_eq!(entry.trigger_phrase, "查看渠道表现表格");
}

#[test]
fn trigger_match_is_case_sensitive() {
    let custom = PresetTable::new(vec![PresetEntry::text("Report", "r", &[])]).unwrap();
    assert!(custom.find("show report").is_none());
    assert!(custom.find("show Report").is_some());
}

#[test]
fn find_returns_none_for_unrelated_text() {
    assert!(table().find("random unrelated text").is_none());
    assert!(table().find("").is_none());
}

#[test]
fn blank_alias_never_matches() {
    let entry = PresetEntry::text("x", "y", &["   "]);
    assert!(!entry.matches_alias("anything"));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn ragged_table_row_is_rejected() {
    let mut entry = PresetEntry::text("t", "r", &[]);
    entry.table = Some(TableSpec::new(&["a", "b"], &[&["1", "2"], &["3"]]));
    let err = PresetTable::new(vec![entry]).unwrap_err();
    assert_eq!(err, PresetError::RaggedRow { row: 1, expected: 2, found: 1 });
}

#[test]
fn duplicate_trigger_is_rejected() {
    let err = PresetTable::new(vec![PresetEntry::text("t", "a", &[]), PresetEntry::text("t", "b", &[])]).unwrap_err();
    assert_eq!(err, PresetError::DuplicateTrigger("t".into()));
}

#[test]
fn empty_trigger_is_rejected() {
    let err = PresetTable::new(vec![PresetEntry::text("", "a", &[])]).unwrap_err();
    assert_eq!(err, PresetError::EmptyTrigger(0));
}
