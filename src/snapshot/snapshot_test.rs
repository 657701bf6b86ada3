use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use time::Month;

use super::nav::{NAV_FLOOR, NavSeries};

fn test_config(dir: &std::path::Path) -> SnapshotConfig {
    SnapshotConfig {
        out_path: dir.join("images").join("fund_nav.png"),
        width: 320,
        height: 180,
        scale: 1.0,
        timeout: Duration::from_secs(30),
        bin: dir.join("missing-render-binary"),
    }
}

// =============================================================================
// Series
// =============================================================================

#[test]
fn date_range_is_inclusive() {
    let (start, end) = nav::publication_window().unwrap();
    let dates = nav::date_range(start, end);
    assert_eq!(dates.len(), 381);
    assert_eq!(nav::format_date(dates[0]), "2024-05-12");
    assert_eq!(nav::format_date(*dates.last().unwrap()), "2025-05-27");
}

#[test]
fn date_range_empty_when_reversed() {
    let (start, end) = nav::publication_window().unwrap();
    assert!(nav::date_range(end, start).is_empty());
}

#[test]
fn generated_series_lengths_match() {
    let mut rng = StdRng::seed_from_u64(7);
    let series = NavSeries::generate(&mut rng).unwrap();
    assert_eq!(series.nav.len(), series.dates.len());
    assert_eq!(series.ma.len(), series.dates.len());
    assert_eq!(series.range_text(), "净值日期：2024-05-12 ~ 2025-05-27");
}

#[test]
fn random_walk_respects_floor() {
    let mut rng = StdRng::seed_from_u64(1);
    // Huge volatility forces the floor branch.
    let values = nav::random_walk(500, 1.0, 1.9, &mut rng);
    assert!(values.iter().all(|v| *v >= NAV_FLOOR - 1e-9), "{values:?}");
}

#[test]
fn random_walk_rounds_to_four_decimals() {
    let mut rng = StdRng::seed_from_u64(3);
    for v in nav::random_walk(50, 1.0, 0.006, &mut rng) {
        assert!((v * 10_000.0 - (v * 10_000.0).round()).abs() < 1e-6);
    }
}

#[test]
fn moving_average_of_constant_is_constant() {
    let ma = nav::moving_average(&[1.25; 30], 20);
    assert!(ma.iter().all(|v| (*v - 1.25).abs() < 1e-12));
}

#[test]
fn moving_average_uses_partial_window_at_start() {
    let ma = nav::moving_average(&[1.0, 2.0, 3.0, 4.0], 2);
    assert_eq!(ma, vec![1.0, 1.5, 2.5, 3.5]);
}

#[test]
fn mean_of_empty_is_none() {
    assert!(nav::mean(&[]).is_none());
}

#[test]
fn month_label_only_on_first_day() {
    let first = time::Date::from_calendar_date(2024, Month::June, 1).unwrap();
    let second = time::Date::from_calendar_date(2024, Month::June, 2).unwrap();
    assert_eq!(nav::month_label(first).as_deref(), Some("2024-06"));
    assert!(nav::month_label(second).is_none());
}

// =============================================================================
// SVG
// =============================================================================

#[test]
fn svg_contains_title_legend_and_markers() {
    let mut rng = StdRng::seed_from_u64(11);
    let series = NavSeries::generate(&mut rng).unwrap();
    let markup = svg::nav_chart_svg(&series, 1200, 675);
    assert!(markup.starts_with("<svg"));
    assert!(markup.contains(r#"width="1200" height="675""#));
    assert!(markup.contains("双周利"));
    assert!(markup.contains(svg::NAV_LEGEND));
    assert!(markup.contains(svg::MA_LEGEND));
    assert!(markup.contains("最新: "));
    assert!(markup.contains("均值"));
    assert!(markup.contains(">2024-06<"));
    assert!(markup.trim_end().ends_with("</svg>"));
}

#[test]
fn svg_handles_empty_series() {
    let series = NavSeries { dates: Vec::new(), nav: Vec::new(), ma: Vec::new() };
    let markup = svg::nav_chart_svg(&series, 400, 300);
    assert!(!markup.contains("最新"));
    assert!(markup.trim_end().ends_with("</svg>"));
}

#[test]
fn escape_xml_escapes_markup() {
    assert_eq!(svg::escape_xml(r#"a<b>&"c""#), "a&lt;b&gt;&amp;&quot;c&quot;");
}

// =============================================================================
// Raster + file output
// =============================================================================

#[test]
fn scaled_rounds_and_never_returns_zero() {
    assert_eq!(raster::scaled(1200, 2.0), 2400);
    assert_eq!(raster::scaled(675, 1.5), 1013);
    assert_eq!(raster::scaled(0, 2.0), 1);
}

#[test]
fn render_to_file_writes_png_of_scaled_size() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.scale = 2.0;
    let mut rng = StdRng::seed_from_u64(5);
    let path = render_to_file(&config, &mut rng).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    // IHDR width/height, big-endian at offsets 16..24.
    let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
    let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
    assert_eq!((width, height), (640, 360));
}

#[test]
fn invalid_svg_is_an_error() {
    let err = raster::svg_to_png("<not-svg", 10, 10, 1.0).unwrap_err();
    assert!(matches!(err, SnapshotError::Svg(_)));
}

#[tokio::test]
async fn render_with_timeout_succeeds_within_deadline() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let path = render_with_timeout(config).await.unwrap();
    assert!(path.exists());
}

#[test]
fn timed_out_render_never_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.width = 1200;
    config.height = 675;
    config.scale = 2.0;
    config.timeout = Duration::from_millis(1);
    let out = config.out_path.clone();

    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    let err = rt.block_on(render_with_timeout(config)).unwrap_err();
    assert!(matches!(err, SnapshotError::Timeout(_)), "{err}");
    // Dropping the runtime waits for the abandoned render to return.
    drop(rt);
    assert!(!out.exists());
}

// =============================================================================
// Startup spawn
// =============================================================================

#[tokio::test]
async fn ensure_snapshot_skips_when_png_exists() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    std::fs::create_dir_all(config.out_path.parent().unwrap()).unwrap();
    std::fs::write(&config.out_path, b"png").unwrap();
    assert!(spawn::ensure_snapshot(&config).is_none());
}

#[tokio::test]
async fn ensure_snapshot_logs_and_survives_missing_binary() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let handle = spawn::ensure_snapshot(&config).expect("missing PNG triggers generation");
    handle.await.expect("background task must not panic");
    assert!(!config.out_path.exists());
}

#[tokio::test]
async fn run_snapshot_bin_reports_missing_binary() {
    let err = spawn::run_snapshot_bin(std::path::Path::new("/definitely/not/here"), Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, SnapshotError::Io(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn run_snapshot_bin_maps_exit_status() {
    assert!(spawn::run_snapshot_bin(std::path::Path::new("/bin/true"), Duration::from_secs(5)).await.is_ok());
    let err = spawn::run_snapshot_bin(std::path::Path::new("/bin/false"), Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, SnapshotError::ChildFailed(_)));
}
