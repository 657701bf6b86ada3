//! SVG markup for the NAV chart.

use std::fmt::Write as _;

use super::nav::{NavSeries, PRODUCT_TITLE, month_label};

const GRID_LEFT: f64 = 60.0;
const GRID_RIGHT: f64 = 40.0;
const GRID_TOP: f64 = 70.0;
const GRID_BOTTOM: f64 = 70.0;
const Y_TICKS: usize = 5;

const NAV_COLOR: &str = "#1f3a8a";
const MA_COLOR: &str = "#6b7280";
const AXIS_TEXT: &str = "#374151";
const FONT_STACK: &str =
    "'Noto Sans SC', 'PingFang SC', 'Microsoft YaHei', 'Segoe UI', Roboto, Helvetica, Arial, sans-serif";

pub const NAV_LEGEND: &str = "单位净值 (NAV)";
pub const MA_LEGEND: &str = "MA20";

/// Maps series index and value to canvas coordinates.
struct Plot {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    count: usize,
    min: f64,
    max: f64,
}

impl Plot {
    #[allow(clippy::cast_precision_loss)]
    fn x(&self, index: usize) -> f64 {
        let band = self.width / self.count.max(1) as f64;
        self.left + band * (index as f64 + 0.5)
    }

    fn y(&self, value: f64) -> f64 {
        let span = (self.max - self.min).max(f64::EPSILON);
        self.top + self.height * (1.0 - (value - self.min) / span)
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn polyline(&self, values: &[f64]) -> String {
        let mut d = String::new();
        for (i, v) in values.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{:.2},{:.2} ", self.x(i), self.y(*v));
        }
        d.trim_end().to_string()
    }
}

/// Value bounds padded by 5% so the line never touches the frame.
fn padded_bounds(series: &NavSeries) -> (f64, f64) {
    let values = series.nav.iter().chain(series.ma.iter()).copied();
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(0.001);
    (lo - pad, hi + pad)
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render `series` as a standalone SVG document of `width`×`height`.
#[must_use]
#[allow(clippy::too_many_lines, clippy::cast_precision_loss)]
pub fn nav_chart_svg(series: &NavSeries, width: u32, height: u32) -> String {
    let w = f64::from(width);
    let h = f64::from(height);
    let (min, max) = padded_bounds(series);
    let plot = Plot {
        left: GRID_LEFT,
        top: GRID_TOP,
        width: (w - GRID_LEFT - GRID_RIGHT).max(1.0),
        height: (h - GRID_TOP - GRID_BOTTOM).max(1.0),
        count: series.nav.len(),
        min,
        max,
    };

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="{FONT_STACK}">"#
    );
    let _ = writeln!(
        svg,
        r#"<defs><linearGradient id="navArea" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="{NAV_COLOR}" stop-opacity="0.06"/><stop offset="1" stop-color="{NAV_COLOR}" stop-opacity="0"/></linearGradient></defs>"#
    );
    let _ = writeln!(svg, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##);

    // Title block.
    let _ = writeln!(
        svg,
        r##"<text x="20" y="30" font-size="16" font-weight="600" fill="#0f172a">{}</text>"##,
        escape_xml(PRODUCT_TITLE)
    );
    let _ = writeln!(
        svg,
        r##"<text x="20" y="52" font-size="12" fill="#475569">{}</text>"##,
        escape_xml(&series.range_text())
    );

    // Legend, anchored top-right.
    let legend_y = 26.0;
    for (offset, label, color, dash) in [(230.0, NAV_LEGEND, NAV_COLOR, ""), (80.0, MA_LEGEND, MA_COLOR, r#" stroke-dasharray="5 3""#)]
    {
        let x = w - 20.0 - offset;
        let _ = writeln!(
            svg,
            r##"<line x1="{x:.1}" y1="{legend_y:.1}" x2="{:.1}" y2="{legend_y:.1}" stroke="{color}" stroke-width="3"{dash}/><text x="{:.1}" y="{:.1}" font-size="12" fill="#111827">{}</text>"##,
            x + 25.0,
            x + 31.0,
            legend_y + 4.0,
            escape_xml(label)
        );
    }

    // Y axis: split lines and 4dp labels.
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle" fill="{AXIS_TEXT}">单位净值</text>"#,
        plot.left,
        plot.top - 12.0
    );
    for i in 0..Y_TICKS {
        let value = min + (max - min) * i as f64 / (Y_TICKS - 1) as f64;
        let y = plot.y(value);
        let _ = writeln!(
            svg,
            r##"<line x1="{:.1}" y1="{y:.2}" x2="{:.1}" y2="{y:.2}" stroke="#e5e7eb"/><text x="{:.1}" y="{:.2}" font-size="11" text-anchor="end" fill="{AXIS_TEXT}">{value:.4}</text>"##,
            plot.left,
            plot.left + plot.width,
            plot.left - 6.0,
            y + 4.0
        );
    }

    // X axis with month labels on the first of each month.
    let axis_y = plot.bottom();
    let _ = writeln!(
        svg,
        r##"<line x1="{:.1}" y1="{axis_y:.1}" x2="{:.1}" y2="{axis_y:.1}" stroke="#cbd5e1"/>"##,
        plot.left,
        plot.left + plot.width
    );
    for (i, date) in series.dates.iter().enumerate() {
        if let Some(label) = month_label(*date) {
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.1}" font-size="11" text-anchor="middle" fill="{AXIS_TEXT}">{label}</text>"#,
                plot.x(i),
                axis_y + 22.0
            );
        }
    }

    if series.nav.is_empty() {
        svg.push_str("</svg>\n");
        return svg;
    }

    // NAV area + line, MA dashed line.
    let nav_path = plot.polyline(&series.nav);
    let last = series.nav.len() - 1;
    let _ = writeln!(
        svg,
        r#"<path d="{nav_path} L{:.2},{axis_y:.2} L{:.2},{axis_y:.2} Z" fill="url(#navArea)" stroke="none"/>"#,
        plot.x(last),
        plot.x(0)
    );
    let _ = writeln!(
        svg,
        r#"<path d="{nav_path}" fill="none" stroke="{NAV_COLOR}" stroke-width="2" stroke-linejoin="round"/>"#
    );
    let _ = writeln!(
        svg,
        r#"<path d="{}" fill="none" stroke="{MA_COLOR}" stroke-width="2" stroke-dasharray="6 4" stroke-linejoin="round"/>"#,
        plot.polyline(&series.ma)
    );

    // Mean reference line.
    if let Some(avg) = series.mean() {
        let y = plot.y(avg);
        let _ = writeln!(
            svg,
            r##"<line x1="{:.1}" y1="{y:.2}" x2="{:.1}" y2="{y:.2}" stroke="#9ca3af" stroke-dasharray="4 4"/><text x="{:.1}" y="{:.2}" font-size="11" fill="#6b7280">均值 {avg:.4}</text>"##,
            plot.left,
            plot.left + plot.width,
            plot.left + plot.width - 70.0,
            y - 4.0
        );
    }

    // Latest value marker.
    let (lx, ly) = (plot.x(last), plot.y(series.nav[last]));
    let _ = writeln!(
        svg,
        r##"<circle cx="{lx:.2}" cy="{ly:.2}" r="4" fill="{NAV_COLOR}"/><rect x="{:.2}" y="{:.2}" width="96" height="18" rx="3" fill="#f3f4f6" stroke="#e5e7eb"/><text x="{:.2}" y="{:.2}" font-size="11" fill="#111827">最新: {:.4}</text>"##,
        lx - 100.0,
        ly - 30.0,
        lx - 94.0,
        ly - 17.0,
        series.nav[last]
    );

    svg.push_str("</svg>\n");
    svg
}
