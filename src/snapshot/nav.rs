//! Synthetic fund NAV series.

use rand::Rng;
use time::{Date, Month};

use super::SnapshotError;

pub const PRODUCT_TITLE: &str = "上银理财“双周利”系列开放式(14天)理财产品WPTK24D1404期";
pub const BASE_NAV: f64 = 1.0;
pub const VOLATILITY: f64 = 0.006;
pub const NAV_FLOOR: f64 = 0.6;
pub const MA_WINDOW: usize = 20;

/// Daily NAV values with their trailing moving average.
#[derive(Debug, Clone)]
pub struct NavSeries {
    pub dates: Vec<Date>,
    pub nav: Vec<f64>,
    pub ma: Vec<f64>,
}

impl NavSeries {
    /// Fresh random series over the product's publication window.
    ///
    /// # Errors
    ///
    /// Only if the built-in date bounds are invalid.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, SnapshotError> {
        let (start, end) = publication_window()?;
        let dates = date_range(start, end);
        let nav = random_walk(dates.len(), BASE_NAV, VOLATILITY, rng);
        let ma = moving_average(&nav, MA_WINDOW);
        Ok(Self { dates, nav, ma })
    }

    #[must_use]
    pub fn range_text(&self) -> String {
        match (self.dates.first(), self.dates.last()) {
            (Some(first), Some(last)) => format!("净值日期：{} ~ {}", format_date(*first), format_date(*last)),
            _ => String::new(),
        }
    }

    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        mean(&self.nav)
    }
}

/// Inclusive bounds of the charted period.
///
/// # Errors
///
/// Propagates an invalid calendar date.
pub fn publication_window() -> Result<(Date, Date), SnapshotError> {
    Ok((
        Date::from_calendar_date(2024, Month::May, 12)?,
        Date::from_calendar_date(2025, Month::May, 27)?,
    ))
}

/// Every calendar day from `start` to `end`, inclusive.
#[must_use]
pub fn date_range(start: Date, end: Date) -> Vec<Date> {
    let mut out = Vec::new();
    let mut day = Some(start);
    while let Some(d) = day.filter(|d| *d <= end) {
        out.push(d);
        day = d.next_day();
    }
    out
}

/// Multiplicative random walk, floored near `NAV_FLOOR`, rounded to 4dp.
pub fn random_walk<R: Rng + ?Sized>(len: usize, base: f64, volatility: f64, rng: &mut R) -> Vec<f64> {
    let mut value = base;
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        value *= 1.0 + (rng.random::<f64>() - 0.5) * volatility;
        if value < NAV_FLOOR {
            value = NAV_FLOOR + rng.random::<f64>() * 0.05;
        }
        out.push(round4(value));
    }
    out
}

/// Trailing mean; the first `window - 1` points average what is available.
#[must_use]
pub fn moving_average(data: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..data.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean(&data[start..=i]).map_or(0.0, round4)
        })
        .collect()
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

#[must_use]
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[must_use]
pub fn format_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

/// `YYYY-MM` on the first day of a month, nothing otherwise.
#[must_use]
pub fn month_label(date: Date) -> Option<String> {
    (date.day() == 1).then(|| format!("{:04}-{:02}", date.year(), u8::from(date.month())))
}
