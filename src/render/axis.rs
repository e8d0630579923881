//! Date and value axis ticks.

use chrono::{Datelike, Months, NaiveDate};

/// Candidate spacings, in months, for major date ticks.
const MONTH_STEPS: &[u32] = &[1, 2, 3, 4, 6, 12, 24];
pub const MAX_MAJOR_TICKS: usize = 7;
pub const MAJOR_LABEL_FORMAT: &str = "%Y-%m";

#[derive(Debug, Clone, PartialEq)]
pub struct DateTick {
    pub date: NaiveDate,
    pub x: f64,
    pub label: String,
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Days since 1970-01-01.
pub fn date_to_ordinal(date: NaiveDate) -> f64 {
    date.signed_duration_since(unix_epoch()).num_days() as f64
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Every first-of-month date inside `[start, end]`.
pub fn month_starts(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    if end < start {
        return out;
    }
    let mut cursor = first_of_month(start);
    if cursor < start {
        cursor = match cursor.checked_add_months(Months::new(1)) {
            Some(next) => next,
            None => return out,
        };
    }
    while cursor <= end {
        out.push(cursor);
        cursor = match cursor.checked_add_months(Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    out
}

/// Minor ticks: one per month boundary.
pub fn minor_ticks(start: NaiveDate, end: NaiveDate) -> Vec<f64> {
    month_starts(start, end).into_iter().map(date_to_ordinal).collect()
}

/// Major ticks on month boundaries aligned to the smallest step that keeps
/// the count within [`MAX_MAJOR_TICKS`].
///
/// Spans without a month boundary get a single tick at `start`.
pub fn major_ticks(start: NaiveDate, end: NaiveDate) -> Vec<DateTick> {
    let months = month_starts(start, end);
    if months.is_empty() {
        return vec![tick(start)];
    }

    let aligned = |step: u32| -> Vec<NaiveDate> {
        months
            .iter()
            .copied()
            .filter(|d| (d.year() as i64 * 12 + d.month0() as i64) % step as i64 == 0)
            .collect()
    };

    let chosen = MONTH_STEPS
        .iter()
        .map(|step| aligned(*step))
        .find(|dates| !dates.is_empty() && dates.len() <= MAX_MAJOR_TICKS)
        .unwrap_or_else(|| {
            // Very long spans: thin the widest step evenly.
            let widest = aligned(MONTH_STEPS[MONTH_STEPS.len() - 1]);
            let stride = widest.len().div_ceil(MAX_MAJOR_TICKS).max(1);
            widest.into_iter().step_by(stride).collect()
        });

    let chosen = if chosen.is_empty() { vec![months[0]] } else { chosen };
    chosen.into_iter().map(tick).collect()
}

fn tick(date: NaiveDate) -> DateTick {
    DateTick {
        date,
        x: date_to_ordinal(date),
        label: date.format(MAJOR_LABEL_FORMAT).to_string(),
    }
}

/// Spans narrower than this fraction of the larger bound are treated as flat.
pub const FLAT_RELATIVE_SPAN: f64 = 1e-9;

/// True when `[min, max]` is too narrow to subdivide.
pub fn is_flat(min: f64, max: f64) -> bool {
    max - min <= min.abs().max(max.abs()) * FLAT_RELATIVE_SPAN
}

/// Round, evenly spaced ticks covering `[min, max]`, about `target` of them.
///
/// Never returns more than `target * 4` ticks.
pub fn value_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || target == 0 || is_flat(min, max) {
        return vec![min];
    }
    let raw = (max - min) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let step = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    } * magnitude;

    let first = (min / step).ceil() * step;
    let limit = max + step * 1e-9;
    (0..target * 4)
        .map(|i| first + i as f64 * step)
        .take_while(|v| *v <= limit)
        .collect()
}
