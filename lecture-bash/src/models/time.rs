//! Clock time, academic week and free-time range parsing.
//!
//! Times are fractional hours (`13.5` is 13:30). Academic weeks are the
//! university's numbered weeks of the semester.

use crate::error::{BashError, BashResult};

/// Inclusive free-time window in fractional hours.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FreeInterval {
    start: f64,
    end: f64,
}

impl FreeInterval {
    /// Create a new interval. Fails if `start > end`.
    pub fn new(start: f64, end: f64) -> BashResult<Self> {
        if start > end {
            return Err(BashError::parse(format!(
                "free time ends before it starts ({} > {})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Whether `[time, time + duration]` lies inside this interval.
    pub fn covers(&self, time: f64, duration: f64) -> bool {
        self.start <= time && time + duration <= self.end
    }
}

/// Parse a clock time such as `"13:30"` into fractional hours.
///
/// A trailing seconds part (`"13:30:00"`) is accepted and ignored.
pub fn parse_clock_time(text: &str) -> BashResult<f64> {
    let mut parts = text.split(':');
    let hours = parts.next().unwrap_or_default();
    let minutes = parts
        .next()
        .ok_or_else(|| BashError::parse(format!("clock time '{}' has no ':'", text)))?;

    let hours: f64 = parse_number(hours, text)?;
    let minutes: f64 = parse_number(minutes, text)?;
    Ok(hours + minutes / 60.0)
}

fn parse_number(part: &str, text: &str) -> BashResult<f64> {
    part.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| BashError::parse(format!("clock time '{}' is not numeric", text)))
}

/// Longest week range a single `first-last` item may span.
pub const MAX_WEEK_SPAN: u32 = 60;

/// Expand an academic week expression such as `"3-5,8"` into `[3, 4, 5, 8]`.
///
/// A range wider than [`MAX_WEEK_SPAN`] weeks is rejected.
pub fn parse_academic_weeks(text: &str) -> BashResult<Vec<u32>> {
    let mut weeks = Vec::new();
    for item in text.split(',') {
        match item.split_once('-') {
            None => weeks.push(parse_week(item, text)?),
            Some((first, last)) => {
                let first = parse_week(first, text)?;
                let last = parse_week(last, text)?;
                if last.saturating_sub(first) > MAX_WEEK_SPAN {
                    return Err(BashError::parse(format!(
                        "academic weeks '{}' span more than {} weeks",
                        text, MAX_WEEK_SPAN
                    )));
                }
                weeks.extend(first..=last);
            }
        }
    }
    Ok(weeks)
}

fn parse_week(part: &str, text: &str) -> BashResult<u32> {
    part.trim().parse::<u32>().map_err(|_| {
        BashError::parse(format!("academic weeks '{}' contain '{}'", text, part.trim()))
    })
}

/// Parse a free-time cell such as `"9:00-11:00,14:00-15:30"`.
///
/// Text without any digit (blank, "-", "busy") means no free time recorded.
pub fn parse_free_time_ranges(text: &str) -> BashResult<Vec<FreeInterval>> {
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return Ok(Vec::new());
    }

    text.split(',')
        .map(|range| {
            let (start, end) = range.split_once('-').ok_or_else(|| {
                BashError::parse(format!("free time range '{}' has no '-'", range.trim()))
            })?;
            FreeInterval::new(parse_clock_time(start)?, parse_clock_time(end)?)
        })
        .collect()
}
