//! Time handling for forecast runs and valid times.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// A forecast valid time paired with the run that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForecastTime {
    /// Model run/reference time
    pub run: DateTime<Utc>,
    /// Valid time of the forecast step
    pub valid: DateTime<Utc>,
}

impl ForecastTime {
    pub fn new(run: DateTime<Utc>, valid: DateTime<Utc>) -> Self {
        Self { run, valid }
    }

    /// Build from a run time and an offset in hours.
    pub fn from_offset(run: DateTime<Utc>, hours: i64) -> Self {
        Self {
            run,
            valid: run + Duration::hours(hours),
        }
    }

    /// Whole hours elapsed between the run and the valid time.
    pub fn cum_hour(&self) -> i64 {
        (self.valid - self.run).num_hours()
    }

    /// Label shown in the forecast-time annotation.
    pub fn valid_label(&self) -> String {
        format!("Valid {}", self.valid.format("%A %d %b %Y at %H UTC"))
    }

    /// Label shown in the run annotation.
    pub fn run_label(&self) -> String {
        format!("Run {}", self.run.format("%Y%m%d %H UTC"))
    }
}

/// Parse an ISO 8601 timestamp, assuming UTC when no offset is given.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, ForecastError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(&format!("{}T00:00:00", s), "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(ForecastError::InvalidTime(s.to_string()))
}

/// Parse CF-style time units such as `hours since 2024-01-15 00:00:00`.
///
/// Returns the epoch and the length of one unit in seconds.
pub fn parse_cf_time_units(units: &str) -> Result<(DateTime<Utc>, i64), ForecastError> {
    let (unit, epoch) = units
        .split_once(" since ")
        .ok_or_else(|| ForecastError::InvalidTime(units.to_string()))?;

    let seconds = match unit.trim().to_lowercase().as_str() {
        "seconds" | "second" | "s" => 1,
        "minutes" | "minute" | "min" => 60,
        "hours" | "hour" | "h" => 3600,
        "days" | "day" | "d" => 86_400,
        _ => return Err(ForecastError::InvalidTime(units.to_string())),
    };

    // Some writers append a "UTC" or "Z" suffix after a space
    let epoch = epoch.trim().trim_end_matches(" UTC").trim_end_matches('Z');
    Ok((parse_datetime(epoch)?, seconds))
}

/// Format elapsed seconds as HH:MM:SS for the end-of-run log line.
pub fn format_elapsed(elapsed: std::time::Duration) -> String {
    let total = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
