// Report granularities and query time windows
//
// The report endpoints reject end timestamps that are not on an hour
// boundary, so every window is shaved back to the hour before a default
// lookback is applied.

use chrono::{Datelike, Local, NaiveDate, TimeZone, Utc};

const HOUR: i64 = 3600;
const DAY: i64 = 24 * HOUR;

/// Time-bucket size of a statistics report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Daily,
    Hourly,
    /// 5-minute buckets.
    FiveMinutes,
}

impl Granularity {
    /// Site-scoped report path for this granularity.
    pub fn report_path(self) -> &'static str {
        match self {
            Self::Daily => "stat/report/daily.site",
            Self::Hourly => "stat/report/hourly.site",
            Self::FiveMinutes => "stat/report/5minutes.site",
        }
    }

    /// Default window start for a (shaved) `end`, in seconds.
    ///
    /// - daily: midnight on the first day of `end`'s month in `tz`
    /// - hourly: seven days back
    /// - 5-minute: one day back
    pub fn default_start<Tz: TimeZone>(self, end: i64, tz: &Tz) -> i64 {
        match self {
            Self::Daily => month_start(end, tz).unwrap_or(end - 31 * DAY),
            Self::Hourly => end - 7 * DAY,
            Self::FiveMinutes => end - DAY,
        }
    }
}

/// Midnight on the first of the month containing `ts`, in `tz`.
fn month_start<Tz: TimeZone>(ts: i64, tz: &Tz) -> Option<i64> {
    let local = tz.timestamp_opt(ts, 0).earliest()?;
    let first = NaiveDate::from_ymd_opt(local.year(), local.month(), 1)?.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&first)
        .earliest()
        .map(|dt| dt.timestamp())
}

/// Resolved query window in seconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    /// Resolve against the wall clock and the local time zone.
    pub fn resolve(granularity: Granularity, start: Option<i64>, end: Option<i64>) -> Self {
        Self::resolve_at(granularity, start, end, Utc::now().timestamp(), &Local)
    }

    /// Resolve a caller's optional range:
    ///
    /// 1. a missing or non-positive `end` becomes `now`;
    /// 2. `end` is shaved down to the hour;
    /// 3. a missing `start`, or one not before `end`, gets the
    ///    granularity's default lookback.
    pub fn resolve_at<Tz: TimeZone>(
        granularity: Granularity,
        start: Option<i64>,
        end: Option<i64>,
        now: i64,
        tz: &Tz,
    ) -> Self {
        let end = end.filter(|e| *e > 0).unwrap_or(now);
        let end = end - end.rem_euclid(HOUR);
        let start = match start {
            Some(s) if s < end => s,
            _ => granularity.default_start(end, tz),
        };
        Self { start, end }
    }

    /// Window start in milliseconds (the wire unit).
    pub fn start_ms(&self) -> i64 {
        self.start.saturating_mul(1000)
    }

    /// Window end in milliseconds (the wire unit).
    pub fn end_ms(&self) -> i64 {
        self.end.saturating_mul(1000)
    }
}
