// Site usage statistics
//
// `POST /api/s/{site}/stat/report/{interval}.site` with
// `{ attrs, start, end }` (times in milliseconds). Rows come back
// unordered and occasionally duplicated or without a timestamp; they are
// normalized into time-sorted `StatEntry` values.

use reqwest::Method;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error_log::Failure;
use crate::models::{Envelope, StatEntry, TIME_KEY, WAN_RX_KEY, WAN_TX_KEY, normalize_entries};
use crate::session::ApiSession;
use crate::window::{Granularity, TimeWindow};

/// Optional range and attribute selection for a report query.
///
/// Times are seconds since the epoch. See [`TimeWindow::resolve`] for how
/// missing values are filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsQuery {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub attrs: Option<Vec<String>>,
}

impl StatsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: i64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: i64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs = Some(attrs.into_iter().map(Into::into).collect());
        self
    }
}

/// Attribute list sent to the controller: the caller's list (or the WAN
/// byte counters) with `time` always present.
pub fn stat_attributes(attrs: Option<&[String]>) -> Vec<String> {
    let mut list: Vec<String> = match attrs {
        Some(attrs) if !attrs.is_empty() => attrs.to_vec(),
        _ => vec![WAN_TX_KEY.into(), WAN_RX_KEY.into()],
    };
    if !list.iter().any(|a| a == TIME_KEY) {
        list.push(TIME_KEY.into());
    }
    list
}

#[derive(Debug, Serialize)]
struct ReportRequest {
    attrs: Vec<String>,
    start: i64,
    end: i64,
}

impl ApiSession {
    /// Daily buckets; defaults to the current month.
    pub async fn daily_stats(&mut self, query: &StatsQuery) -> Option<Vec<StatEntry>> {
        self.stats(Granularity::Daily, query).await
    }

    /// Hourly buckets; defaults to the last seven days.
    pub async fn hourly_stats(&mut self, query: &StatsQuery) -> Option<Vec<StatEntry>> {
        self.stats(Granularity::Hourly, query).await
    }

    /// 5-minute buckets; defaults to the last day.
    pub async fn minutely_stats(&mut self, query: &StatsQuery) -> Option<Vec<StatEntry>> {
        self.stats(Granularity::FiveMinutes, query).await
    }

    /// Fetch a site report at any granularity.
    ///
    /// `None` means the report could not be retrieved: not logged in, the
    /// request failed, or the controller answered with `rc != "ok"`.
    pub async fn stats(
        &mut self,
        granularity: Granularity,
        query: &StatsQuery,
    ) -> Option<Vec<StatEntry>> {
        if !self.is_authenticated() {
            return None;
        }
        let window = TimeWindow::resolve(granularity, query.start, query.end);
        self.fetch_stats(granularity, window, query.attrs.as_deref())
            .await
    }

    /// Fetch a report for an already resolved window.
    pub async fn fetch_stats(
        &mut self,
        granularity: Granularity,
        window: TimeWindow,
        attrs: Option<&[String]>,
    ) -> Option<Vec<StatEntry>> {
        if !self.is_authenticated() {
            return None;
        }
        let path = granularity.report_path();
        let body = serde_json::to_value(ReportRequest {
            attrs: stat_attributes(attrs),
            start: window.start_ms(),
            end: window.end_ms(),
        })
        .ok()?;
        debug!(path, start = window.start, end = window.end, "fetching site stats");

        let raw = self.site_request(path, Method::POST, Some(&body)).await?;
        if raw.as_object().is_some_and(serde_json::Map::is_empty) {
            self.record_report_failure(path, body, "empty".into(), None);
            return None;
        }

        let envelope = match serde_json::from_value::<Envelope>(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                self.record_report_failure(path, body, "malformed".into(), Some(e.to_string()));
                return None;
            }
        };
        match envelope.meta {
            Some(meta) if meta.is_ok() => {}
            Some(meta) => {
                self.record_report_failure(path, body, meta.rc, meta.msg);
                return None;
            }
            None => {
                self.record_report_failure(path, body, "missing".into(), None);
                return None;
            }
        }
        let rows = envelope.data.len();
        let entries = normalize_entries(envelope.data);
        debug!(rows, entries = entries.len(), "site stats received");
        Some(entries)
    }

    fn record_report_failure(
        &mut self,
        path: &str,
        body: serde_json::Value,
        rc: String,
        msg: Option<String>,
    ) {
        match self.site_url(path) {
            Ok(url) => self.record(&url, Method::POST, Some(body), Failure::Application { rc, msg }),
            Err(e) => warn!(error = %e, path, "report failed and URL could not be rebuilt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_attributes_are_wan_bytes_and_time() {
        assert_eq!(
            stat_attributes(None),
            vec!["wan-tx_bytes", "wan-rx_bytes", "time"]
        );
        assert_eq!(stat_attributes(Some(&[][..])), stat_attributes(None));
    }

    #[test]
    fn time_is_forced_into_custom_attributes() {
        let custom = vec!["num_sta".to_string(), "bytes".to_string()];
        assert_eq!(
            stat_attributes(Some(custom.as_slice())),
            vec!["num_sta", "bytes", "time"]
        );
        let with_time = vec!["time".to_string(), "bytes".to_string()];
        assert_eq!(stat_attributes(Some(with_time.as_slice())), vec!["time", "bytes"]);
    }

    #[test]
    fn query_builder() {
        let q = StatsQuery::new().start(10).end(20).attrs(["bytes"]);
        assert_eq!(q.start, Some(10));
        assert_eq!(q.end, Some(20));
        assert_eq!(q.attrs, Some(vec!["bytes".to_string()]));
    }
}
