//! Traffic report summarizer.
//!
//! Turns normalized stat entries into either a compact JSON array or a
//! human-readable upload/download summary.

use chrono::format::{Item, StrftimeItems};

use unifier_api::{HumanizedBytes, StatEntry};

use crate::output;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Emit the entries as JSON instead of a summary. Wins over `list`.
    pub json: bool,
    /// Emit one line per entry ahead of the total.
    pub list: bool,
}

/// Render `stats` as a report. Empty input renders as an empty string.
pub fn summarize(stats: &[StatEntry], time_fmt: &str, opts: ReportOptions) -> String {
    if stats.is_empty() {
        return String::new();
    }
    if opts.json {
        return output::render_json_compact(stats);
    }

    let mut lines = Vec::new();
    let (mut up, mut down) = (0.0, 0.0);
    for entry in stats {
        let tx = entry.tx_bytes().unwrap_or_default();
        let rx = entry.rx_bytes().unwrap_or_default();
        up += tx;
        down += rx;
        if opts.list {
            lines.push(format!("{}: {}", format_time(entry, time_fmt), traffic(tx, rx)));
        }
    }
    lines.push(format!("Total: {}", traffic(up, down)));
    lines.join("\n")
}

fn traffic(tx: f64, rx: f64) -> String {
    format!(
        "Up: {}; Down: {}; Total: {}",
        HumanizedBytes::from(tx),
        HumanizedBytes::from(rx),
        HumanizedBytes::from(tx + rx),
    )
}

/// Bucket time in UTC. An unusable format falls back to RFC 3339.
fn format_time(entry: &StatEntry, fmt: &str) -> String {
    let Some(ts) = entry.timestamp() else {
        return entry.time.to_string();
    };
    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return ts.to_rfc3339();
    }
    ts.format(fmt).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;

    const FMT: &str = "%y-%m-%d %H:%M:%S";

    fn entries() -> Vec<StatEntry> {
        vec![
            StatEntry::from_wire(json!({
                "time": 1_700_000_000_000_i64,
                "wan-tx_bytes": 1536,
                "wan-rx_bytes": 512,
            }))
            .unwrap(),
            StatEntry::from_wire(json!({
                "time": 1_700_003_600_000_i64,
                "wan-tx_bytes": 1_048_576,
            }))
            .unwrap(),
        ]
    }

    #[test]
    fn empty_stats_render_nothing() {
        assert_eq!(summarize(&[], FMT, ReportOptions::default()), "");
        let all = ReportOptions {
            json: true,
            list: true,
        };
        assert_eq!(summarize(&[], FMT, all), "");
    }

    #[test]
    fn totals_only_by_default() {
        assert_eq!(
            summarize(&entries(), FMT, ReportOptions::default()),
            "Total: Up: 1.00 MB; Down: 512.00 B; Total: 1.00 MB"
        );
    }

    #[test]
    fn list_prints_each_bucket_then_total() {
        let out = summarize(
            &entries(),
            FMT,
            ReportOptions {
                list: true,
                ..ReportOptions::default()
            },
        );
        assert_eq!(
            out.lines().collect::<Vec<_>>(),
            vec![
                "23-11-14 22:13:20: Up: 1.50 KB; Down: 512.00 B; Total: 2.00 KB",
                "23-11-14 23:13:20: Up: 1.00 MB; Down: 0.00 B; Total: 1.00 MB",
                "Total: Up: 1.00 MB; Down: 512.00 B; Total: 1.00 MB",
            ]
        );
    }

    #[test]
    fn json_wins_over_list() {
        let out = summarize(
            &entries(),
            FMT,
            ReportOptions {
                json: true,
                list: true,
            },
        );
        assert!(!out.contains('\n'));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed,
            json!([
                {"time": 1_700_000_000, "wan-tx_bytes": 1536, "wan-rx_bytes": 512},
                {"time": 1_700_003_600, "wan-tx_bytes": 1_048_576},
            ])
        );
    }

    #[test]
    fn bad_time_format_falls_back_to_rfc3339() {
        let out = summarize(
            &entries()[..1],
            "%Q",
            ReportOptions {
                list: true,
                ..ReportOptions::default()
            },
        );
        assert!(
            out.starts_with("2023-11-14T22:13:20+00:00: Up: 1.50 KB"),
            "{out}"
        );
    }
}
