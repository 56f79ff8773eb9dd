//! Traffic report handlers.

use chrono::{DateTime, Utc};
use unifier_api::{ApiSession, Granularity, StatsQuery};
use unifier_config::Config;

use crate::cli::{GlobalOpts, StatsArgs};
use crate::error::CliError;
use crate::output;
use crate::report::{self, ReportOptions};

fn label(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Daily => "daily stats",
        Granularity::Hourly => "hourly stats",
        Granularity::FiveMinutes => "5-minute stats",
    }
}

fn parse_time(value: &str, field: &str) -> Result<i64, CliError> {
    if let Ok(ts) = value.parse::<i64>() {
        return Ok(ts);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc).timestamp())
        .map_err(|_| CliError::Validation {
            field: field.into(),
            reason: format!("invalid timestamp '{value}' (use Unix seconds or RFC3339)"),
        })
}

fn parse_time_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(Option<i64>, Option<i64>), CliError> {
    let start_ts = start.map(|s| parse_time(s, "start")).transpose()?;
    let end_ts = end.map(|s| parse_time(s, "end")).transpose()?;
    if let (Some(s), Some(e)) = (start_ts, end_ts) {
        if s > e {
            return Err(CliError::Validation {
                field: "start".into(),
                reason: "start must be <= end".into(),
            });
        }
    }
    Ok((start_ts, end_ts))
}

pub async fn handle(
    session: &mut ApiSession,
    granularity: Granularity,
    args: StatsArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (start, end) = parse_time_range(args.start.as_deref(), args.end.as_deref())?;
    let query = StatsQuery {
        start,
        end,
        attrs: args.attrs,
    };

    let stats = session
        .stats(granularity, &query)
        .await
        .ok_or_else(|| CliError::NoData {
            what: label(granularity).into(),
        })?;

    let time_fmt = args.dt_fmt.as_deref().unwrap_or(&cfg.dt_fmt);
    let out = report::summarize(
        &stats,
        time_fmt,
        ReportOptions {
            json: args.json,
            list: args.list,
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_unix_seconds_and_rfc3339() {
        assert_eq!(parse_time("1700000000", "start").unwrap(), 1_700_000_000);
        assert_eq!(
            parse_time("2023-11-14T22:13:20Z", "start").unwrap(),
            1_700_000_000
        );
        assert_eq!(
            parse_time("2023-11-14T23:13:20+01:00", "end").unwrap(),
            1_700_000_000
        );
    }

    #[test]
    fn rejects_garbage_and_inverted_ranges() {
        assert!(matches!(
            parse_time("yesterday", "start"),
            Err(CliError::Validation { .. })
        ));
        assert!(parse_time_range(Some("20"), Some("10")).is_err());
        assert_eq!(
            parse_time_range(Some("10"), None).unwrap(),
            (Some(10), None)
        );
    }
}
