// Controller response types
//
// Only the handful of fields the client actually reads are typed
// (`meta.rc`, `data`, `time`, the WAN byte counters). Everything else
// passes through as opaque JSON.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Transmitted (upload) bytes on the WAN interface.
pub const WAN_TX_KEY: &str = "wan-tx_bytes";
/// Received (download) bytes on the WAN interface.
pub const WAN_RX_KEY: &str = "wan-rx_bytes";
/// Bucket timestamp. Milliseconds on the wire, seconds in [`StatEntry`].
pub const TIME_KEY: &str = "time";

// ── Response Envelope ────────────────────────────────────────────────

/// The `{ "meta": { "rc": "ok" }, "data": [...] }` wrapper.
///
/// `meta` is optional so that bodies which are not envelopes at all still
/// decode (and are then rejected by the caller).
#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub data: Vec<Value>,
}

/// Metadata from the envelope. `rc` == `"ok"` means success.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Meta {
    pub fn is_ok(&self) -> bool {
        self.rc == "ok"
    }
}

// ── Stat Entry ───────────────────────────────────────────────────────

/// One time bucket of a statistics report.
///
/// `time` is seconds since the epoch, converted from the wire's
/// milliseconds without rounding; all other attributes requested from the
/// controller live in `attrs` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    #[serde(serialize_with = "serialize_seconds")]
    pub time: f64,
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

impl StatEntry {
    /// Convert a raw report row, normalizing `time` from milliseconds to
    /// seconds.
    ///
    /// Returns `None` for rows that are not objects or whose time is
    /// missing, non-numeric, or zero.
    pub fn from_wire(row: Value) -> Option<Self> {
        let Value::Object(mut attrs) = row else {
            return None;
        };
        let millis = attrs.remove(TIME_KEY)?.as_f64()?;
        if millis == 0.0 {
            return None;
        }
        Some(Self {
            time: millis / 1000.0,
            attrs,
        })
    }

    /// Bucket time back in wire milliseconds.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn millis(&self) -> i64 {
        (self.time * 1000.0).round() as i64
    }

    /// Numeric value of an attribute, if present.
    pub fn attr(&self, name: &str) -> Option<f64> {
        self.attrs.get(name).and_then(Value::as_f64)
    }

    pub fn tx_bytes(&self) -> Option<f64> {
        self.attr(WAN_TX_KEY)
    }

    pub fn rx_bytes(&self) -> Option<f64> {
        self.attr(WAN_RX_KEY)
    }

    /// Bucket start as a UTC datetime.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.millis())
    }
}

/// Whole seconds go out as integers, fractional ones as floats.
#[allow(
    clippy::trivially_copy_pass_by_ref,
    clippy::cast_possible_truncation,
    clippy::as_conversions
)]
fn serialize_seconds<S: Serializer>(secs: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if secs.fract() == 0.0 && secs.abs() < MAX_EXACT_SECONDS {
        serializer.serialize_i64(*secs as i64)
    } else {
        serializer.serialize_f64(*secs)
    }
}

/// Above this, `f64` no longer holds every integer exactly.
const MAX_EXACT_SECONDS: f64 = 9_007_199_254_740_992.0;

/// Normalize raw report rows: drop malformed rows, collapse rows sharing
/// the same wire timestamp (the last one wins), and sort ascending by time.
pub fn normalize_entries(rows: impl IntoIterator<Item = Value>) -> Vec<StatEntry> {
    let by_time: BTreeMap<i64, StatEntry> = rows
        .into_iter()
        .filter_map(StatEntry::from_wire)
        .map(|entry| (entry.millis(), entry))
        .collect();
    by_time.into_values().collect()
}
