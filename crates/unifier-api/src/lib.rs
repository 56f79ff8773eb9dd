//! Session-backed client for the UniFi controller API.
//!
//! - **[`ApiSession`]** logs in on [`connect`](ApiSession::connect), guards
//!   every data call behind the authenticated state, and records failed
//!   requests in a bounded [`ErrorLog`].
//! - **Statistics**: [`ApiSession::daily_stats`], [`hourly_stats`](ApiSession::hourly_stats)
//!   and [`minutely_stats`](ApiSession::minutely_stats) derive a
//!   [`TimeWindow`] and return time-sorted [`StatEntry`] values.
//! - **Sites**: [`ApiSession::site_info_simplified`] and
//!   [`site_info_detailed`](ApiSession::site_info_detailed), keyed by name
//!   via [`reorganize_site_data`].
//! - **[`HumanizedBytes`]** for presenting byte counters.
//!
//! Expected absence of data is `None`; only faults that prevent talking to
//! the controller at all are an [`Error`].

pub mod config;
pub mod error;
pub mod error_log;
pub mod humanize;
pub mod models;
pub mod reorganize;
pub mod session;
pub mod sites;
pub mod stats;
pub mod transport;
pub mod window;

pub use config::{DEFAULT_PORT, DEFAULT_SITE, SessionConfig};
pub use error::Error;
pub use error_log::{ErrorEntry, ErrorLog, Failure, MAX_ERRORS};
pub use humanize::{HumanizedBytes, humanize_bytes};
pub use models::{StatEntry, TIME_KEY, WAN_RX_KEY, WAN_TX_KEY};
pub use reorganize::reorganize_site_data;
pub use session::ApiSession;
pub use stats::{StatsQuery, stat_attributes};
pub use transport::{TlsMode, TransportConfig};
pub use window::{Granularity, TimeWindow};
