//! Clap derive structures for the `unifier` CLI.
//!
//! Kept free of crate-internal imports so `build.rs` can include it for
//! man page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// unifier -- WAN traffic reports from a UniFi controller
#[derive(Debug, Parser)]
#[command(
    name = "unifier",
    version,
    about = "Report WAN traffic statistics from a UniFi network controller",
    long_about = "Logs in to a UniFi controller, pulls site statistics reports and\n\
        summarizes upload/download volume in human-readable units.\n\n\
        Settings come from flags, UNIFI_* environment variables (a .env file\n\
        in the working directory is honoured) and the config file.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

/// Connection flags. Each one overrides `UNIFI_*` and the config file.
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller host name or address
    #[arg(long, short = 'H', global = true)]
    pub host: Option<String>,

    /// Controller port [default: 8443]
    #[arg(long, short = 'p', global = true)]
    pub port: Option<u16>,

    /// Controller user name
    #[arg(long, short = 'u', global = true)]
    pub user: Option<String>,

    /// Controller password (prefer UNIFI_PASSWD or the system keyring)
    #[arg(long, short = 'P', visible_aliases = ["pass", "pwd"], global = true)]
    pub password: Option<String>,

    /// Site name [default: default]
    #[arg(long, short = 's', global = true)]
    pub site: Option<String>,

    /// Verify the controller's TLS certificate
    #[arg(long, global = true)]
    pub verify_tls: bool,

    /// Custom CA certificate (PEM); implies --verify-tls
    #[arg(long, global = true, value_name = "PATH")]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Config file to load instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Daily traffic (defaults to the current month)
    Daily(StatsArgs),

    /// Hourly traffic (defaults to the last 7 days)
    Hourly(StatsArgs),

    /// 5-minute traffic (defaults to the last 24 hours)
    #[command(alias = "5m")]
    Minutely(StatsArgs),

    /// Site information keyed by site name
    Sites(SitesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Stats ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Start time (Unix seconds or RFC 3339)
    #[arg(long)]
    pub start: Option<String>,

    /// End time (Unix seconds or RFC 3339) [default: now]
    #[arg(long)]
    pub end: Option<String>,

    /// Attributes to request (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub attrs: Option<Vec<String>>,

    /// Print the raw entries as JSON
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Print one line per time bucket before the total
    #[arg(long, short = 'l')]
    pub list: bool,

    /// strftime-style format for listed timestamps
    #[arg(long, value_name = "FORMAT")]
    pub dt_fmt: Option<String>,
}

// ── Sites ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// Sites visible to the logged-in user
    Simplified(SitesView),

    /// Sites with health and statistics detail
    Detailed(SitesView),
}

#[derive(Debug, Args)]
pub struct SitesView {
    /// Print the site map as JSON
    #[arg(long, short = 'j')]
    pub json: bool,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
