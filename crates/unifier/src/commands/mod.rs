//! Command dispatch.

pub mod sites;
pub mod stats;

use unifier_api::{ApiSession, Granularity};
use unifier_config::Config;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a controller-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    session: &mut ApiSession,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Daily(args) => stats::handle(session, Granularity::Daily, args, cfg, global).await,
        Command::Hourly(args) => {
            stats::handle(session, Granularity::Hourly, args, cfg, global).await
        }
        Command::Minutely(args) => {
            stats::handle(session, Granularity::FiveMinutes, args, cfg, global).await
        }
        Command::Sites(args) => sites::handle(session, args, global).await,
        // Answered before any connection is made.
        Command::Completions(_) => Ok(()),
    }
}
