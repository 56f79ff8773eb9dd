mod cli;
mod commands;
mod config;
mod error;
mod output;
mod report;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use unifier_api::{ApiSession, ErrorLog};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.quiet);
    unifier_config::load_dotenv();

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Log to stderr so stdout stays clean for reports and JSON.
fn init_tracing(verbosity: u8, quiet: bool) {
    let filter = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "unifier", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let cfg = config::resolve(&cli.global)?;
            let session_config = config::session_config(&cfg)?;
            let url = session_config.base_url().clone();
            let (user, host) = (
                session_config.username().to_owned(),
                session_config.host().to_owned(),
            );

            let mut session = ApiSession::connect(session_config)
                .await
                .map_err(|e| CliError::connect(e, &url, cfg.timeout))?;
            if !session.is_authenticated() {
                replay_errors(session.errors());
                return Err(CliError::AuthFailed { user, host });
            }

            debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &mut session, &cfg, &cli.global).await;

            if let Err(e) = session.logout().await {
                debug!(error = %e, "logout failed");
            }
            replay_errors(session.errors());
            result
        }
    }
}

fn replay_errors(errors: &ErrorLog) {
    for entry in errors.iter() {
        debug!(
            method = %entry.method,
            url = %entry.url,
            failure = %entry.failure,
            "recorded request failure"
        );
    }
}
