//! CLI error types with miette diagnostics.
//!
//! Maps API and config errors into user-facing errors with actionable help
//! text and a fixed exit code.

use miette::Diagnostic;
use thiserror::Error;

use unifier_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NO_DATA: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(unifier::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: unifier_api::Error,
    },

    #[error("Could not set up TLS: {reason}")]
    #[diagnostic(
        code(unifier::tls_error),
        help("Check the --ca-cert path, or drop --verify-tls for self-signed controllers.")
    )]
    TlsError { reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(unifier::timeout),
        help("Increase the timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Login rejected for {user}@{host}")]
    #[diagnostic(
        code(unifier::auth_failed),
        help("Verify the user name and password. Run with -vv to see the controller's reply.")
    )]
    AuthFailed { user: String, host: String },

    #[error("No password available for {user}@{host}")]
    #[diagnostic(
        code(unifier::no_credentials),
        help(
            "Pass --password, set UNIFI_PASSWD, or store it in the system keyring\n\
             (service \"unifier\", account \"{user}@{host}\")."
        )
    )]
    NoCredentials { user: String, host: String },

    // ── Data ─────────────────────────────────────────────────────────

    #[error("The controller returned no {what}")]
    #[diagnostic(
        code(unifier::no_data),
        help("Run with -vv to see the failed requests.")
    )]
    NoData { what: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("No {field} configured")]
    #[diagnostic(
        code(unifier::missing_setting),
        help("Pass --{field}, set UNIFI_{env}, or add `{field}` to {path}")
    )]
    MissingSetting {
        field: &'static str,
        env: String,
        path: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(unifier::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(unifier::config))]
    Config(Box<figment::Error>),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NoData { .. } => exit_code::NO_DATA,
            Self::MissingSetting { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::Config(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }

    /// Classify a failure to reach the controller at `url`.
    pub fn connect(err: unifier_api::Error, url: &url::Url, timeout_secs: u64) -> Self {
        match err {
            unifier_api::Error::Tls(reason) => Self::TlsError { reason },
            unifier_api::Error::InvalidUrl(e) => Self::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            err if err.is_timeout() => Self::Timeout {
                seconds: timeout_secs,
            },
            source => Self::ConnectionFailed {
                url: url.to_string(),
                source,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Missing { field } => Self::MissingSetting {
                field,
                env: field.to_uppercase(),
                path: unifier_config::config_path().display().to_string(),
            },
            ConfigError::NoCredentials { user, host } => Self::NoCredentials { user, host },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Api(unifier_api::Error::InvalidUrl(e)) => Self::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            ConfigError::Api(unifier_api::Error::Tls(reason)) => Self::TlsError { reason },
            ConfigError::Api(source) => Self::ConnectionFailed {
                url: "(controller)".into(),
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_category() {
        assert_eq!(
            CliError::NoData {
                what: "daily stats".into()
            }
            .exit_code(),
            4
        );
        assert_eq!(
            CliError::AuthFailed {
                user: "admin".into(),
                host: "unifi.lan".into()
            }
            .exit_code(),
            3
        );
        assert_eq!(
            CliError::Validation {
                field: "start".into(),
                reason: "bad".into()
            }
            .exit_code(),
            2
        );
    }

    #[test]
    fn missing_config_field_names_env_var() {
        let err = CliError::from(ConfigError::Missing { field: "host" });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        match err {
            CliError::MissingSetting { field, env, .. } => {
                assert_eq!(field, "host");
                assert_eq!(env, "HOST");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
