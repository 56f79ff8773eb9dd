//! Configuration for the unifier CLI.
//!
//! Layered with figment: built-in defaults, then an optional TOML file,
//! then `UNIFI_*` environment variables (optionally seeded from a `.env`
//! file). The result is translated into an [`unifier_api::SessionConfig`];
//! the API crate itself never reads the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use unifier_api::{DEFAULT_PORT, DEFAULT_SITE, SessionConfig, TlsMode};

/// Keyring service name for stored controller passwords.
pub const KEYRING_SERVICE: &str = "unifier";

/// Default strftime-style format for report timestamps.
pub const DEFAULT_DT_FMT: &str = "%y-%m-%d %H:%M:%S";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing {field}: set it in the config file, the environment, or on the command line")]
    Missing { field: &'static str },

    #[error("no password configured for {user}@{host}")]
    NoCredentials { user: String, host: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error(transparent)]
    Api(#[from] unifier_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Controller connection and display settings.
///
/// Keys match the `UNIFI_*` environment variables with the prefix
/// stripped: `UNIFI_HOST` → `host`, `UNIFI_DT_FMT` → `dt_fmt`, and so on.
/// `UNIFI_PASSWD` is the one exception and lands on `password`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Plaintext password. Prefer the environment or the system keyring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default = "default_site")]
    pub site: String,

    /// Verify the controller's TLS certificate. Off by default since
    /// controllers usually ship self-signed certificates.
    #[serde(default)]
    pub ssl_verify: bool,

    /// Custom CA certificate (implies verification).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Timestamp format for listed report entries.
    #[serde(default = "default_dt_fmt")]
    pub dt_fmt: String,

    /// Full controller URL, replacing `https://{host}:{port}`. For
    /// controllers behind a reverse proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<Url>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
            user: None,
            password: None,
            site: default_site(),
            ssl_verify: false,
            ca_cert: None,
            timeout: default_timeout(),
            dt_fmt: default_dt_fmt(),
            base_url: None,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_site() -> String {
    DEFAULT_SITE.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_dt_fmt() -> String {
    DEFAULT_DT_FMT.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "unifier", "unifier").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("unifier");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load `.env` from the working directory, if there is one.
///
/// Variables already set in the environment win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => debug!(error = %e, "ignoring unreadable .env"),
    }
}

/// The layered figment: defaults ← TOML file ← `UNIFI_*` environment.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("UNIFI_").map(|key| {
            if key == "passwd" {
                "password".into()
            } else {
                key.as_str().into()
            }
        }))
}

/// Load config from `path` (or the platform default) plus environment.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    debug!(path = %path.display(), "loading config");
    Ok(figment(&path).extract()?)
}

// ── Session translation ─────────────────────────────────────────────

impl Config {
    pub fn tls_mode(&self) -> TlsMode {
        match self.ca_cert {
            Some(ref path) => TlsMode::CustomCa(path.clone()),
            None => TlsMode::from_verify(self.ssl_verify),
        }
    }

    /// Resolve the password: explicit value, then the system keyring.
    pub fn resolve_password(&self) -> Result<SecretString, ConfigError> {
        let host = self.host.as_deref().ok_or(ConfigError::Missing { field: "host" })?;
        let user = self.user.as_deref().ok_or(ConfigError::Missing { field: "user" })?;

        if let Some(ref pw) = self.password {
            return Ok(SecretString::from(pw.clone()));
        }

        if let Some(pw) = keyring_password(user, host) {
            return Ok(pw);
        }

        Err(ConfigError::NoCredentials {
            user: user.into(),
            host: host.into(),
        })
    }

    /// Build a [`SessionConfig`], resolving the password through
    /// [`resolve_password`](Self::resolve_password).
    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        let password = self.resolve_password()?;
        self.session_config_with(password)
    }

    /// Build a [`SessionConfig`] with an already known password.
    pub fn session_config_with(&self, password: SecretString) -> Result<SessionConfig, ConfigError> {
        let host = self.host.as_deref().ok_or(ConfigError::Missing { field: "host" })?;
        let user = self.user.as_deref().ok_or(ConfigError::Missing { field: "user" })?;
        if self.site.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "site".into(),
                reason: "must not be empty".into(),
            });
        }

        let mut session = SessionConfig::new(host, self.port, user, password)?
            .with_site(self.site.clone())
            .with_tls(self.tls_mode())
            .with_timeout(Duration::from_secs(self.timeout));
        if let Some(ref base_url) = self.base_url {
            session = session.with_base_url(base_url.clone());
        }
        Ok(session)
    }
}

fn keyring_password(user: &str, host: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{user}@{host}")).ok()?;
    match entry.get_password() {
        Ok(pw) => {
            debug!(user, host, "password found in keyring");
            Some(SecretString::from(pw))
        }
        Err(_) => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::result_large_err)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn full() -> Config {
        Config {
            host: Some("unifi.lan".into()),
            user: Some("admin".into()),
            password: Some("hunter2".into()),
            ..Config::default()
        }
    }

    #[test]
    fn defaults_match_controller_conventions() {
        let cfg = Config::default();
        assert_eq!(cfg.port, 8443);
        assert_eq!(cfg.site, "default");
        assert!(!cfg.ssl_verify);
        assert_eq!(cfg.dt_fmt, "%y-%m-%d %H:%M:%S");
    }

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    host = "file.lan"
                    user = "fileuser"
                    site = "branch"
                    port = 443
                "#,
            )?;
            jail.set_env("UNIFI_HOST", "env.lan");
            jail.set_env("UNIFI_PASSWD", "from-env");
            jail.set_env("UNIFI_DT_FMT", "%Y-%m-%d");

            let cfg = load_config(Some(Path::new("config.toml"))).unwrap();
            assert_eq!(cfg.host.as_deref(), Some("env.lan"));
            assert_eq!(cfg.user.as_deref(), Some("fileuser"));
            assert_eq!(cfg.password.as_deref(), Some("from-env"));
            assert_eq!(cfg.site, "branch");
            assert_eq!(cfg.port, 443);
            assert_eq!(cfg.dt_fmt, "%Y-%m-%d");
            Ok(())
        });
    }

    #[test]
    fn passwd_env_overrides_file_password() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    host = "file.lan"
                    user = "fileuser"
                    password = "from-file"
                "#,
            )?;
            let cfg = load_config(Some(Path::new("config.toml"))).unwrap();
            assert_eq!(cfg.password.as_deref(), Some("from-file"));

            jail.set_env("UNIFI_PASSWD", "from-env");
            let cfg = load_config(Some(Path::new("config.toml"))).unwrap();
            assert_eq!(cfg.password.as_deref(), Some("from-env"));
            assert_eq!(
                cfg.session_config().unwrap().password().expose_secret(),
                "from-env"
            );
            Ok(())
        });
    }

    #[test]
    fn passwd_env_without_file() {
        Jail::expect_with(|jail| {
            jail.set_env("UNIFI_HOST", "unifi.lan");
            jail.set_env("UNIFI_USER", "admin");
            jail.set_env("UNIFI_PASSWD", "hunter2");
            let cfg = load_config(Some(Path::new("absent.toml"))).unwrap();
            assert_eq!(cfg.password.as_deref(), Some("hunter2"));
            Ok(())
        });
    }

    #[test]
    fn missing_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let cfg = load_config(Some(Path::new("nope.toml"))).unwrap();
            assert_eq!(cfg.port, 8443);
            assert_eq!(cfg.site, "default");
            Ok(())
        });
    }

    #[test]
    fn session_config_carries_settings() {
        let cfg = Config {
            site: "branch".into(),
            ssl_verify: true,
            timeout: 5,
            ..full()
        };
        let session = cfg.session_config().unwrap();
        assert_eq!(session.host(), "unifi.lan");
        assert_eq!(session.port(), 8443);
        assert_eq!(session.username(), "admin");
        assert_eq!(session.password().expose_secret(), "hunter2");
        assert_eq!(session.site(), "branch");
        assert!(session.ssl_verify());
        assert_eq!(session.timeout(), Duration::from_secs(5));
        assert_eq!(session.base_url().as_str(), "https://unifi.lan:8443/");
    }

    #[test]
    fn base_url_replaces_host_and_port() {
        Jail::expect_with(|jail| {
            jail.set_env("UNIFI_BASE_URL", "http://127.0.0.1:8080/proxy");
            let cfg = Config {
                base_url: load_config(Some(Path::new("none.toml"))).unwrap().base_url,
                ..full()
            };
            let session = cfg.session_config().unwrap();
            assert_eq!(session.base_url().as_str(), "http://127.0.0.1:8080/proxy");
            assert_eq!(session.host(), "unifi.lan");
            Ok(())
        });
    }

    #[test]
    fn ca_cert_selects_custom_ca() {
        let cfg = Config {
            ca_cert: Some("/etc/unifi/ca.pem".into()),
            ..full()
        };
        assert_eq!(cfg.tls_mode(), TlsMode::CustomCa("/etc/unifi/ca.pem".into()));
    }

    #[test]
    fn missing_host_or_user_is_reported() {
        let cfg = Config {
            host: None,
            ..full()
        };
        assert!(matches!(
            cfg.session_config(),
            Err(ConfigError::Missing { field: "host" })
        ));

        let cfg = Config {
            user: None,
            ..full()
        };
        assert!(matches!(
            cfg.session_config_with("pw".to_string().into()),
            Err(ConfigError::Missing { field: "user" })
        ));
    }

    #[test]
    fn empty_site_is_rejected() {
        let cfg = Config {
            site: "  ".into(),
            ..full()
        };
        assert!(matches!(
            cfg.session_config(),
            Err(ConfigError::Validation { .. })
        ));
    }
}
