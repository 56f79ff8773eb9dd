// Session configuration
//
// Immutable connection settings for one controller. Built once by the
// caller (CLI, config crate, tests) and handed to `ApiSession::connect`.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::Error;
use crate::transport::{TlsMode, TransportConfig};

/// Site used when none is given.
pub const DEFAULT_SITE: &str = "default";

/// Port of a standalone Network Application.
pub const DEFAULT_PORT: u16 = 8443;

/// Connection settings for one controller.
///
/// Fields are private: once built, a `SessionConfig` is never mutated.
/// The `with_*` builders consume and return `self`.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    host: String,
    port: u16,
    site: String,
    username: String,
    password: SecretString,
    base_url: Url,
    tls: TlsMode,
    timeout: Duration,
}

impl SessionConfig {
    /// Create a config for `https://{host}:{port}` with default site,
    /// certificate verification disabled, and a 30s timeout.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, Error> {
        let host = host.into();
        let base_url = Url::parse(&format!("https://{host}:{port}"))?;
        Ok(Self {
            host,
            port,
            site: DEFAULT_SITE.into(),
            username: username.into(),
            password,
            base_url,
            tls: TlsMode::DangerAcceptInvalid,
            timeout: TransportConfig::default().timeout,
        })
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    /// Point the session at a different root URL (reverse proxies, tests).
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_ssl_verify(mut self, ssl_verify: bool) -> Self {
        self.tls = TlsMode::from_verify(ssl_verify);
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tls(&self) -> &TlsMode {
        &self.tls
    }

    pub fn ssl_verify(&self) -> bool {
        self.tls.verifies()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Transport settings derived from this config, with a cookie jar
    /// for the login session.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }
}
