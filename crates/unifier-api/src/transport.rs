// HTTP client settings for a controller session.
//
// Controllers usually present self-signed certificates, so accepting any
// certificate is the default and verification is opt-in.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;
use reqwest::cookie::Jar;

use crate::error::Error;

/// How the controller's certificate is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// Against the platform trust store.
    System,
    /// Against an extra root loaded from a PEM file.
    CustomCa(PathBuf),
    /// Not at all.
    DangerAcceptInvalid,
}

impl TlsMode {
    /// Map the plain `ssl_verify` flag onto a mode.
    pub fn from_verify(ssl_verify: bool) -> Self {
        if ssl_verify {
            Self::System
        } else {
            Self::DangerAcceptInvalid
        }
    }

    /// Whether certificates are checked at all.
    pub fn verifies(&self) -> bool {
        !matches!(self, Self::DangerAcceptInvalid)
    }
}

/// Inputs to [`build_client`](Self::build_client).
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(30),
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    /// The client every session request goes through.
    ///
    /// Only the TLS setup can fail: an unreadable or unparsable CA file, or
    /// a backend that rejects the resulting configuration.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("unifier/", env!("CARGO_PKG_VERSION")));
        let builder = self.apply_tls(builder)?;
        let builder = match self.cookie_jar {
            Some(ref jar) => builder.cookie_provider(Arc::clone(jar)),
            None => builder,
        };
        builder
            .build()
            .map_err(|e| Error::Tls(format!("HTTP client setup rejected: {e}")))
    }

    fn apply_tls(&self, builder: ClientBuilder) -> Result<ClientBuilder, Error> {
        match self.tls {
            TlsMode::System => Ok(builder),
            TlsMode::DangerAcceptInvalid => Ok(builder.danger_accept_invalid_certs(true)),
            TlsMode::CustomCa(ref path) => {
                let pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("{}: {e}", path.display())))?;
                let ca = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                    Error::Tls(format!("{} is not a PEM certificate: {e}", path.display()))
                })?;
                Ok(builder.add_root_certificate(ca))
            }
        }
    }

    /// Attach an empty cookie jar; the login cookie lands here.
    pub fn with_cookie_jar(mut self) -> Self {
        self.cookie_jar = Some(Arc::new(Jar::default()));
        self
    }
}
