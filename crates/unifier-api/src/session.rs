// Authenticated controller session
//
// Owns the HTTP client, the immutable `SessionConfig`, the `authenticated`
// flag, and the bounded error log. Endpoint groups (stats, sites) are
// implemented as inherent methods in their own modules.
//
// Failure policy: transport faults during login propagate as `Error`;
// everything else is recorded in the error log and surfaces as `None`.

use reqwest::Method;
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::config::SessionConfig;
use crate::error::Error;
use crate::error_log::{ErrorEntry, ErrorLog, Failure};

const REDACTED: &str = "********";

/// One authenticated connection context to a single controller.
pub struct ApiSession {
    config: SessionConfig,
    http: reqwest::Client,
    authenticated: bool,
    errors: ErrorLog,
}

impl ApiSession {
    /// Build the HTTP client and log in.
    ///
    /// Fails only when the controller cannot be reached (or the client
    /// cannot be built). Rejected credentials still produce a session,
    /// one whose [`is_authenticated`](Self::is_authenticated) is `false`.
    pub async fn connect(config: SessionConfig) -> Result<Self, Error> {
        let http = config.transport().build_client()?;
        let mut session = Self::with_client(config, http);
        session.login().await?;
        Ok(session)
    }

    /// Wrap a pre-built `reqwest::Client` without logging in.
    ///
    /// The client must carry a cookie store for the login session to stick.
    pub fn with_client(config: SessionConfig, http: reqwest::Client) -> Self {
        if !config.ssl_verify() {
            warn!(
                host = config.host(),
                "TLS certificate verification disabled"
            );
        }
        Self {
            config,
            http,
            authenticated: false,
            errors: ErrorLog::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Failed requests recorded so far, oldest first.
    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    // ── Authentication ────────────────────────────────────────────────

    /// `POST /api/login` with the configured credentials.
    ///
    /// Returns the resulting authenticated state. A non-success status is
    /// recorded and yields `Ok(false)`; a transport fault is recorded and
    /// returned as `Err`.
    pub async fn login(&mut self) -> Result<bool, Error> {
        let url = self.api_url("login")?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": self.config.username(),
            "password": self.config.password().expose_secret(),
        });
        let logged = json!({
            "username": self.config.username(),
            "password": REDACTED,
        });

        let resp = match self.http.post(url.clone()).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                self.authenticated = false;
                self.record(&url, Method::POST, Some(logged), Failure::Transport(e.to_string()));
                return Err(Error::Transport(e));
            }
        };

        let status = resp.status();
        if status.is_success() {
            debug!("login successful");
            self.authenticated = true;
        } else {
            let body = resp.text().await.unwrap_or_default();
            self.authenticated = false;
            self.record(
                &url,
                Method::POST,
                Some(logged),
                Failure::Status {
                    status: status.as_u16(),
                    body,
                },
            );
        }
        Ok(self.authenticated)
    }

    /// `POST /api/logout` and drop the authenticated state.
    ///
    /// Does nothing when not logged in.
    pub async fn logout(&mut self) -> Result<(), Error> {
        if !self.authenticated {
            return Ok(());
        }
        let url = self.api_url("logout")?;
        debug!("logging out at {}", url);
        self.authenticated = false;

        let resp = self
            .http
            .post(url.clone())
            .send()
            .await
            .map_err(Error::Transport)?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            self.record(&url, Method::POST, None, Failure::Status { status, body });
        }
        debug!("logout complete");
        Ok(())
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Controller-level URL: `{base}/api/{path}`.
    pub fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.config.base_url().as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    /// Site-scoped URL: `{base}/api/s/{site}/{path}`.
    pub fn site_url(&self, path: &str) -> Result<Url, Error> {
        self.api_url(&format!("s/{}/{path}", self.config.site()))
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Issue an authenticated GET (for `Method::GET`) or POST (anything
    /// else) and return the decoded body.
    ///
    /// Returns `None` without touching the network when not logged in, and
    /// when the request fails in transit. A body that is not JSON decodes
    /// as an empty object. Non-success statuses are recorded but the body
    /// is still returned; deciding whether it is usable is up to the caller.
    pub async fn request(
        &mut self,
        url: Url,
        method: Method,
        payload: Option<&Value>,
    ) -> Option<Value> {
        if !self.authenticated {
            debug!(%url, "not logged in, skipping request");
            return None;
        }
        debug!("{} {}", method, url);

        let mut builder = if method == Method::GET {
            self.http.get(url.clone())
        } else {
            self.http.post(url.clone())
        };
        if let Some(body) = payload {
            builder = builder.json(body);
        }

        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                self.record(&url, method, payload.cloned(), Failure::Transport(e.to_string()));
                return None;
            }
        };

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let data: Value =
            serde_json::from_str(&text).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        if !status.is_success() {
            self.record(
                &url,
                method,
                payload.cloned(),
                Failure::Status {
                    status: status.as_u16(),
                    body: text,
                },
            );
        }
        Some(data)
    }

    /// [`request`](Self::request) against a controller-level path.
    pub async fn api_request(
        &mut self,
        path: &str,
        method: Method,
        payload: Option<&Value>,
    ) -> Option<Value> {
        let url = self.resolve(self.api_url(path))?;
        self.request(url, method, payload).await
    }

    /// [`request`](Self::request) against a site-scoped path.
    pub async fn site_request(
        &mut self,
        path: &str,
        method: Method,
        payload: Option<&Value>,
    ) -> Option<Value> {
        let url = self.resolve(self.site_url(path))?;
        self.request(url, method, payload).await
    }

    fn resolve(&self, url: Result<Url, Error>) -> Option<Url> {
        match url {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, site = self.config.site(), "could not build request URL");
                None
            }
        }
    }

    /// Append to the error log.
    pub(crate) fn record(
        &mut self,
        url: &Url,
        method: Method,
        payload: Option<Value>,
        failure: Failure,
    ) {
        warn!(%url, %method, %failure, "request failed");
        self.errors.push(ErrorEntry {
            url: url.to_string(),
            method,
            payload,
            failure,
        });
    }
}

impl std::fmt::Debug for ApiSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSession")
            .field("base_url", &self.config.base_url().as_str())
            .field("site", &self.config.site())
            .field("authenticated", &self.authenticated)
            .field("errors", &self.errors.len())
            .finish_non_exhaustive()
    }
}
