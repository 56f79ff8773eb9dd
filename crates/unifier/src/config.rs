//! Global flags layered over the loaded [`Config`], and the interactive
//! password fallback.

use std::io::IsTerminal;

use secrecy::SecretString;
use tracing::debug;

use unifier_api::SessionConfig;
use unifier_config::{Config, ConfigError};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load file + environment config, then apply command-line overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = unifier_config::load_config(global.config.as_deref())?;
    apply_overrides(&mut cfg, global);
    Ok(cfg)
}

fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref host) = global.host {
        cfg.host = Some(host.clone());
    }
    if let Some(port) = global.port {
        cfg.port = port;
    }
    if let Some(ref user) = global.user {
        cfg.user = Some(user.clone());
    }
    if let Some(ref password) = global.password {
        cfg.password = Some(password.clone());
    }
    if let Some(ref site) = global.site {
        cfg.site.clone_from(site);
    }
    if global.verify_tls {
        cfg.ssl_verify = true;
    }
    if let Some(ref ca_cert) = global.ca_cert {
        cfg.ca_cert = Some(ca_cert.clone());
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
}

/// Build the session config, prompting for the password on a terminal when
/// neither the flags, the environment, nor the keyring supply one.
pub fn session_config(cfg: &Config) -> Result<SessionConfig, CliError> {
    match cfg.session_config() {
        Ok(session) => Ok(session),
        Err(ConfigError::NoCredentials { user, host }) if std::io::stdin().is_terminal() => {
            debug!(%user, %host, "prompting for password");
            let password = rpassword::prompt_password(format!("Password for {user}@{host}: "))?;
            Ok(cfg.session_config_with(SecretString::from(password))?)
        }
        Err(e) => Err(e.into()),
    }
}
