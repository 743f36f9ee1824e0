//! Configuration types for ds-relay
//!
//! Values arrive already loaded (from a file, the environment, or code); this
//! module only describes their shape, defaults and validation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Default get-token endpoint of the token-exchange file host
pub const DEFAULT_TOKEN_EXCHANGE_ENDPOINT: &str =
    "https://api.1fichier.com/v1/download/get_token.cgi";

/// Main configuration for [`DownloadStation`](crate::DownloadStation)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// NAS connection and operator identity
    pub nas: NasConfig,

    /// Where created tasks land on the NAS
    pub download: DownloadConfig,

    /// Per-host link resolution rules (hosts not listed pass through unchanged)
    #[serde(default)]
    pub hosting: Vec<HostRule>,
}

impl Config {
    /// Check the configuration for values that can never work.
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if self.nas.host.trim().is_empty() {
            return Err(Error::config("nas.host", "NAS host must not be empty"));
        }
        if self.nas.port == 0 {
            return Err(Error::config("nas.port", "NAS port must not be 0"));
        }
        if self.nas.account.trim().is_empty() {
            return Err(Error::config(
                "nas.account",
                "operator account must not be empty",
            ));
        }
        if self.nas.request_timeout.is_zero() {
            return Err(Error::config(
                "nas.request_timeout",
                "request timeout must be greater than zero",
            ));
        }
        if self.download.destination.trim().is_empty() {
            return Err(Error::config(
                "download.destination",
                "destination path must not be empty",
            ));
        }

        let mut seen = HashSet::new();
        for rule in &self.hosting {
            let domain = rule.normalized_domain();
            if domain.is_empty() {
                return Err(Error::config("hosting.domain", "domain must not be empty"));
            }
            // Two rules for one domain would make strategy selection ambiguous
            if !seen.insert(domain.clone()) {
                return Err(Error::config(
                    "hosting.domain",
                    format!("duplicate rule for domain {domain}"),
                ));
            }
        }
        Ok(())
    }
}

/// NAS web API connection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NasConfig {
    /// NAS hostname or IP address
    pub host: String,

    /// Web API port (default: 5001)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Use HTTPS (default: true)
    #[serde(default = "default_true")]
    pub https: bool,

    /// Accept self-signed or otherwise invalid certificates (default: false)
    ///
    /// Many NAS units ship with a self-signed certificate. Turning this on is
    /// an explicit trust decision of the deployment; it is never implied.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Operator account name
    pub account: String,

    /// Operator passphrase
    pub passphrase: Secret,

    /// Session namespace label sent at login (default: "DownloadStation")
    #[serde(default = "default_session_name")]
    pub session_name: String,

    /// Timeout for every HTTP request in seconds (default: 30)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl NasConfig {
    /// Base URL of the web API, e.g. `https://nas.local:5001`
    pub fn base_url(&self) -> String {
        let scheme = if self.https { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

/// Task creation settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Destination folder on the NAS, relative to the shared folder root
    /// (e.g. "MOVIES/Downloads")
    pub destination: String,
}

/// Link resolution rule for one file-hosting domain
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HostRule {
    /// Domain the rule applies to; subdomains match too
    pub domain: String,

    /// How links on this domain become fetchable URIs
    pub strategy: StrategyConfig,
}

impl HostRule {
    pub(crate) fn normalized_domain(&self) -> String {
        self.domain
            .trim()
            .trim_start_matches('.')
            .to_ascii_lowercase()
    }
}

/// Link resolution strategy settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Hand the link to the NAS unchanged
    Passthrough,

    /// Append `auth_user`/`auth_pass` query parameters
    CredentialInjection {
        /// Hosting account user name
        #[serde(default)]
        username: Option<String>,
        /// Hosting account password
        #[serde(default)]
        password: Option<Secret>,
    },

    /// Exchange the link for a direct download URL via the host's API
    TokenExchange {
        /// API endpoint receiving `{"link": ...}`
        #[serde(default = "default_token_exchange_endpoint")]
        endpoint: String,
        /// Bearer API key
        #[serde(default)]
        api_key: Option<Secret>,
    },
}

/// String credential that never shows up in `Debug` output or logs
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a credential
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw credential, for building requests only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

fn default_port() -> u16 {
    5001
}

fn default_true() -> bool {
    true
}

fn default_session_name() -> String {
    "DownloadStation".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_token_exchange_endpoint() -> String {
    DEFAULT_TOKEN_EXCHANGE_ENDPOINT.to_string()
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
