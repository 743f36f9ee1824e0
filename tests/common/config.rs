//! Test configuration helpers for mock and live NAS targets

use ds_relay::config::{DownloadConfig, NasConfig};
use ds_relay::{Config, HostRule, Secret};
use std::net::SocketAddr;
use std::time::Duration;

/// Destination used by every mock configuration
pub const TEST_DESTINATION: &str = "MOVIES/Downloads";

/// Error type for test configuration
#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Config error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Plain-HTTP configuration pointing at a local mock NAS
pub fn mock_config(addr: &SocketAddr) -> Config {
    Config {
        nas: NasConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            https: false,
            accept_invalid_certs: false,
            account: "operator".to_string(),
            passphrase: Secret::new("hunter2"),
            session_name: "DownloadStation".to_string(),
            request_timeout: Duration::from_secs(5),
        },
        download: DownloadConfig {
            destination: TEST_DESTINATION.to_string(),
        },
        hosting: Vec::new(),
    }
}

/// [`mock_config`] with extra host rules
pub fn mock_config_with_rules(addr: &SocketAddr, rules: Vec<HostRule>) -> Config {
    let mut config = mock_config(addr);
    config.hosting = rules;
    config
}

/// Load a real NAS configuration from environment variables
///
/// Required environment variables:
/// - `NAS_HOST` - NAS hostname or IP
/// - `NAS_ACCOUNT` - Operator account
/// - `NAS_PASSWORD` - Operator passphrase
/// - `NAS_DESTINATION` - Shared-folder path for new tasks
///
/// Optional environment variables:
/// - `NAS_PORT` - Web API port (default: 5001)
/// - `NAS_HTTPS` - `false` for plain HTTP (default: true)
/// - `NAS_ACCEPT_INVALID_CERTS` - `true` for self-signed NAS certificates
pub fn load_live_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();

    let var = |name: &str| {
        std::env::var(name).map_err(|_| ConfigError(format!("{} not set in environment", name)))
    };
    let flag = |name: &str, default: bool| {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };

    let port: u16 = std::env::var("NAS_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5001);

    Ok(Config {
        nas: NasConfig {
            host: var("NAS_HOST")?,
            port,
            https: flag("NAS_HTTPS", true),
            accept_invalid_certs: flag("NAS_ACCEPT_INVALID_CERTS", false),
            account: var("NAS_ACCOUNT")?,
            passphrase: Secret::new(var("NAS_PASSWORD")?),
            session_name: "DownloadStation".to_string(),
            request_timeout: Duration::from_secs(30),
        },
        download: DownloadConfig {
            destination: var("NAS_DESTINATION")?,
        },
        hosting: Vec::new(),
    })
}

/// Check whether live NAS credentials are available
pub fn has_live_credentials() -> bool {
    load_live_config().is_ok()
}
