//! # ds-relay
//!
//! Integration layer between a chat command interface and a NAS-hosted
//! Download Station.
//!
//! ## What it does
//!
//! - **Submit** - resolves a link (passthrough, credential injection, or a
//!   file host's token exchange) and creates a download task on the NAS
//! - **Report** - fetches the task list and renders a short, per-state
//!   progress summary for a chat message
//! - **Sessions** - logs in once, shares the session between commands and
//!   renews it once when the NAS reports expiry
//!
//! Both entry points always return a displayable string; transport, decode
//! and vendor errors are folded into fixed messages.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ds_relay::{Command, Config, DownloadStation};
//! use ds_relay::config::{DownloadConfig, NasConfig, Secret};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         nas: NasConfig {
//!             host: "nas.local".to_string(),
//!             port: 5001,
//!             https: true,
//!             accept_invalid_certs: true,
//!             account: "operator".to_string(),
//!             passphrase: Secret::new("correct horse"),
//!             session_name: "DownloadStation".to_string(),
//!             request_timeout: Duration::from_secs(30),
//!         },
//!         download: DownloadConfig {
//!             destination: "MOVIES/Downloads".to_string(),
//!         },
//!         hosting: vec![],
//!     };
//!
//!     // Fails if the first login fails
//!     let station = DownloadStation::connect(config).await?;
//!
//!     if let Some(command) = Command::parse("/download https://example.com/file.iso") {
//!         println!("{}", station.dispatch(command).await);
//!     }
//!     println!("{}", station.report().await);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Chat command parsing and dispatch
pub mod commands;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Vendor error code catalog
pub mod error_catalog;
/// Status report classification and rendering
pub mod report;
/// Link resolution strategies
pub mod resolver;
/// NAS session cache
pub mod session;
/// Download Station facade
pub mod station;
/// NAS web API client
pub mod synology;
/// Core types
pub mod types;
/// Text formatting helpers
pub mod utils;

// Re-export commonly used types
pub use commands::Command;
pub use config::{Config, HostRule, Secret, StrategyConfig};
pub use error::{Error, Result};
pub use error_catalog::{ApiScope, ErrorCatalog};
pub use report::{Bucket, StatusReport};
pub use resolver::{LinkResolver, LinkStrategy};
pub use session::SessionManager;
pub use station::DownloadStation;
pub use station::status::{FETCH_FAILED, NO_TASKS, PARSE_FAILED, STATUS_UNAVAILABLE};
pub use types::{ApiOutcome, LinkDescriptor, Session, StrategyTag, SubmitOutcome, Task, TaskState};
