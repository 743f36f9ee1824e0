//! NAS web API plumbing: endpoints, wire structures and the HTTP client.

mod client;
pub(crate) mod wire;

pub use client::NasClient;

/// Auth API endpoint
pub const AUTH_PATH: &str = "/webapi/auth.cgi";
/// Download Station task API endpoint
pub const TASK_PATH: &str = "/webapi/DownloadStation/task.cgi";

pub(crate) const AUTH_API: &str = "SYNO.API.Auth";
pub(crate) const AUTH_API_VERSION: &str = "6";
pub(crate) const TASK_API: &str = "SYNO.DownloadStation.Task";
pub(crate) const TASK_API_VERSION: &str = "1";
