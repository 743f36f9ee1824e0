//! Core types for ds-relay

use crate::error::{Error, Result};
use crate::error_catalog::{ApiScope, ErrorCatalog};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Authenticated NAS session handle.
///
/// Handed out as `Arc<Session>` and never mutated; renewal replaces the
/// cached value with a new one.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    sid: String,
    authenticated_at: DateTime<Utc>,
}

impl Session {
    /// Create a session from a freshly issued session id
    pub fn new(sid: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            authenticated_at: Utc::now(),
        }
    }

    /// The opaque session id sent as `_sid`
    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// When the login that produced this session succeeded
    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }
}

// The sid is a bearer credential
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("sid", &"***")
            .field("authenticated_at", &self.authenticated_at)
            .finish()
    }
}

/// Link resolution strategy applied to a link
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyTag {
    /// Link handed over unchanged
    Passthrough,
    /// Hosting credentials appended as query parameters
    CredentialInjection,
    /// Link exchanged for a direct URL through the host's API
    TokenExchange,
}

impl fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrategyTag::Passthrough => "passthrough",
            StrategyTag::CredentialInjection => "credential_injection",
            StrategyTag::TokenExchange => "token_exchange",
        })
    }
}

/// A submitted link together with how it was resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkDescriptor {
    /// The link as submitted
    pub raw: String,
    /// Strategy selected for the link's host
    pub strategy: StrategyTag,
    /// URI the NAS should fetch
    pub resolved: String,
}

/// Lifecycle state of a Download Station task.
///
/// Variant order is the canonical report order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskState {
    /// Queued
    Waiting,
    /// Transferring
    Downloading,
    /// Paused by the user
    Paused,
    /// Transfer done, being finalized
    Finishing,
    /// Done
    Finished,
    /// Verifying torrent pieces
    HashChecking,
    /// Done and uploading to peers
    Seeding,
    /// Waiting for a file host slot
    FilehostingWaiting,
    /// Unpacking an archive
    Extracting,
    /// Failed
    Error,
}

impl TaskState {
    /// All states in canonical report order
    pub const ALL: [TaskState; 10] = [
        TaskState::Waiting,
        TaskState::Downloading,
        TaskState::Paused,
        TaskState::Finishing,
        TaskState::Finished,
        TaskState::HashChecking,
        TaskState::Seeding,
        TaskState::FilehostingWaiting,
        TaskState::Extracting,
        TaskState::Error,
    ];

    /// Wire name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Waiting => "waiting",
            TaskState::Downloading => "downloading",
            TaskState::Paused => "paused",
            TaskState::Finishing => "finishing",
            TaskState::Finished => "finished",
            TaskState::HashChecking => "hash_checking",
            TaskState::Seeding => "seeding",
            TaskState::FilehostingWaiting => "filehosting_waiting",
            TaskState::Extracting => "extracting",
            TaskState::Error => "error",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string that is not part of the known lifecycle
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized task status {0:?}")]
pub struct UnknownTaskState(pub String);

impl FromStr for TaskState {
    type Err = UnknownTaskState;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TaskState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownTaskState(s.to_string()))
    }
}

/// Snapshot of one remote task
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Remote task id
    pub id: String,
    /// Task title (usually the file name)
    pub title: String,
    /// Raw status string as reported by the NAS
    pub status: String,
    /// Declared total size in bytes
    pub size: u64,
    /// Bytes transferred so far, when reported
    pub size_downloaded: Option<u64>,
    /// Creation time, when reported
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Parse the lifecycle state of the task.
    ///
    /// # Errors
    /// Returns [`UnknownTaskState`] for status strings outside the known set.
    pub fn state(&self) -> std::result::Result<TaskState, UnknownTaskState> {
        self.status.parse()
    }
}

/// Result of submitting a link for download
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The NAS created the task
    Accepted,
    /// Empty or unparsable link; nothing was sent
    RejectedInvalidLink,
    /// The NAS or the file host refused the request
    RejectedByRemote(String),
    /// Login or session renewal failed
    AuthenticationFailed,
    /// Network failure or deadline expiry
    ConnectionFailed,
    /// The reply could not be decoded
    ResponseUnreadable,
}

impl SubmitOutcome {
    /// Whether the task was created
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted)
    }
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitOutcome::Accepted => f.write_str("✅ Download added successfully"),
            SubmitOutcome::RejectedInvalidLink => {
                f.write_str("❌ The download link is empty or invalid")
            }
            SubmitOutcome::RejectedByRemote(message) => write!(f, "❌ {}", message),
            SubmitOutcome::AuthenticationFailed => {
                f.write_str("❌ Authentication with the NAS failed")
            }
            SubmitOutcome::ConnectionFailed => f.write_str("❌ Could not connect to the NAS"),
            SubmitOutcome::ResponseUnreadable => f.write_str("❌ Could not read the NAS response"),
        }
    }
}

/// Tagged result of a NAS web API call
#[derive(Debug)]
pub enum ApiOutcome<T> {
    /// `success: true`; `data` is whatever the API returned, if anything
    Success(Option<T>),
    /// `success: false` with the vendor error code
    RemoteError(i64),
    /// Connectivity failure, timeout or non-2xx HTTP status
    TransportError(reqwest::Error),
    /// Body was not the expected JSON structure
    DecodeError(serde_json::Error),
}

impl<T> ApiOutcome<T> {
    /// Convert into a [`Result`], translating vendor codes through the catalog.
    pub fn into_result(self, scope: ApiScope) -> Result<Option<T>> {
        match self {
            ApiOutcome::Success(data) => Ok(data),
            ApiOutcome::RemoteError(code) => Err(Error::RemoteTask {
                code,
                message: ErrorCatalog::message(scope, code),
            }),
            ApiOutcome::TransportError(e) => Err(Error::Transport(e)),
            ApiOutcome::DecodeError(e) => Err(Error::Decode(e)),
        }
    }

    /// The vendor code if the call reported failure
    pub fn remote_code(&self) -> Option<i64> {
        match self {
            ApiOutcome::RemoteError(code) => Some(*code),
            _ => None,
        }
    }
}
