//! JSON shapes returned by the NAS web API.
//!
//! Every field the NAS may leave out is optional; a reply that does not fit
//! these structures becomes a decode error instead of a panic.

use crate::types::Task;
use chrono::DateTime;
use serde::Deserialize;

/// `{success, data?, error?}` wrapper shared by every API
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub code: i64,
}

/// `data` of a successful login
#[derive(Debug, Deserialize)]
pub(crate) struct LoginData {
    pub sid: String,
}

/// `data` of `method=list`
#[derive(Debug, Deserialize)]
pub(crate) struct TaskListData {
    pub tasks: Option<Vec<WireTask>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTask {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub size: u64,
    pub additional: Option<Additional>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Additional {
    pub detail: Option<Detail>,
    pub transfer: Option<Transfer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Detail {
    /// Unix seconds
    pub create_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Transfer {
    pub size_downloaded: Option<u64>,
}

impl From<WireTask> for Task {
    fn from(wire: WireTask) -> Self {
        let (detail, transfer) = match wire.additional {
            Some(additional) => (additional.detail, additional.transfer),
            None => (None, None),
        };
        Task {
            id: wire.id,
            title: wire.title,
            status: wire.status,
            size: wire.size,
            size_downloaded: transfer.and_then(|t| t.size_downloaded),
            created_at: detail
                .and_then(|d| d.create_time)
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }
}
