//! Task list snapshot and the rendered status report.

use super::DownloadStation;
use crate::error::{Error, Result};
use crate::error_catalog::ApiScope;
use crate::report::StatusReport;
use crate::synology::wire::TaskListData;
use crate::types::Task;
use std::time::Duration;
use tracing::{debug, warn};

/// Reply when the NAS has no tasks
pub const NO_TASKS: &str = "📂 No tasks found.";
/// Reply when the NAS refused the list request (or login failed)
pub const STATUS_UNAVAILABLE: &str = "❌ Unable to fetch download status.";
/// Reply when the NAS could not be reached in time
pub const FETCH_FAILED: &str = "❌ Error while retrieving data.";
/// Reply when the task list could not be decoded
pub const PARSE_FAILED: &str = "❌ Error while parsing data.";

impl DownloadStation {
    /// Fetch all tasks with their detail and transfer fields in one request.
    ///
    /// # Errors
    /// Transport, decode, auth or vendor errors of the list call.
    pub async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        let params = [("method", "list"), ("additional", "detail,transfer")];
        let data = self
            .task_call::<TaskListData>(&params)
            .await?
            .into_result(ApiScope::Task)?;

        let tasks: Vec<Task> = data
            .and_then(|data| data.tasks)
            .unwrap_or_default()
            .into_iter()
            .map(Task::from)
            .collect();
        debug!(count = tasks.len(), "task snapshot fetched");
        Ok(tasks)
    }

    /// Rendered status report. Never fails; errors become fixed messages.
    pub async fn report(&self) -> String {
        render(self.fetch_tasks().await)
    }

    /// [`report`](Self::report) bounded by `deadline`.
    pub async fn report_within(&self, deadline: Duration) -> String {
        match tokio::time::timeout(deadline, self.fetch_tasks()).await {
            Ok(result) => render(result),
            Err(_) => render(Err(Error::Timeout(deadline))),
        }
    }
}

fn render(snapshot: Result<Vec<Task>>) -> String {
    match snapshot {
        Ok(tasks) if tasks.is_empty() => NO_TASKS.to_string(),
        Ok(tasks) => StatusReport::build(tasks).into_text(),
        Err(e) => {
            warn!(error = %e, "status report unavailable");
            if e.is_transport() {
                FETCH_FAILED.to_string()
            } else if matches!(e, Error::Decode(_)) {
                PARSE_FAILED.to_string()
            } else {
                STATUS_UNAVAILABLE.to_string()
            }
        }
    }
}
