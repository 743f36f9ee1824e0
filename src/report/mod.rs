//! Status report: classification of a task snapshot and its chat rendering.
//!
//! Everything here is pure. [`classify`] groups tasks into [`Bucket`]s,
//! [`StatusReport::build`] orders and truncates each bucket and renders the
//! text. Per-state presentation lives in one table, [`Bucket::style`].
//!
//! Only task titles come from the NAS, so only titles are MarkdownV2-escaped.
//! Headings, icons, sizes and progress bars are fixed text and are written
//! literally.

mod progress;

pub use progress::{EMPTY_SEGMENT, FILLED_SEGMENT, PROGRESS_SEGMENTS, progress_bar, progress_segments};

use crate::types::{Task, TaskState};
use crate::utils::{escape_markdown, format_mebibytes};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::warn;

/// Maximum tasks listed per bucket
pub const SUMMARY_LIMIT: usize = 2;

/// First line of every report, written literally
pub const REPORT_HEADING: &str = "📊 *Download status*";

/// Icon prefixed to progress lines
const PROGRESS_ICON: &str = "⬇️";

/// Report group: a known lifecycle state, or everything unrecognized.
///
/// Ordering is the canonical report order, with `Other` last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    /// Tasks in a known state
    State(TaskState),
    /// Tasks whose status string is not a known state
    Other,
}

/// How a task line is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    /// Title, transferred/total sizes and a progress bar
    Progress,
    /// Icon, title and total size
    Summary,
}

/// Presentation of one bucket
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BucketStyle {
    /// Icon shown in the header and on summary lines
    pub icon: &'static str,
    /// Header title
    pub title: &'static str,
    /// Line rendering rule
    pub line: LineStyle,
}

impl Bucket {
    /// Presentation table
    pub fn style(&self) -> BucketStyle {
        use LineStyle::{Progress, Summary};
        let (icon, title, line) = match self {
            Bucket::State(TaskState::Waiting) => ("⌛", "Waiting", Summary),
            Bucket::State(TaskState::Downloading) => ("🚀", "Downloading", Progress),
            Bucket::State(TaskState::Paused) => ("⏸️", "Paused", Summary),
            Bucket::State(TaskState::Finishing) => ("✅", "Finishing", Progress),
            Bucket::State(TaskState::Finished) => ("🎉", "Finished", Summary),
            Bucket::State(TaskState::HashChecking) => ("🔍", "Checking integrity", Summary),
            Bucket::State(TaskState::Seeding) => ("🌱", "Seeding", Summary),
            Bucket::State(TaskState::FilehostingWaiting) => {
                ("⌛", "Waiting for file host", Summary)
            }
            Bucket::State(TaskState::Extracting) => ("📦", "Extracting", Summary),
            Bucket::State(TaskState::Error) => ("❌", "Errors", Summary),
            Bucket::Other => ("📂", "Other", Summary),
        };
        BucketStyle { icon, title, line }
    }
}

/// Bucket a single task belongs to.
///
/// Unrecognized statuses land in [`Bucket::Other`] and are logged.
pub fn bucket_of(task: &Task) -> Bucket {
    match task.state() {
        Ok(state) => Bucket::State(state),
        Err(unknown) => {
            warn!(status = %unknown.0, task_id = %task.id, "unrecognized task status");
            Bucket::Other
        }
    }
}

/// Group tasks by bucket, keeping encounter order inside each bucket.
pub fn classify(tasks: Vec<Task>) -> BTreeMap<Bucket, Vec<Task>> {
    let mut buckets: BTreeMap<Bucket, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        buckets.entry(bucket_of(&task)).or_default().push(task);
    }
    buckets
}

/// Newest first; tasks without a creation time go last, keeping their input order.
pub fn order_and_truncate(tasks: &mut Vec<Task>, limit: usize) {
    tasks.sort_by_key(|task| Reverse(task.created_at));
    tasks.truncate(limit);
}

/// Rendered view over one task snapshot
#[derive(Clone, Debug)]
pub struct StatusReport {
    buckets: BTreeMap<Bucket, Vec<Task>>,
    text: String,
}

impl StatusReport {
    /// Classify, order, truncate and render `tasks`.
    pub fn build(tasks: Vec<Task>) -> Self {
        let mut buckets = classify(tasks);
        for tasks in buckets.values_mut() {
            order_and_truncate(tasks, SUMMARY_LIMIT);
        }

        let mut sections = vec![REPORT_HEADING.to_string()];
        sections.extend(
            buckets
                .iter()
                .map(|(bucket, tasks)| render_section(*bucket, tasks)),
        );
        let text = sections.join("\n\n");

        Self { buckets, text }
    }

    /// Tasks shown for `bucket`, newest first
    pub fn tasks(&self, bucket: Bucket) -> &[Task] {
        self.buckets
            .get(&bucket)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Non-empty buckets in canonical order
    pub fn buckets(&self) -> impl Iterator<Item = Bucket> + '_ {
        self.buckets.keys().copied()
    }

    /// The rendered text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the report, keeping only the text
    pub fn into_text(self) -> String {
        self.text
    }
}

fn render_section(bucket: Bucket, tasks: &[Task]) -> String {
    let style = bucket.style();
    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(format!("*{} {}*", style.icon, style.title));
    lines.extend(tasks.iter().map(|task| render_line(style, task)));
    lines.join("\n")
}

/// One task line in the given style.
///
/// The title is escaped; sizes and the progress bar are literal.
pub fn render_line(style: BucketStyle, task: &Task) -> String {
    let title = escape_markdown(&task.title);
    match style.line {
        LineStyle::Progress => {
            let downloaded = task.size_downloaded.unwrap_or(0);
            format!(
                "{} {} ({} / {}) {}",
                PROGRESS_ICON,
                title,
                format_mebibytes(downloaded),
                format_mebibytes(task.size),
                progress_bar(downloaded, task.size)
            )
        }
        LineStyle::Summary => format!(
            "{} {} ({})",
            style.icon,
            title,
            format_mebibytes(task.size)
        ),
    }
}
