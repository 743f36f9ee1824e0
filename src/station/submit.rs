//! Task creation from a submitted link.

use super::DownloadStation;
use crate::error::{Error, Result};
use crate::error_catalog::ApiScope;
use crate::types::{LinkDescriptor, SubmitOutcome};
use serde::de::IgnoredAny;
use std::time::Duration;
use tracing::{info, warn};

impl DownloadStation {
    /// Resolve `link` and create a Download Station task for it.
    ///
    /// Never fails: every error is folded into a [`SubmitOutcome`].
    pub async fn submit(&self, link: &str) -> SubmitOutcome {
        match self.create_task(link).await {
            Ok(_) => SubmitOutcome::Accepted,
            Err(e) => outcome_for(e),
        }
    }

    /// [`submit`](Self::submit) bounded by `deadline`.
    ///
    /// An elapsed deadline cancels the in-flight request and reports
    /// [`SubmitOutcome::ConnectionFailed`].
    pub async fn submit_within(&self, link: &str, deadline: Duration) -> SubmitOutcome {
        match tokio::time::timeout(deadline, self.create_task(link)).await {
            Ok(Ok(_)) => SubmitOutcome::Accepted,
            Ok(Err(e)) => outcome_for(e),
            Err(_) => outcome_for(Error::Timeout(deadline)),
        }
    }

    /// [`submit`](Self::submit) rendered for display
    pub async fn submit_message(&self, link: &str) -> String {
        self.submit(link).await.to_string()
    }

    /// Resolve and submit, returning how the link was resolved.
    ///
    /// # Errors
    /// Any [`Error`]; [`submit`](Self::submit) maps them to outcomes.
    pub async fn create_task(&self, link: &str) -> Result<LinkDescriptor> {
        let link = link.trim();
        let descriptor = self.resolver.describe(link).await?;

        let params = [
            ("method", "create"),
            ("uri", descriptor.resolved.as_str()),
            ("destination", self.config.download.destination.as_str()),
        ];
        self.task_call::<IgnoredAny>(&params)
            .await?
            .into_result(ApiScope::Task)?;

        info!(
            strategy = %descriptor.strategy,
            destination = %self.config.download.destination,
            "download task created"
        );
        Ok(descriptor)
    }
}

fn outcome_for(error: Error) -> SubmitOutcome {
    let code = match &error {
        Error::RemoteTask { code, .. } => Some(*code),
        _ => None,
    };
    warn!(error = %error, code = ?code, "download task not created");
    match error {
        Error::InvalidLink { .. } => SubmitOutcome::RejectedInvalidLink,
        Error::MissingCredentials { host } => {
            SubmitOutcome::RejectedByRemote(format!("no credentials configured for {host}"))
        }
        Error::UpstreamResolution { host, reason } => {
            SubmitOutcome::RejectedByRemote(format!("{host}: {reason}"))
        }
        Error::RemoteTask { message, .. } => SubmitOutcome::RejectedByRemote(message),
        Error::Config { message, .. } => SubmitOutcome::RejectedByRemote(message),
        Error::Auth { .. } => SubmitOutcome::AuthenticationFailed,
        Error::Transport(_) | Error::Timeout(_) => SubmitOutcome::ConnectionFailed,
        Error::Decode(_) => SubmitOutcome::ResponseUnreadable,
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_one_outcome_each() {
        let cases = [
            (
                Error::InvalidLink {
                    link: "x".into(),
                    reason: "bad".into(),
                },
                SubmitOutcome::RejectedInvalidLink,
            ),
            (
                Error::MissingCredentials {
                    host: "hoster.example".into(),
                },
                SubmitOutcome::RejectedByRemote(
                    "no credentials configured for hoster.example".into(),
                ),
            ),
            (
                Error::UpstreamResolution {
                    host: "1fichier.com".into(),
                    reason: "Resource not found".into(),
                },
                SubmitOutcome::RejectedByRemote("1fichier.com: Resource not found".into()),
            ),
            (
                Error::RemoteTask {
                    code: 999,
                    message: "unknown error (code 999)".into(),
                },
                SubmitOutcome::RejectedByRemote("unknown error (code 999)".into()),
            ),
            (
                Error::Auth {
                    reason: "nope".into(),
                },
                SubmitOutcome::AuthenticationFailed,
            ),
            (
                Error::Timeout(Duration::from_secs(1)),
                SubmitOutcome::ConnectionFailed,
            ),
            (
                Error::Decode(serde_json::from_str::<u8>("x").unwrap_err()),
                SubmitOutcome::ResponseUnreadable,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(outcome_for(error), expected);
        }
    }
}
