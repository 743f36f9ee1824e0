//! The [`DownloadStation`] facade (decomposed into focused submodules)
//!
//! - [`submit`] - task creation from a link
//! - [`status`] - task list snapshot and status report

use crate::config::Config;
use crate::error::Result;
use crate::error_catalog::ErrorCatalog;
use crate::resolver::LinkResolver;
use crate::session::SessionManager;
use crate::synology::{NasClient, TASK_API, TASK_API_VERSION, TASK_PATH};
use crate::types::{ApiOutcome, Session};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

pub mod status;
pub mod submit;

/// Entry point used by the command dispatcher.
///
/// Cheap to share behind an `Arc`; every method takes `&self` and concurrent
/// commands share one cached NAS session.
pub struct DownloadStation {
    config: Arc<Config>,
    client: NasClient,
    sessions: SessionManager,
    resolver: LinkResolver,
}

impl DownloadStation {
    /// Validate `config` and build the clients without contacting the NAS.
    ///
    /// The first command logs in lazily.
    ///
    /// # Errors
    /// Returns [`Error::Config`](crate::Error::Config) for invalid settings.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = NasClient::new(&config.nas)?;
        let sessions = SessionManager::new(client.clone(), &config.nas);
        let resolver = LinkResolver::from_rules(&config.hosting, config.nas.request_timeout)?;

        Ok(Self {
            config: Arc::new(config),
            client,
            sessions,
            resolver,
        })
    }

    /// Like [`new`](Self::new), then log in once.
    ///
    /// Nothing works without a session, so an error here is meant to stop
    /// the host process.
    ///
    /// # Errors
    /// [`Error::Config`](crate::Error::Config) for invalid settings and
    /// [`Error::Auth`](crate::Error::Auth) if the login fails.
    pub async fn connect(config: Config) -> Result<Self> {
        let station = Self::new(config)?;
        station.sessions.acquire().await?;
        Ok(station)
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Session cache shared by all commands
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Link resolver used by [`submit`](Self::submit)
    pub fn resolver(&self) -> &LinkResolver {
        &self.resolver
    }

    /// Call the task API with a session, renewing it once on expiry.
    ///
    /// A second expiry after renewal is returned as-is; it is not retried.
    ///
    /// # Errors
    /// Only session acquisition errors ([`Error::Auth`](crate::Error::Auth));
    /// call failures are reported through the returned [`ApiOutcome`].
    pub(crate) async fn task_call<T: DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<ApiOutcome<T>> {
        let session = self.sessions.acquire().await?;
        let outcome = self.task_request(&session, params).await;

        match outcome.remote_code() {
            Some(code) if ErrorCatalog::is_session_expiry(code) => {
                warn!(code, "NAS session expired, re-authenticating");
                self.sessions.invalidate(&session).await;
                let renewed = self.sessions.acquire().await?;
                Ok(self.task_request(&renewed, params).await)
            }
            _ => Ok(outcome),
        }
    }

    async fn task_request<T: DeserializeOwned>(
        &self,
        session: &Session,
        params: &[(&str, &str)],
    ) -> ApiOutcome<T> {
        let mut query = Vec::with_capacity(params.len() + 3);
        query.push(("api", TASK_API));
        query.push(("version", TASK_API_VERSION));
        query.extend_from_slice(params);
        query.push(("_sid", session.sid()));
        self.client.get(TASK_PATH, &query).await
    }
}
