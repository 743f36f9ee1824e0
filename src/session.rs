//! Session cache for the NAS auth API.
//!
//! One login is shared by every command. The cached [`Session`] sits behind a
//! `tokio::sync::Mutex` that is held across the login request, so concurrent
//! callers never issue duplicate logins: the first one logs in, the rest wait
//! and reuse its session.

use crate::config::{NasConfig, Secret};
use crate::error::{Error, Result};
use crate::error_catalog::{ApiScope, ErrorCatalog};
use crate::synology::wire::LoginData;
use crate::synology::{AUTH_API, AUTH_API_VERSION, AUTH_PATH, NasClient};
use crate::types::{ApiOutcome, Session};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Owns the authenticated session against the NAS
pub struct SessionManager {
    client: NasClient,
    account: String,
    passphrase: Secret,
    session_name: String,
    cached: Mutex<Option<Arc<Session>>>,
}

impl SessionManager {
    /// Create a manager with no session; the first [`acquire`](Self::acquire) logs in.
    pub fn new(client: NasClient, nas: &NasConfig) -> Self {
        Self {
            client,
            account: nas.account.clone(),
            passphrase: nas.passphrase.clone(),
            session_name: nas.session_name.clone(),
            cached: Mutex::new(None),
        }
    }

    /// Return the cached session, logging in first if there is none.
    ///
    /// # Errors
    /// Returns [`Error::Auth`] if the login fails for any reason.
    pub async fn acquire(&self) -> Result<Arc<Session>> {
        let mut cached = self.cached.lock().await;
        if let Some(session) = cached.as_ref() {
            return Ok(Arc::clone(session));
        }

        let session = Arc::new(self.login().await?);
        *cached = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Drop `stale` so the next [`acquire`](Self::acquire) logs in again.
    ///
    /// Does nothing if the cache already holds a different session, so an
    /// operation that saw an old session cannot discard a renewed one.
    pub async fn invalidate(&self, stale: &Session) {
        let mut cached = self.cached.lock().await;
        match cached.as_deref() {
            Some(current) if current.sid() == stale.sid() => {
                *cached = None;
                info!(
                    authenticated_at = %stale.authenticated_at(),
                    "NAS session invalidated"
                );
            }
            Some(_) => debug!("NAS session already renewed, keeping it"),
            None => debug!("NAS session already cleared"),
        }
    }

    /// Whether a session is currently cached
    pub async fn has_session(&self) -> bool {
        self.cached.lock().await.is_some()
    }

    async fn login(&self) -> Result<Session> {
        let params = [
            ("api", AUTH_API),
            ("version", AUTH_API_VERSION),
            ("method", "login"),
            ("account", self.account.as_str()),
            ("passwd", self.passphrase.expose()),
            ("session", self.session_name.as_str()),
            ("format", "sid"),
        ];

        let reason = match self.client.get::<LoginData>(AUTH_PATH, &params).await {
            ApiOutcome::Success(Some(data)) if !data.sid.is_empty() => {
                info!(account = %self.account, "logged in to NAS");
                return Ok(Session::new(data.sid));
            }
            ApiOutcome::Success(_) => "login reply carried no session id".to_string(),
            ApiOutcome::RemoteError(code) => {
                format!("{} (code {})", ErrorCatalog::message(ApiScope::Auth, code), code)
            }
            ApiOutcome::TransportError(e) => format!("cannot reach NAS: {}", e),
            ApiOutcome::DecodeError(e) => format!("unreadable login reply: {}", e),
        };

        warn!(account = %self.account, reason = %reason, "NAS login failed");
        Err(Error::Auth { reason })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn manager_for(server: &MockServer) -> SessionManager {
        let nas = NasConfig {
            host: server.address().ip().to_string(),
            port: server.address().port(),
            https: false,
            accept_invalid_certs: false,
            account: "operator".into(),
            passphrase: Secret::new("pw"),
            session_name: "DownloadStation".into(),
            request_timeout: Duration::from_secs(5),
        };
        SessionManager::new(NasClient::new(&nas).unwrap(), &nas)
    }

    fn login_ok(sid: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"success": true, "data": {"sid": sid}}))
    }

    #[tokio::test]
    async fn login_sends_identity_and_namespace() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/webapi/auth.cgi"))
            .and(query_param("api", "SYNO.API.Auth"))
            .and(query_param("version", "6"))
            .and(query_param("method", "login"))
            .and(query_param("account", "operator"))
            .and(query_param("passwd", "pw"))
            .and(query_param("session", "DownloadStation"))
            .and(query_param("format", "sid"))
            .respond_with(login_ok("sid-1"))
            .expect(1)
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        let session = manager.acquire().await.unwrap();
        assert_eq!(session.sid(), "sid-1");

        // Cached afterwards
        let again = manager.acquire().await.unwrap();
        assert!(Arc::ptr_eq(&session, &again));
    }

    #[tokio::test]
    async fn concurrent_acquire_logs_in_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/webapi/auth.cgi"))
            .respond_with(login_ok("shared").set_delay(Duration::from_millis(100)))
            .expect(1)
            .mount(&server)
            .await;

        let manager = Arc::new(manager_for(&server));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                tokio::spawn(async move { manager.acquire().await.unwrap() })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().sid(), "shared");
        }
    }

    #[tokio::test]
    async fn invalidate_forces_a_new_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(login_ok("first"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(login_ok("second"))
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        let first = manager.acquire().await.unwrap();
        manager.invalidate(&first).await;
        assert!(!manager.has_session().await);

        let second = manager.acquire().await.unwrap();
        assert_eq!(second.sid(), "second");
    }

    #[tokio::test]
    async fn stale_invalidate_keeps_renewed_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(login_ok("renewed"))
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        let renewed = manager.acquire().await.unwrap();

        manager.invalidate(&Session::new("old")).await;
        assert!(manager.has_session().await);
        assert_eq!(manager.acquire().await.unwrap().sid(), renewed.sid());
    }

    #[tokio::test]
    async fn rejected_login_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": false, "error": {"code": 400}})),
            )
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        match manager.acquire().await.unwrap_err() {
            Error::Auth { reason } => {
                assert!(reason.contains("no such account or incorrect password"));
                assert!(!reason.contains("pw"));
            }
            other => panic!("expected Auth error, got {other:?}"),
        }
        assert!(!manager.has_session().await);
    }

    #[tokio::test]
    async fn empty_sid_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(login_ok(""))
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        assert!(matches!(manager.acquire().await, Err(Error::Auth { .. })));
    }
}
