//! HTTP client for the NAS web API.

use super::wire::Envelope;
use crate::config::NasConfig;
use crate::error::{Error, Result};
use crate::types::ApiOutcome;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Error code reported when a failed reply carries no `error` object
const UNSPECIFIED_ERROR_CODE: i64 = 100;

/// Thin wrapper around a `reqwest::Client` bound to one NAS.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct NasClient {
    http: reqwest::Client,
    base_url: String,
}

impl NasClient {
    /// Build a client from the NAS settings.
    ///
    /// Certificate verification is only disabled when
    /// [`NasConfig::accept_invalid_certs`] is set.
    ///
    /// # Errors
    /// Returns [`Error::Transport`] if the TLS backend cannot be initialised.
    pub fn new(nas: &NasConfig) -> Result<Self> {
        if nas.accept_invalid_certs {
            warn!(host = %nas.host, "TLS certificate verification disabled for NAS");
        }

        let http = reqwest::Client::builder()
            .timeout(nas.request_timeout)
            .danger_accept_invalid_certs(nas.accept_invalid_certs)
            .user_agent(concat!("ds-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            http,
            base_url: nas.base_url(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET against `path` and classify the reply.
    ///
    /// Transport errors are stripped of their URL: the query string carries
    /// the session id or the operator passphrase.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> ApiOutcome<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = match self.http.get(&url).query(params).send().await {
            Ok(response) => response,
            Err(e) => return ApiOutcome::TransportError(e.without_url()),
        };
        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => return ApiOutcome::TransportError(e.without_url()),
        };
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return ApiOutcome::TransportError(e.without_url()),
        };

        debug!(path, bytes = body.len(), "NAS reply received");

        match serde_json::from_slice::<Envelope<T>>(&body) {
            Ok(envelope) if envelope.success => ApiOutcome::Success(envelope.data),
            Ok(envelope) => ApiOutcome::RemoteError(
                envelope
                    .error
                    .map(|e| e.code)
                    .unwrap_or(UNSPECIFIED_ERROR_CODE),
            ),
            Err(e) => ApiOutcome::DecodeError(e),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Secret;
    use crate::synology::wire::LoginData;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn nas_for(server: &MockServer) -> NasConfig {
        NasConfig {
            host: server.address().ip().to_string(),
            port: server.address().port(),
            https: false,
            accept_invalid_certs: false,
            account: "operator".into(),
            passphrase: Secret::new("pw"),
            session_name: "DownloadStation".into(),
            request_timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn success_reply_yields_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/webapi/auth.cgi"))
            .and(query_param("method", "login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true, "data": {"sid": "abc"}})),
            )
            .mount(&server)
            .await;

        let client = NasClient::new(&nas_for(&server)).unwrap();
        assert_eq!(client.base_url(), server.uri());
        let outcome = client
            .get::<LoginData>("/webapi/auth.cgi", &[("method", "login")])
            .await;

        match outcome {
            ApiOutcome::Success(Some(data)) => assert_eq!(data.sid, "abc"),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_without_error_object_uses_unspecified_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success":false}"#))
            .mount(&server)
            .await;

        let client = NasClient::new(&nas_for(&server)).unwrap();
        let outcome = client.get::<LoginData>("/webapi/auth.cgi", &[]).await;
        assert_eq!(outcome.remote_code(), Some(UNSPECIFIED_ERROR_CODE));
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let client = NasClient::new(&nas_for(&server)).unwrap();
        let outcome = client.get::<LoginData>("/webapi/auth.cgi", &[]).await;
        assert!(matches!(outcome, ApiOutcome::DecodeError(_)));
    }

    #[tokio::test]
    async fn http_error_status_is_a_transport_error_without_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = NasClient::new(&nas_for(&server)).unwrap();
        let outcome = client
            .get::<LoginData>("/webapi/auth.cgi", &[("passwd", "topsecret")])
            .await;
        match outcome {
            ApiOutcome::TransportError(e) => {
                assert!(e.url().is_none());
                assert!(!e.to_string().contains("topsecret"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
