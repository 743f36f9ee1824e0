//! Link resolution strategies.

use crate::config::Secret;
use crate::error::{Error, Result};
use crate::types::StrategyTag;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Turns a parsed link into a URI the NAS can fetch directly
#[async_trait]
pub trait LinkStrategy: Send + Sync {
    /// Which strategy this is, for logging and [`LinkDescriptor`](crate::types::LinkDescriptor)
    fn tag(&self) -> StrategyTag;

    /// Resolve `raw` (already parsed as `url`).
    async fn resolve(&self, raw: &str, url: &Url) -> Result<String>;
}

fn host_of(url: &Url) -> String {
    url.host_str().unwrap_or_default().to_string()
}

/// Returns the link unchanged
pub struct Passthrough;

#[async_trait]
impl LinkStrategy for Passthrough {
    fn tag(&self) -> StrategyTag {
        StrategyTag::Passthrough
    }

    async fn resolve(&self, raw: &str, _url: &Url) -> Result<String> {
        Ok(raw.to_string())
    }
}

/// Appends `auth_user` and `auth_pass` to the link's query string
pub struct CredentialInjection {
    username: Option<String>,
    password: Option<Secret>,
}

impl CredentialInjection {
    /// Strategy with the given hosting account; missing values fail at resolve time
    pub fn new(username: Option<String>, password: Option<Secret>) -> Self {
        Self { username, password }
    }
}

#[async_trait]
impl LinkStrategy for CredentialInjection {
    fn tag(&self) -> StrategyTag {
        StrategyTag::CredentialInjection
    }

    async fn resolve(&self, _raw: &str, url: &Url) -> Result<String> {
        let (Some(user), Some(pass)) = (&self.username, &self.password) else {
            return Err(Error::MissingCredentials {
                host: host_of(url),
            });
        };

        let mut resolved = url.clone();
        resolved
            .query_pairs_mut()
            .append_pair("auth_user", user)
            .append_pair("auth_pass", pass.expose());
        Ok(resolved.into())
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    link: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenReply {
    status: String,
    url: Option<String>,
    message: Option<String>,
}

/// Exchanges the link for a single-use direct URL through the host's API
pub struct TokenExchange {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<Secret>,
}

impl TokenExchange {
    /// Strategy calling `endpoint` with a bearer `api_key`
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, api_key: Option<Secret>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl LinkStrategy for TokenExchange {
    fn tag(&self) -> StrategyTag {
        StrategyTag::TokenExchange
    }

    async fn resolve(&self, raw: &str, url: &Url) -> Result<String> {
        let host = host_of(url);
        let Some(api_key) = &self.api_key else {
            return Err(Error::MissingCredentials { host });
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key.expose())
            .json(&TokenRequest { link: raw })
            .send()
            .await
            .map_err(|e| Error::Transport(e.without_url()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.without_url()))?;

        debug!(host = %host, http_status = %status, bytes = body.len(), "token exchange reply");

        // Rejections come with a JSON body and a 4xx status; read the body first
        let reply = match serde_json::from_slice::<TokenReply>(&body) {
            Ok(reply) => reply,
            Err(_) if !status.is_success() => {
                return Err(Error::UpstreamResolution {
                    host,
                    reason: format!("HTTP {}", status),
                });
            }
            Err(e) => return Err(Error::Decode(e)),
        };

        if reply.status != "OK" {
            let reason = reply
                .message
                .unwrap_or_else(|| format!("status {}", reply.status));
            return Err(Error::UpstreamResolution { host, reason });
        }

        match reply.url {
            Some(direct) if !direct.is_empty() => Ok(direct),
            _ => Err(Error::UpstreamResolution {
                host,
                reason: "reply carried no download URL".to_string(),
            }),
        }
    }
}
