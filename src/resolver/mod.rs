//! Link resolution: per-host strategy dispatch.
//!
//! The resolver holds a table of `(domain, strategy)` rows built from
//! [`HostRule`]s. A link's host selects the most specific matching row;
//! hosts without a row, and links without a host (e.g. `magnet:`), use
//! [`Passthrough`]. Supporting a new file host is a configuration change.

mod strategies;

pub use strategies::{CredentialInjection, LinkStrategy, Passthrough, TokenExchange};

use crate::config::{HostRule, StrategyConfig};
use crate::error::{Error, Result};
use crate::types::LinkDescriptor;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

struct Route {
    domain: String,
    strategy: Arc<dyn LinkStrategy>,
}

impl Route {
    fn matches(&self, host: &str) -> bool {
        host == self.domain
            || host
                .strip_suffix(self.domain.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

/// Dispatches links to the strategy configured for their host
pub struct LinkResolver {
    routes: Vec<Route>,
    fallback: Arc<dyn LinkStrategy>,
}

impl LinkResolver {
    /// Resolver that passes every link through unchanged
    pub fn passthrough() -> Self {
        Self {
            routes: Vec::new(),
            fallback: Arc::new(Passthrough),
        }
    }

    /// Build the routing table from configured rules.
    ///
    /// Token-exchange strategies share one HTTP client that verifies
    /// certificates and times out after `timeout`.
    ///
    /// # Errors
    /// Returns [`Error::Transport`] if the HTTP client cannot be built.
    pub fn from_rules(rules: &[HostRule], timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ds-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)?;

        let mut resolver = Self::passthrough();
        for rule in rules {
            let strategy: Arc<dyn LinkStrategy> = match &rule.strategy {
                StrategyConfig::Passthrough => Arc::new(Passthrough),
                StrategyConfig::CredentialInjection { username, password } => Arc::new(
                    CredentialInjection::new(username.clone(), password.clone()),
                ),
                StrategyConfig::TokenExchange { endpoint, api_key } => Arc::new(
                    TokenExchange::new(http.clone(), endpoint.clone(), api_key.clone()),
                ),
            };
            resolver = resolver.with_route(rule.normalized_domain(), strategy);
        }
        Ok(resolver)
    }

    /// Add or replace the strategy for `domain` (subdomains included).
    pub fn with_route(mut self, domain: impl Into<String>, strategy: Arc<dyn LinkStrategy>) -> Self {
        let domain = domain.into().trim_start_matches('.').to_ascii_lowercase();
        self.routes.retain(|route| route.domain != domain);
        self.routes.push(Route { domain, strategy });
        // Longest domain first so "dl.host.com" beats "host.com"
        self.routes
            .sort_by(|a, b| b.domain.len().cmp(&a.domain.len()));
        self
    }

    /// Strategy that applies to `host`
    pub fn strategy_for(&self, host: Option<&str>) -> &dyn LinkStrategy {
        let Some(host) = host else {
            return self.fallback.as_ref();
        };
        let host = host.to_ascii_lowercase();
        self.routes
            .iter()
            .find(|route| route.matches(&host))
            .map_or(self.fallback.as_ref(), |route| route.strategy.as_ref())
    }

    /// Resolve `raw` into a URI the NAS can fetch.
    ///
    /// # Errors
    /// [`Error::InvalidLink`] for empty or unparsable input, plus whatever the
    /// selected strategy reports.
    pub async fn resolve(&self, raw: &str) -> Result<String> {
        Ok(self.describe(raw).await?.resolved)
    }

    /// Like [`resolve`](Self::resolve), also reporting which strategy was used.
    pub async fn describe(&self, raw: &str) -> Result<LinkDescriptor> {
        if raw.trim().is_empty() {
            return Err(Error::InvalidLink {
                link: raw.to_string(),
                reason: "link is empty".to_string(),
            });
        }
        let url = Url::parse(raw).map_err(|e| Error::InvalidLink {
            link: raw.to_string(),
            reason: e.to_string(),
        })?;

        let strategy = self.strategy_for(url.host_str());
        debug!(
            host = url.host_str().unwrap_or("-"),
            strategy = %strategy.tag(),
            "resolving link"
        );

        let resolved = strategy.resolve(raw, &url).await?;
        Ok(LinkDescriptor {
            raw: raw.to_string(),
            strategy: strategy.tag(),
            resolved,
        })
    }
}
