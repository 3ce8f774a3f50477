//! Authenticated HTTP client for the GitHub REST API
//!
//! All retry policy lives here so every operation sees the same behaviour:
//! rate-limited requests back off exponentially up to
//! [`RetryPolicy::max_rate_limit_retries`] times, server errors up to
//! [`RetryPolicy::max_server_retries`] times. Anything else fails on the
//! first attempt.
//!
//! # Example
//!
//! ```rust,ignore
//! use github_repos_mcp::remote::RemoteClient;
//! use reqwest::Method;
//!
//! let client = RemoteClient::new(&config.github, RetryPolicy::from(&config.retry))?;
//! let raw = client.send(Method::GET, "repos/octocat/hello-world", &[], None).await?;
//! ```

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::{ClientInitError, RemoteError, RemoteErrorKind, RemoteResult};
use super::pagination::Pages;
use super::retry::RetryPolicy;
use crate::config::GitHubConfig;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Bearer token attached to every request. Never printed.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, rejecting blank values
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token.trim().to_string()))
        }
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// A successful GitHub response
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    /// Decode the body, mapping shape mismatches to `Malformed`
    pub fn json<T: DeserializeOwned>(&self) -> RemoteResult<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            debug!(error = %e, "undecodable GitHub payload");
            RemoteError::malformed(format!("unexpected GitHub payload: {e}"))
        })
    }
}

/// Client for the GitHub REST API.
///
/// Cheap to clone; clones share one connection pool. Safe to use from many
/// invocations at once.
#[derive(Clone)]
pub struct RemoteClient {
    http: Client,
    base_url: Url,
    credential: Option<Credential>,
    retry: RetryPolicy,
    per_page: u32,
}

impl RemoteClient {
    pub fn new(config: &GitHubConfig, retry: RetryPolicy) -> Result<Self, ClientInitError> {
        let base_url = parse_base_url(&config.api_url)?;

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            http,
            base_url,
            credential: config.token().and_then(Credential::new),
            retry,
            per_page: config.per_page.clamp(1, 100),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Issue one logical request against `path` (relative to the API root)
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> RemoteResult<RawResponse> {
        let url = self.endpoint(path, query)?;
        self.execute(method, url, body).await
    }

    /// Lazily walk every page of a list endpoint.
    ///
    /// `per_page` is added from configuration; pages are fetched one at a
    /// time, in the order GitHub links them.
    pub fn list_paged(&self, path: &str, query: &[(&str, String)]) -> Pages<'_> {
        let mut query = query.to_vec();
        query.push(("per_page", self.per_page.to_string()));
        Pages::new(self, self.endpoint(path, &query))
    }

    /// Run a request with the retry policy applied
    #[instrument(skip_all, fields(method = %method, path = %url.path()))]
    pub(crate) async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> RemoteResult<RawResponse> {
        let Some(credential) = &self.credential else {
            return Err(RemoteError::unauthenticated());
        };

        let mut rate_limit_retries = 0;
        let mut server_retries = 0;

        loop {
            let err = match self.attempt(credential, &method, &url, body).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            let delay = match err.kind {
                RemoteErrorKind::RateLimited
                    if rate_limit_retries < self.retry.max_rate_limit_retries =>
                {
                    let delay = self.retry.delay_for(rate_limit_retries);
                    rate_limit_retries += 1;
                    delay
                }
                RemoteErrorKind::RemoteUnavailable
                    if server_retries < self.retry.max_server_retries =>
                {
                    let delay = self.retry.delay_for(server_retries);
                    server_retries += 1;
                    delay
                }
                _ => return Err(err),
            };

            warn!(
                kind = %err.kind,
                rate_limit_retries,
                server_retries,
                delay_ms = delay.as_millis() as u64,
                "GitHub request failed, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn attempt(
        &self,
        credential: &Credential,
        method: &Method,
        url: &Url,
        body: Option<&Value>,
    ) -> RemoteResult<RawResponse> {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(credential.expose())
            .header(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE))
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::from_transport(&e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::from_transport(&e))?;

        if !status.is_success() {
            let err = RemoteError::from_response(status, &headers, &text);
            debug!(status = status.as_u16(), kind = %err.kind, "GitHub returned an error");
            return Err(err);
        }

        debug!(status = status.as_u16(), "GitHub request succeeded");
        Ok(RawResponse {
            headers,
            body: text,
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> RemoteResult<Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| RemoteError::malformed(format!("invalid API path: {path}")))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}

impl fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteClient")
            .field("base_url", &self.base_url.as_str())
            .field("credential", &self.credential)
            .field("retry", &self.retry)
            .field("per_page", &self.per_page)
            .finish()
    }
}

/// Parse the API root, forcing a trailing slash so relative joins append
fn parse_base_url(raw: &str) -> Result<Url, ClientInitError> {
    let mut url = Url::parse(raw).map_err(|source| ClientInitError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_url: &str, token: Option<&str>) -> GitHubConfig {
        GitHubConfig {
            api_url: api_url.to_string(),
            token: token.map(str::to_string),
            ..GitHubConfig::default()
        }
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("https://ghe.example.com/api/v3").unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/");
        let joined = url.join("user/repos").unwrap();
        assert_eq!(joined.as_str(), "https://ghe.example.com/api/v3/user/repos");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = RemoteClient::new(&config("not a url", Some("t")), RetryPolicy::none());
        assert!(matches!(err, Err(ClientInitError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_endpoint_with_query() {
        let client = RemoteClient::new(&config("https://api.github.com", Some("t")), RetryPolicy::none())
            .unwrap();
        let url = client
            .endpoint("/user/repos", &[("sort", "created".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/user/repos?sort=created");
    }

    #[test]
    fn test_blank_token_is_no_credential() {
        let client = RemoteClient::new(&config("https://api.github.com", Some("   ")), RetryPolicy::none())
            .unwrap();
        assert!(!client.has_credential());
    }

    #[test]
    fn test_debug_hides_token() {
        let client = RemoteClient::new(
            &config("https://api.github.com", Some("ghp_secret")),
            RetryPolicy::none(),
        )
        .unwrap();
        let printed = format!("{client:?}");
        assert!(!printed.contains("ghp_secret"));
    }

    #[tokio::test]
    async fn test_missing_credential_fails_without_network() {
        // Port 9 is discard; a real request would fail as RemoteUnavailable
        let client = RemoteClient::new(&config("http://127.0.0.1:9", None), RetryPolicy::none())
            .unwrap();
        let err = client
            .send(Method::GET, "user/repos", &[], None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, RemoteErrorKind::Unauthenticated);
    }
}
