use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::credential::{ClientCredential, ClientSecretProvider, TokenProvider};
use crate::error::Error;
use crate::types::{DirectoryUser, UserId, UserPrincipalName};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Graph endpoint configuration.
///
/// All fields have production defaults; overrides exist for sovereign
/// clouds and for pointing tests at a local mock server.
///
/// ```rust,ignore
/// use graph_directory::GraphConfig;
///
/// let config = GraphConfig::new();
/// // Optional overrides via chaining:
/// let config = config.with_graph_url("https://graph.microsoft.us/v1.0".parse()?);
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GraphConfig {
    pub(crate) authority_url: Url,
    pub(crate) graph_url: Url,
    pub(crate) scopes: Vec<String>,
    pub(crate) timeout: Duration,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphConfig {
    /// Create a configuration with public-cloud defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            authority_url: "https://login.microsoftonline.com"
                .parse()
                .expect("valid default URL"),
            graph_url: "https://graph.microsoft.com/v1.0"
                .parse()
                .expect("valid default URL"),
            scopes: vec!["https://graph.microsoft.com/.default".into()],
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// # Optional env vars
    /// - `GRAPH_AUTHORITY_URL`: override the identity platform base URL
    /// - `GRAPH_URL`: override the Graph API base URL
    /// - `GRAPH_SCOPES`: comma-separated OAuth2 scopes
    /// - `GRAPH_TIMEOUT_SECS`: per-request deadline in seconds
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a set variable fails to parse.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::new();

        if let Ok(url_str) = std::env::var("GRAPH_AUTHORITY_URL") {
            let url: Url = url_str
                .parse()
                .map_err(|e| Error::Config(format!("GRAPH_AUTHORITY_URL: {e}")))?;
            config = config.with_authority_url(url);
        }
        if let Ok(url_str) = std::env::var("GRAPH_URL") {
            let url: Url = url_str
                .parse()
                .map_err(|e| Error::Config(format!("GRAPH_URL: {e}")))?;
            config = config.with_graph_url(url);
        }
        if let Ok(scopes) = std::env::var("GRAPH_SCOPES") {
            config =
                config.with_scopes(scopes.split(',').map(|s| s.trim().to_string()).collect());
        }
        if let Ok(secs) = std::env::var("GRAPH_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|e| Error::Config(format!("GRAPH_TIMEOUT_SECS: {e}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Override the identity platform base URL.
    #[must_use]
    pub fn with_authority_url(mut self, url: Url) -> Self {
        self.authority_url = url;
        self
    }

    /// Override the Graph API base URL (version segment included).
    #[must_use]
    pub fn with_graph_url(mut self, url: Url) -> Self {
        self.graph_url = url;
        self
    }

    /// Override the OAuth2 scopes (default: `["https://graph.microsoft.com/.default"]`).
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Override the per-request deadline (default: 30 s).
    ///
    /// Applies to every outbound call, token acquisition included.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Identity platform base URL.
    #[must_use]
    pub fn authority_url(&self) -> &Url {
        &self.authority_url
    }

    /// Graph API base URL.
    #[must_use]
    pub fn graph_url(&self) -> &Url {
        &self.graph_url
    }

    /// Requested OAuth2 scopes.
    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Per-request deadline.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Directory user lookup.
///
/// The seam the service layer and consumers program against; implemented by
/// [`GraphClient`] and by test fakes.
pub trait DirectoryLookup: Send + Sync + 'static {
    /// Resolve a principal name to the directory object id.
    fn lookup_user_id(
        &self,
        username: &UserPrincipalName,
    ) -> impl Future<Output = Result<UserId, Error>> + Send;

    /// Fetch the full directory record for a principal name.
    fn get_user(
        &self,
        username: &UserPrincipalName,
    ) -> impl Future<Output = Result<DirectoryUser, Error>> + Send;
}

/// Microsoft Graph directory lookup client.
///
/// Stateless per call: each lookup acquires a token from the
/// [`TokenProvider`] and issues one directory request. Safe to share across
/// concurrent tasks.
pub struct GraphClient<P> {
    config: GraphConfig,
    http: reqwest::Client,
    tokens: P,
}

/// Collection envelope returned by the Graph `users` endpoint.
#[derive(Deserialize)]
struct UserCollection {
    #[serde(default)]
    value: Vec<DirectoryUser>,
}

impl GraphClient<ClientSecretProvider> {
    /// Create a client authenticating with the client-credentials grant.
    #[must_use]
    pub fn new(config: GraphConfig, credential: ClientCredential) -> Self {
        let http = reqwest::Client::new();
        let tokens = ClientSecretProvider::with_http_client(http.clone(), &config, credential);
        Self {
            config,
            http,
            tokens,
        }
    }
}

impl<P: TokenProvider> GraphClient<P> {
    /// Create a client with a custom token-acquisition strategy.
    #[must_use]
    pub fn with_token_provider(config: GraphConfig, tokens: P) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            tokens,
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Endpoint configuration.
    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Resolve `username` to the directory object id.
    ///
    /// Issues a filtered, `id`-projected query against the `users`
    /// collection. The filter match is unique in a well-formed directory, so
    /// the first element of the result is the user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if token acquisition fails (the directory is
    /// not contacted), [`Error::NotFound`] if no user matches, or
    /// [`Error::Remote`] if the directory call fails.
    pub async fn lookup_user_id(&self, username: &UserPrincipalName) -> Result<UserId, Error> {
        let token = self.tokens.access_token().await?;

        let mut url = self.users_url(None)?;
        url.query_pairs_mut()
            .append_pair("$select", "id")
            .append_pair(
                "$filter",
                &format!(
                    "userPrincipalName eq '{}'",
                    escape_odata_literal(username.as_str())
                ),
            );

        let response = self
            .http
            .get(url)
            .timeout(self.config.timeout)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| remote_error("user query", e))?;

        let response = Self::ensure_success(response, "user query").await?;
        let collection: UserCollection = response
            .json()
            .await
            .map_err(|e| remote_error("user query", e))?;

        let user = collection.value.into_iter().next().ok_or_else(|| {
            tracing::debug!(username = %username, "no directory user matched");
            Error::NotFound {
                username: username.to_string(),
            }
        })?;

        tracing::debug!(username = %username, user_id = %user.id, "resolved directory user");
        Ok(user.id)
    }

    /// Fetch the full directory record for `username` via the path-style
    /// `users/{username}` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if token acquisition fails,
    /// [`Error::NotFound`] if the directory answers 404, or
    /// [`Error::Remote`] for any other failure.
    pub async fn get_user(&self, username: &UserPrincipalName) -> Result<DirectoryUser, Error> {
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .get(self.users_url(Some(username.as_str()))?)
            .timeout(self.config.timeout)
            .bearer_auth(&token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| remote_error("user fetch", e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                username: username.to_string(),
            });
        }

        let response = Self::ensure_success(response, "user fetch").await?;
        response
            .json()
            .await
            .map_err(|e| remote_error("user fetch", e))
    }

    /// `{graph_url}/users` or `{graph_url}/users/{segment}`, with reserved
    /// characters in the segment percent-encoded.
    fn users_url(&self, segment: Option<&str>) -> Result<Url, Error> {
        let mut url = self.config.graph_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::Config("graph URL cannot be a base".into()))?;
            path.pop_if_empty().push("users");
            if let Some(segment) = segment {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Checks HTTP response status; returns the response on success or an
    /// error with details.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Remote {
            operation,
            status: Some(status),
            detail: body,
        })
    }
}

impl<P: TokenProvider> DirectoryLookup for GraphClient<P> {
    async fn lookup_user_id(&self, username: &UserPrincipalName) -> Result<UserId, Error> {
        GraphClient::lookup_user_id(self, username).await
    }

    async fn get_user(&self, username: &UserPrincipalName) -> Result<DirectoryUser, Error> {
        GraphClient::get_user(self, username).await
    }
}

fn remote_error(operation: &'static str, e: reqwest::Error) -> Error {
    Error::Remote {
        operation,
        status: None,
        detail: e.to_string(),
    }
}

/// Doubles single quotes per OData string-literal escaping, so an embedded
/// quote cannot terminate the `$filter` literal.
fn escape_odata_literal(s: &str) -> String {
    s.replace('\'', "''")
}
