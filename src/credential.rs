use std::future::Future;

use serde::Deserialize;
use url::Url;

use crate::client::GraphConfig;
use crate::error::Error;

/// Confidential-client credential: the tenant / client id / client secret
/// triple used to obtain directory access tokens.
///
/// Constructed once at startup and shared read-only for the life of the
/// process. `Debug` redacts the secret; the secret is never logged.
#[derive(Clone)]
pub struct ClientCredential {
    tenant_id: String,
    client_id: String,
    client_secret: String,
}

impl ClientCredential {
    /// Create a credential from its three parts.
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Create a credential from environment variables.
    ///
    /// # Required env vars
    /// - `GRAPH_TENANT_ID`: Entra tenant id
    /// - `GRAPH_CLIENT_ID`: application (client) id
    /// - `GRAPH_CLIENT_SECRET`: client secret
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first missing variable.
    pub fn from_env() -> Result<Self, Error> {
        let tenant_id = std::env::var("GRAPH_TENANT_ID")
            .map_err(|_| Error::Config("GRAPH_TENANT_ID is required".into()))?;
        let client_id = std::env::var("GRAPH_CLIENT_ID")
            .map_err(|_| Error::Config("GRAPH_CLIENT_ID is required".into()))?;
        let client_secret = std::env::var("GRAPH_CLIENT_SECRET")
            .map_err(|_| Error::Config("GRAPH_CLIENT_SECRET is required".into()))?;
        Ok(Self::new(tenant_id, client_id, client_secret))
    }

    /// Entra tenant id.
    #[must_use]
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Application (client) id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl std::fmt::Debug for ClientCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredential")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Token endpoint response.
///
/// `Deserialize`-only and without `Debug`: access tokens must not end up
/// in logs or error messages. Unknown fields are ignored.
#[derive(Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    #[serde(default)]
    pub(crate) token_type: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub(crate) expires_in: Option<u64>,
}

/// Pluggable token-acquisition strategy for [`GraphClient`](crate::GraphClient).
pub trait TokenProvider: Send + Sync + 'static {
    /// Produce a bearer access token for the directory API.
    fn access_token(&self) -> impl Future<Output = Result<String, Error>> + Send;
}

/// Token provider using the OAuth2 client-credentials grant against the
/// Microsoft identity platform.
///
/// Requests a fresh token per call, without caching. Hosts that manage
/// token lifetimes themselves should use [`StaticTokenProvider`].
pub struct ClientSecretProvider {
    http: reqwest::Client,
    credential: ClientCredential,
    authority_url: Url,
    scope: String,
    timeout: std::time::Duration,
}

impl ClientSecretProvider {
    /// Create a provider for the given endpoints and credential.
    #[must_use]
    pub fn new(config: &GraphConfig, credential: ClientCredential) -> Self {
        Self::with_http_client(reqwest::Client::new(), config, credential)
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(
        http: reqwest::Client,
        config: &GraphConfig,
        credential: ClientCredential,
    ) -> Self {
        Self {
            http,
            credential,
            authority_url: config.authority_url().clone(),
            scope: config.scopes().join(" "),
            timeout: config.timeout(),
        }
    }

    /// Token endpoint for this credential's tenant:
    /// `{authority}/{tenant}/oauth2/v2.0/token`.
    fn token_url(&self) -> Result<Url, Error> {
        let mut url = self.authority_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Config("authority URL cannot be a base".into()))?
            .pop_if_empty()
            .extend([self.credential.tenant_id(), "oauth2", "v2.0", "token"]);
        Ok(url)
    }
}

impl TokenProvider for ClientSecretProvider {
    async fn access_token(&self) -> Result<String, Error> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credential.client_id()),
            ("client_secret", self.credential.client_secret()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .http
            .post(self.token_url()?)
            .timeout(self.timeout)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::Auth {
                status: None,
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth {
                status: Some(status),
                detail: body,
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| Error::Auth {
            status: None,
            detail: e.to_string(),
        })?;

        // RFC 6749: token_type is required, but some issuers omit it.
        // Anything other than a bearer token is unusable here.
        if let Some(ref tt) = token.token_type
            && !tt.eq_ignore_ascii_case("bearer")
        {
            return Err(Error::Auth {
                status: None,
                detail: format!("unsupported token type: {tt}"),
            });
        }

        Ok(token.access_token)
    }
}

/// Token provider returning an externally managed bearer token.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Wrap an already-acquired bearer token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, Error> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credential() -> ClientCredential {
        ClientCredential::new("tenant-1", "client-1", "s3cret")
    }

    #[test]
    fn debug_redacts_the_secret() {
        let debug = format!("{:?}", test_credential());
        assert!(debug.contains("tenant-1"));
        assert!(debug.contains("client-1"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn token_url_is_tenant_scoped() {
        let provider = ClientSecretProvider::new(&GraphConfig::new(), test_credential());
        assert_eq!(
            provider.token_url().unwrap().as_str(),
            "https://login.microsoftonline.com/tenant-1/oauth2/v2.0/token"
        );
    }

    #[test]
    fn token_url_override_keeps_path() {
        let config = GraphConfig::new()
            .with_authority_url("https://mock.local/identity".parse().unwrap());
        let provider = ClientSecretProvider::new(&config, test_credential());
        assert_eq!(
            provider.token_url().unwrap().as_str(),
            "https://mock.local/identity/tenant-1/oauth2/v2.0/token"
        );
    }

    #[test]
    fn deserialize_full_token_response() {
        let json = r#"{"access_token":"tok","expires_in":3600,"token_type":"Bearer"}"#;
        let r: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(r.access_token, "tok");
        assert_eq!(r.expires_in, Some(3600));
        assert_eq!(r.token_type.as_deref(), Some("Bearer"));
    }

    #[test]
    fn deserialize_minimal_token_response() {
        let r: TokenResponse = serde_json::from_str(r#"{"access_token":"tok"}"#).unwrap();
        assert_eq!(r.access_token, "tok");
        assert!(r.expires_in.is_none());
        assert!(r.token_type.is_none());
    }

    #[tokio::test]
    async fn static_provider_returns_its_token() {
        let provider = StaticTokenProvider::new("ext-token");
        assert_eq!(provider.access_token().await.unwrap(), "ext-token");
    }
}
