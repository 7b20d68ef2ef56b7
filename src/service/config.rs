/// HTTP-surface settings for the lookup routes.
///
/// Endpoint and credential configuration live on
/// [`GraphConfig`](crate::GraphConfig) and
/// [`ClientCredential`](crate::ClientCredential); this covers only how the
/// routes are mounted.
#[derive(Debug, Clone)]
pub struct GraphServiceConfig {
    pub(super) route_path: String,
}

impl Default for GraphServiceConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphServiceConfig {
    /// Create a configuration with defaults (routes under `/api/users`).
    #[must_use]
    pub fn new() -> Self {
        Self {
            route_path: "/api/users".into(),
        }
    }

    /// Override the base path the lookup routes are registered under.
    #[must_use]
    pub fn with_route_path(mut self, path: impl Into<String>) -> Self {
        self.route_path = path.into();
        self
    }

    /// Base path the lookup routes are registered under.
    #[must_use]
    pub fn route_path(&self) -> &str {
        &self.route_path
    }
}
