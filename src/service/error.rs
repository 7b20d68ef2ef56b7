use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors surfaced by the lookup routes.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The `username` parameter was not supplied.
    #[error("missing required parameter: username")]
    MissingUsername,

    /// The supplied username failed validation.
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// No directory user matches the supplied username.
    #[error("user not found: {0}")]
    NotFound(String),

    /// Token acquisition or the directory call failed.
    #[error("directory lookup failed: {0}")]
    Upstream(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingUsername | Self::InvalidUsername(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            Self::Upstream(ref detail) => {
                tracing::error!(detail = %detail, "directory upstream failure");
                (StatusCode::BAD_GATEWAY, "directory lookup failed").into_response()
            }
        }
    }
}

impl From<crate::error::Error> for ServiceError {
    fn from(e: crate::error::Error) -> Self {
        match e {
            crate::error::Error::NotFound { username } => Self::NotFound(username),
            crate::error::Error::InvalidPrincipalName(name) => Self::InvalidUsername(name),
            other => Self::Upstream(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_username_maps_to_400() {
        let response = ServiceError::MissingUsername.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = ServiceError::NotFound("ghost@contoso.com".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_maps_to_502() {
        let response = ServiceError::Upstream("token acquisition failed".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn library_errors_convert_by_kind() {
        let not_found = crate::error::Error::NotFound {
            username: "ghost@contoso.com".into(),
        };
        assert!(matches!(
            ServiceError::from(not_found),
            ServiceError::NotFound(_)
        ));

        let auth = crate::error::Error::Auth {
            status: Some(401),
            detail: "invalid_client".into(),
        };
        assert!(matches!(ServiceError::from(auth), ServiceError::Upstream(_)));
    }
}
