/// Errors from credential acquisition and directory lookups.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Token acquisition against the identity platform failed.
    ///
    /// `status` is `None` when the endpoint was unreachable (transport
    /// failure), `Some` for a non-success response.
    #[error("token acquisition failed{}: {detail}", fmt_status(.status))]
    Auth { status: Option<u16>, detail: String },

    /// The directory API call itself failed.
    #[error("directory {operation} failed{}: {detail}", fmt_status(.status))]
    Remote {
        operation: &'static str,
        status: Option<u16>,
        detail: String,
    },

    /// No directory user matches the given principal name.
    #[error("no directory user matches '{username}'")]
    NotFound { username: String },

    /// Principal name rejected before any network call.
    #[error("invalid user principal name: {0:?}")]
    InvalidPrincipalName(String),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(s) => format!(" (status {s})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_includes_status() {
        let err = Error::Auth {
            status: Some(401),
            detail: "invalid_client".into(),
        };
        assert_eq!(
            err.to_string(),
            "token acquisition failed (status 401): invalid_client"
        );
    }

    #[test]
    fn auth_error_without_status() {
        let err = Error::Auth {
            status: None,
            detail: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "token acquisition failed: connection refused"
        );
    }

    #[test]
    fn not_found_names_the_user() {
        let err = Error::NotFound {
            username: "ghost@contoso.com".into(),
        };
        assert_eq!(
            err.to_string(),
            "no directory user matches 'ghost@contoso.com'"
        );
    }
}
