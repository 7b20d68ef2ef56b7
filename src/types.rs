use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// User principal name (UPN): the login-style identifier of a directory
/// user, e.g. `alice@contoso.com`.
///
/// Non-empty by construction. Syntax beyond that is deliberately not
/// validated here: the directory service is the authority on well-formed
/// principal names and rejects malformed input itself.
/// Use `"alice@contoso.com".parse::<UserPrincipalName>()` or
/// `UserPrincipalName::try_from(string)` to create.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserPrincipalName(String);

impl UserPrincipalName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserPrincipalName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for UserPrincipalName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for UserPrincipalName {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.trim().is_empty() {
            Err(Error::InvalidPrincipalName(s))
        } else {
            Ok(Self(s))
        }
    }
}

impl From<UserPrincipalName> for String {
    fn from(upn: UserPrincipalName) -> Self {
        upn.0
    }
}

/// Directory object identifier (opaque string).
///
/// Graph returns GUID-formatted ids; consumers treat the value as opaque
/// and choose their own storage format.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct UserId(pub String);

/// Directory user record as returned by the Graph users endpoint.
///
/// Only `id` is guaranteed; the remaining fields depend on the projection
/// the query asked for and on what the directory has on file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct DirectoryUser {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<UserPrincipalName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_date_time: Option<time::OffsetDateTime>,
}

impl DirectoryUser {
    /// Create a new `DirectoryUser` with only the required `id` field.
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            display_name: None,
            user_principal_name: None,
            mail: None,
            created_date_time: None,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the user principal name.
    #[must_use]
    pub fn with_user_principal_name(mut self, upn: UserPrincipalName) -> Self {
        self.user_principal_name = Some(upn);
        self
    }

    /// Set the mail address.
    #[must_use]
    pub fn with_mail(mut self, mail: impl Into<String>) -> Self {
        self.mail = Some(mail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_principal_name() {
        assert!("alice@contoso.com".parse::<UserPrincipalName>().is_ok());
        assert!("a".parse::<UserPrincipalName>().is_ok());
    }

    #[test]
    fn empty_principal_name_rejected() {
        assert!("".parse::<UserPrincipalName>().is_err());
        assert!("   ".parse::<UserPrincipalName>().is_err());
    }

    #[test]
    fn principal_name_serde_roundtrip() {
        let upn: UserPrincipalName = "alice@contoso.com".parse().unwrap();
        let json = serde_json::to_string(&upn).unwrap();
        assert_eq!(json, "\"alice@contoso.com\"");
        let parsed: UserPrincipalName = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, upn);
    }

    #[test]
    fn empty_principal_name_rejected_in_serde() {
        assert!(serde_json::from_str::<UserPrincipalName>("\"\"").is_err());
    }

    #[test]
    fn user_id_from_string() {
        let id = UserId::from("00000000-0000-0000-0000-000000000001".to_string());
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000001");
    }

    #[test]
    fn directory_user_from_graph_json() {
        let json = r#"{
            "id": "c7a2-1",
            "displayName": "Alice Example",
            "userPrincipalName": "alice@contoso.com",
            "mail": "alice@contoso.com",
            "createdDateTime": "2021-03-04T05:06:07Z"
        }"#;
        let user: DirectoryUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id.0, "c7a2-1");
        assert_eq!(user.display_name.as_deref(), Some("Alice Example"));
        assert_eq!(
            user.user_principal_name.as_ref().map(|u| u.as_str()),
            Some("alice@contoso.com")
        );
        assert!(user.created_date_time.is_some());
    }

    #[test]
    fn directory_user_id_only() {
        let user: DirectoryUser = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(user.id.0, "x");
        assert!(user.display_name.is_none());
        assert!(user.created_date_time.is_none());
    }

    #[test]
    fn directory_user_ignores_unknown_fields() {
        let json = r#"{"id":"x","businessPhones":[],"officeLocation":"18/2111"}"#;
        assert!(serde_json::from_str::<DirectoryUser>(json).is_ok());
    }
}
