//! Authenticated session context.
//!
//! A session is created from a successful login response and dropped on
//! logout. Collaborators receive it explicitly; nothing here is global.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::SenderId;

/// The logged-in user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend user id, also used as the message sender id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Contact address, if the backend returned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Bearer token plus the user it belongs to.
///
/// Matches the `{token, user}` shape of the login response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    user: UserProfile,
}

impl Session {
    /// Create a session from a login result.
    pub fn new(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// The raw bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// The logged-in user.
    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    /// Sender id to stamp on outgoing messages.
    pub fn sender_id(&self) -> SenderId {
        SenderId::new(self.user.id.clone())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: "user-7".into(),
            name: "Aoi".into(),
            email: None,
        }
    }

    #[test]
    fn decodes_login_response() {
        let json = r#"{"token": "abc.def", "user": {"id": "user-7", "name": "Aoi"}}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.token(), "abc.def");
        assert_eq!(session.user(), &profile());
    }

    #[test]
    fn bearer_header_value() {
        let session = Session::new("tok", profile());
        assert_eq!(session.bearer(), "Bearer tok");
    }

    #[test]
    fn sender_id_is_the_real_user_id() {
        let session = Session::new("tok", profile());
        assert_eq!(session.sender_id(), SenderId::new("user-7"));
    }

    #[test]
    fn debug_redacts_token() {
        let session = Session::new("super-secret-token", profile());
        let debug = format!("{:?}", session);
        assert!(debug.contains("[REDACTED]"));
        assert!(
            !debug.contains("super-secret-token"),
            "token must not appear in Debug output"
        );
    }
}
