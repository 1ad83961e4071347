use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, WorkflowError};
use crate::models::Role;

/// Opaque bearer token issued by the external service at login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// The signed-in user and the token sent with every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub display_name: String,
    pub role: Role,
    pub token: SessionToken,
}

/// Holds the logged-in session between `login` and `logout`.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: Option<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous session.
    pub fn login(&mut self, session: Session) -> &Session {
        self.current.insert(session)
    }

    /// Drops the session and hands it back, if there was one.
    pub fn logout(&mut self) -> Option<Session> {
        self.current.take()
    }

    pub fn current(&self) -> Result<&Session> {
        self.current.as_ref().ok_or(WorkflowError::NoSession)
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registrar() -> Session {
        Session {
            user_id: "staff-7".to_string(),
            display_name: "R. Cruz".to_string(),
            role: Role::Registrar,
            token: SessionToken::new("secret-token"),
        }
    }

    #[test]
    fn test_login_logout_cycle() {
        let mut store = SessionStore::new();
        assert_eq!(store.current().unwrap_err(), WorkflowError::NoSession);

        store.login(registrar());
        assert_eq!(store.current().unwrap().role, Role::Registrar);

        let ended = store.logout().unwrap();
        assert_eq!(ended.user_id, "staff-7");
        assert!(!store.is_logged_in());
        assert!(store.logout().is_none());
    }

    #[test]
    fn test_token_is_not_printed() {
        let debug = format!("{:?}", registrar());
        assert!(!debug.contains("secret-token"));
    }
}
