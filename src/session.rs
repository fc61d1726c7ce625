//! Session Context
//!
//! Authentication state for one browser session: set at login, cleared at
//! logout, read by route guards. Passed explicitly to the components that
//! need it instead of living in ambient storage.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

use crate::model::{User, UserRole};

/// Key the signed-in user is stored under
pub const SESSION_USER_KEY: &str = "user";

/// Where logout and failed guards send the browser
pub const LOGIN_ROUTE: &str = "/login";

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(String),
}

/// Session-scoped key/value storage holding serialized values
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    values: HashMap<String, String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the signed-in user
    pub fn login(&mut self, user: &User) {
        self.set(SESSION_USER_KEY, user);
        tracing::debug!(user_id = %user.id, role = %user.role, "Session started");
    }

    /// Clear the signed-in user and return the route to navigate to
    pub fn logout(&mut self) -> &'static str {
        if self.values.remove(SESSION_USER_KEY).is_some() {
            tracing::debug!("Session cleared");
        }
        LOGIN_ROUTE
    }

    pub fn current_user(&self) -> Option<User> {
        self.get(SESSION_USER_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Require a signed-in user, optionally with one of `roles`
    pub fn guard(&self, roles: &[UserRole]) -> GuardOutcome {
        match self.current_user() {
            Some(user) if roles.is_empty() || roles.contains(&user.role) => GuardOutcome::Allow,
            _ => GuardOutcome::Redirect(LOGIN_ROUTE.to_string()),
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => {
                self.values.insert(key.to_string(), json);
            }
            Err(e) => tracing::warn!(key, error = %e, "Failed to serialize session value"),
        }
    }

    /// Read a value; unreadable entries behave as absent
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.values.get(key)?;
        serde_json::from_str(raw).ok()
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_logout() {
        let mut session = SessionContext::new();
        assert!(!session.is_authenticated());

        let user = User::new("Dev", "dev@example.com", UserRole::TeamLeader);
        session.login(&user);
        assert_eq!(session.current_user(), Some(user));

        assert_eq!(session.logout(), LOGIN_ROUTE);
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_logout_only_clears_user_key() {
        let mut session = SessionContext::new();
        session.set("theme", &"dark");
        session.login(&User::new("Dev", "dev@example.com", UserRole::Admin));

        session.logout();
        assert_eq!(session.get::<String>("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_guard() {
        let mut session = SessionContext::new();
        assert_eq!(session.guard(&[]), GuardOutcome::Redirect("/login".to_string()));

        session.login(&User::new("Ops", "ops@example.com", UserRole::Admin));
        assert_eq!(session.guard(&[]), GuardOutcome::Allow);
        assert_eq!(
            session.guard(&[UserRole::Admin, UserRole::SuperAdmin]),
            GuardOutcome::Allow
        );
        assert_eq!(
            session.guard(&[UserRole::TeamLeader]),
            GuardOutcome::Redirect(LOGIN_ROUTE.to_string())
        );
    }

    #[test]
    fn test_corrupt_value_reads_as_absent() {
        let mut session = SessionContext::new();
        session.set(SESSION_USER_KEY, &"not a user");
        assert!(session.current_user().is_none());
    }
}
