//! Single-user login session.
//!
//! SYSTEM CONTEXT
//! ==============
//! There is no user registry: the only account is the compiled-in
//! `FAKE_USER`. The session lives for the process and starts anonymous.
//! `RouteGuard` reads `SessionState` to decide whether protected content
//! may render.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

/// The one account the session accepts.
pub const FAKE_USER: User = User {
    name: "Jack",
    email: "jack@example.com",
    password: "qwerty",
    avatar: "https://i.pravatar.cc/100?u=zz",
};

/// Login failures. Neither changes the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("invalid email or password")]
    LoginFailed,
}

/// Profile of the signed-in user.
#[derive(Clone, Copy, PartialEq, Eq, Serialize)]
pub struct User {
    pub name: &'static str,
    pub email: &'static str,
    #[serde(skip_serializing)]
    pub password: &'static str,
    pub avatar: &'static str,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("avatar", &self.avatar)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login(User),
    Logout,
}

/// Session snapshot. Authenticated exactly when a user is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    user: Option<User>,
}

impl SessionState {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn apply(&mut self, action: AuthAction) {
        match action {
            AuthAction::Login(user) => self.user = Some(user),
            AuthAction::Logout => *self = Self::default(),
        }
    }
}

/// Owner of the session state machine.
#[derive(Debug, Default)]
pub struct AuthSession {
    state: SessionState,
}

impl AuthSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Sign in with the compiled-in credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredentials`] when both fields are empty and
    /// [`AuthError::LoginFailed`] on any mismatch. The session is unchanged.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.is_empty() && password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        if email != FAKE_USER.email || password != FAKE_USER.password {
            warn!(%email, "auth: login rejected");
            return Err(AuthError::LoginFailed);
        }

        self.state.apply(AuthAction::Login(FAKE_USER));
        info!(%email, "auth: login succeeded");
        Ok(FAKE_USER)
    }

    pub fn logout(&mut self) {
        self.state.apply(AuthAction::Logout);
        info!("auth: logged out");
    }
}
