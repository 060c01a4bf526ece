//! Route gate for protected content.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host evaluates the guard on every navigation into a protected
//! subtree. The redirect is returned as a navigation instruction for the
//! host to perform; it never mutates session or collection state.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::auth::SessionState;

pub const LOGIN_PATH: &str = "/login";

/// Navigation the host should perform instead of rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    /// Replace the current history entry rather than pushing a new one.
    pub replace: bool,
}

/// Outcome of one guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate<T> {
    Render(T),
    Redirect(Redirect),
}

impl<T> Gate<T> {
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }
}

/// `true` when protected content must not render for this session.
#[must_use]
pub fn should_redirect_unauth(session: &SessionState) -> bool {
    !session.is_authenticated()
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(LOGIN_PATH)
    }
}

impl RouteGuard {
    #[must_use]
    pub fn new(login_path: impl Into<String>) -> Self {
        Self { login_path: login_path.into() }
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Render `content` for an authenticated session, otherwise redirect to
    /// the login entry point. `content` is not invoked on redirect.
    pub fn authorize<T, F>(&self, session: &SessionState, content: F) -> Gate<T>
    where
        F: FnOnce() -> T,
    {
        if should_redirect_unauth(session) {
            tracing::debug!(to = %self.login_path, "guard: redirecting unauthenticated navigation");
            return Gate::Redirect(Redirect { to: self.login_path.clone(), replace: true });
        }
        Gate::Render(content())
    }
}
