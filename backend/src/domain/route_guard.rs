//! Protected-route gate.
//!
//! [`guard`] is a pure decision over the authentication state.
//! [`RedirectTracker`] adds the navigation side effect: it emits the redirect
//! once each time the state settles as unauthenticated, whether it arrives
//! from a logout or from a reload that finished loading.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::AuthState;

/// Default login route.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Validation errors for [`LoginPath`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginPathError {
    /// Path did not start with `/`.
    #[error("login path '{value}' must be an absolute path starting with '/'")]
    NotAbsolute {
        /// Offending value.
        value: String,
    },
    /// Path contained whitespace or a scheme/authority (`//`).
    #[error("login path '{value}' must be a local path without whitespace")]
    NotLocal {
        /// Offending value.
        value: String,
    },
}

/// Local path unauthenticated users are sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoginPath(String);

impl LoginPath {
    /// Validate and construct a login path.
    pub fn new(value: impl Into<String>) -> Result<Self, LoginPathError> {
        Self::from_owned(value.into())
    }

    fn from_owned(value: String) -> Result<Self, LoginPathError> {
        if !value.starts_with('/') {
            return Err(LoginPathError::NotAbsolute { value });
        }
        if value.starts_with("//") || value.chars().any(char::is_whitespace) {
            return Err(LoginPathError::NotLocal { value });
        }
        Ok(Self(value))
    }
}

impl Default for LoginPath {
    fn default() -> Self {
        Self(DEFAULT_LOGIN_PATH.to_owned())
    }
}

impl AsRef<str> for LoginPath {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LoginPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<LoginPath> for String {
    fn from(value: LoginPath) -> Self {
        value.0
    }
}

impl TryFrom<String> for LoginPath {
    type Error = LoginPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// What a protected view should do for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// State is still loading; render a placeholder.
    Pending,
    /// Render the protected content.
    Render,
    /// Navigate to the login route.
    Redirect(LoginPath),
}

/// Decide what a protected view does.
///
/// Renders iff the user is authenticated and the state is not loading.
///
/// # Examples
/// ```
/// use campaign_auth::domain::{guard, AuthState, GuardDecision, LoginPath};
///
/// let login = LoginPath::default();
/// assert_eq!(guard(&AuthState::Loading, &login), GuardDecision::Pending);
/// assert_eq!(
///     guard(&AuthState::Anonymous, &login),
///     GuardDecision::Redirect(login.clone())
/// );
/// ```
pub fn guard(state: &AuthState, login_path: &LoginPath) -> GuardDecision {
    match state {
        AuthState::Loading => GuardDecision::Pending,
        AuthState::Authenticated(_) => GuardDecision::Render,
        AuthState::Anonymous => GuardDecision::Redirect(login_path.clone()),
    }
}

/// Navigation step produced by [`RedirectTracker::observe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// State is still loading.
    Pending,
    /// Render the protected content.
    Render,
    /// Navigate to the login route now.
    Redirect(LoginPath),
    /// Already redirected for this unauthenticated stretch; do nothing.
    Stay,
}

/// Emits at most one redirect per transition into the unauthenticated state.
///
/// Both [`AuthState::Authenticated`] and [`AuthState::Loading`] re-arm the
/// tracker.
#[derive(Debug, Clone)]
pub struct RedirectTracker {
    login_path: LoginPath,
    redirected: bool,
}

impl RedirectTracker {
    /// Tracker redirecting to `login_path`, armed for the first redirect.
    pub fn new(login_path: LoginPath) -> Self {
        Self {
            login_path,
            redirected: false,
        }
    }

    /// Observe the current state and return the navigation step.
    ///
    /// # Examples
    /// ```
    /// use campaign_auth::domain::{AuthState, LoginPath, Navigation, RedirectTracker};
    ///
    /// let mut tracker = RedirectTracker::new(LoginPath::default());
    /// assert!(matches!(tracker.observe(&AuthState::Anonymous), Navigation::Redirect(_)));
    /// assert_eq!(tracker.observe(&AuthState::Anonymous), Navigation::Stay);
    /// ```
    pub fn observe(&mut self, state: &AuthState) -> Navigation {
        match guard(state, &self.login_path) {
            GuardDecision::Pending => {
                self.redirected = false;
                Navigation::Pending
            }
            GuardDecision::Render => {
                self.redirected = false;
                Navigation::Render
            }
            GuardDecision::Redirect(path) => {
                if self.redirected {
                    Navigation::Stay
                } else {
                    self.redirected = true;
                    Navigation::Redirect(path)
                }
            }
        }
    }
}
