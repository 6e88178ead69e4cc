//! Cookie-backed session storage for HTTP handlers.
//!
//! [`SessionContext`] wraps the Actix session and implements the domain
//! [`SessionStore`] port, so the same [`crate::domain::SessionManager`] that
//! drives the CLI drives the HTTP adapter. The session user lives in the
//! private session cookie under `electoral_user`.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{AuthState, Error, SessionUser};

use super::state::HttpState;

/// Message returned when a route needs a logged-in user.
pub const LOGIN_REQUIRED_MESSAGE: &str = "login required";

/// Newtype over the Actix session exposing the session store port.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the request session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Restore the authentication state stored in this session.
    ///
    /// Corrupt blobs are removed and read as anonymous.
    pub fn auth_state(&self, state: &HttpState) -> Result<AuthState, Error> {
        let mut manager = state.session_manager(self);
        manager.restore().cloned()
    }

    /// Require a logged-in user or return `401 Unauthorized`.
    pub fn require_user(&self, state: &HttpState) -> Result<SessionUser, Error> {
        match self.auth_state(state)? {
            AuthState::Authenticated(user) => Ok(user),
            AuthState::Loading | AuthState::Anonymous => {
                Err(Error::unauthorized(LOGIN_REQUIRED_MESSAGE))
            }
        }
    }

    /// Issue a fresh session identifier, keeping the stored values.
    pub fn renew(&self) {
        self.0.renew();
    }
}

impl SessionStore for SessionContext {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        self.0
            .get::<String>(key)
            .map_err(|error| SessionStoreError::read(key, error.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        self.0
            .insert(key, value)
            .map_err(|error| SessionStoreError::write(key, error.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        self.0.remove(key);
        Ok(())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
