//! Session manager: the authentication state machine.
//!
//! Holds the current user, persists it under [`ELECTORAL_USER_KEY`] in a
//! [`SessionStore`] and restores it on start-up. States move
//! `Loading -> Anonymous | Authenticated` on restore, `-> Authenticated` on a
//! successful login and `-> Anonymous` on logout.

use std::sync::Arc;

use tokio::task;
use tracing::{info, warn};

use super::ports::{CredentialRepository, CredentialRepositoryError, SessionStore, SessionStoreError};
use super::{
    Error, LoginCredentials, PasswordHasher, Permission, SessionUser, validate_credential,
};

/// Storage key holding the serialised [`SessionUser`].
pub const ELECTORAL_USER_KEY: &str = "electoral_user";

/// Message returned for every failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";

/// Authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Persisted state has not been read yet.
    Loading,
    /// No user is logged in.
    Anonymous,
    /// A user is logged in.
    Authenticated(SessionUser),
}

/// Login, logout and restore over a session store.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use campaign_auth::domain::ports::FixtureCredentialRepository;
/// use campaign_auth::domain::{AuthState, SessionManager, PasswordHasher};
/// use campaign_auth::outbound::storage::MemorySessionStore;
///
/// let mut manager = SessionManager::new(
///     Arc::new(FixtureCredentialRepository),
///     PasswordHasher::default(),
///     MemorySessionStore::default(),
/// );
/// assert!(manager.is_loading());
/// manager.restore().expect("restore from empty store");
/// assert_eq!(manager.state(), &AuthState::Anonymous);
/// ```
pub struct SessionManager<S> {
    credentials: Arc<dyn CredentialRepository>,
    hasher: PasswordHasher,
    store: S,
    state: AuthState,
}

impl<S: SessionStore> SessionManager<S> {
    /// Build a manager in the [`AuthState::Loading`] state.
    pub fn new(credentials: Arc<dyn CredentialRepository>, hasher: PasswordHasher, store: S) -> Self {
        Self {
            credentials,
            hasher,
            store,
            state: AuthState::Loading,
        }
    }

    /// Read the persisted user and leave the loading state.
    ///
    /// A blob that fails to decode is removed from the store and the state
    /// becomes anonymous. A store read failure also leaves the state
    /// anonymous and is returned to the caller.
    pub fn restore(&mut self) -> Result<&AuthState, Error> {
        let raw = match self.store.get(ELECTORAL_USER_KEY) {
            Ok(raw) => raw,
            Err(error) => {
                self.state = AuthState::Anonymous;
                return Err(map_store_error(&error));
            }
        };
        let Some(raw) = raw else {
            self.state = AuthState::Anonymous;
            return Ok(&self.state);
        };
        match serde_json::from_str::<SessionUser>(&raw) {
            Ok(user) => self.state = AuthState::Authenticated(user),
            Err(error) => {
                warn!(%error, key = ELECTORAL_USER_KEY, "discarding corrupt session blob");
                self.state = AuthState::Anonymous;
                self.store
                    .remove(ELECTORAL_USER_KEY)
                    .map_err(|error| map_store_error(&error))?;
            }
        }
        Ok(&self.state)
    }

    /// Authenticate and persist the resulting session user.
    ///
    /// On failure the state and the store are left untouched and the error is
    /// always `unauthorized: invalid credentials`, whichever half was wrong.
    /// Password verification runs on the blocking thread pool.
    pub async fn login(&mut self, credentials: &LoginCredentials) -> Result<SessionUser, Error> {
        let records = self
            .credentials
            .list()
            .await
            .map_err(|error| map_repository_error(&error))?;
        let hasher = self.hasher.clone();
        let attempt = credentials.clone();
        let matched = task::spawn_blocking(move || {
            validate_credential(&records, &hasher, attempt.identifier(), attempt.password())
                .cloned()
        })
        .await
        .map_err(|error| Error::internal(format!("credential verification failed: {error}")))?;
        let Some(record) = matched else {
            info!(identifier = credentials.identifier(), "login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };

        let user = SessionUser::from(&record);
        let blob = serde_json::to_string(&user)
            .map_err(|error| Error::internal(format!("failed to encode session user: {error}")))?;
        self.store
            .set(ELECTORAL_USER_KEY, &blob)
            .map_err(|error| map_store_error(&error))?;
        info!(user_id = %user.id(), role = %user.role(), "login succeeded");
        self.state = AuthState::Authenticated(user.clone());
        Ok(user)
    }

    /// Clear the current user and delete the storage key.
    pub fn logout(&mut self) -> Result<(), Error> {
        self.store
            .remove(ELECTORAL_USER_KEY)
            .map_err(|error| map_store_error(&error))?;
        if let AuthState::Authenticated(user) = &self.state {
            info!(user_id = %user.id(), "logout");
        }
        self.state = AuthState::Anonymous;
        Ok(())
    }

    /// Current authentication state.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Logged-in user, if any.
    pub fn current_user(&self) -> Option<&SessionUser> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Loading | AuthState::Anonymous => None,
        }
    }

    /// Whether a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    /// Whether [`Self::restore`] has not run yet.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, AuthState::Loading)
    }

    /// `false` unless a user is logged in and holds `permission`.
    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.current_user()
            .is_some_and(|user| user.has_permission(permission))
    }

    /// Release the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}

fn map_store_error(error: &SessionStoreError) -> Error {
    Error::internal(error.to_string())
}

fn map_repository_error(error: &CredentialRepositoryError) -> Error {
    warn!(%error, "credential repository unavailable");
    Error::service_unavailable("credential store unavailable")
}
