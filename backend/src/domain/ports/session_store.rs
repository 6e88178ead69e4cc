//! Driven port for the key/value store backing a session.
//!
//! Mirrors browser local storage: string keys, string values, and removal
//! that deletes the key rather than blanking it. Implementations use interior
//! mutability so a store can be shared by reference.

use super::define_port_error;

define_port_error! {
    /// Errors raised by session storage backends.
    pub enum SessionStoreError {
        /// Reading a key failed.
        Read { key: String, message: String } => "failed to read session key {key}: {message}",
        /// Writing a key failed.
        Write { key: String, message: String } => "failed to write session key {key}: {message}",
        /// Removing a key failed.
        Remove { key: String, message: String } => "failed to remove session key {key}: {message}",
    }
}

/// String key/value storage for session state.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError>;

    /// Delete `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), SessionStoreError>;
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        (**self).remove(key)
    }
}
