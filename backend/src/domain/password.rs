//! Salted password hashing.
//!
//! Stored secrets are Argon2 PHC strings. Verification reads the cost
//! parameters from the stored hash, so credentials hashed under different
//! costs verify side by side.

use std::fmt;

use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};

/// Errors raised while hashing or verifying passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// Stored hash was empty.
    #[error("password hash must not be empty")]
    EmptyHash,
    /// Stored hash is not a parseable PHC string.
    #[error("malformed password hash: {message}")]
    MalformedHash {
        /// Parser diagnostic.
        message: String,
    },
    /// Cost parameters were rejected.
    #[error("invalid hashing cost: {message}")]
    InvalidCost {
        /// Parameter diagnostic.
        message: String,
    },
    /// Hashing failed.
    #[error("failed to hash password: {message}")]
    Hashing {
        /// Hasher diagnostic.
        message: String,
    },
}

/// Stored Argon2 PHC string.
///
/// Only emptiness is checked on construction; a malformed value surfaces as
/// [`PasswordError::MalformedHash`] when it is verified.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a stored PHC string.
    pub fn new(value: impl Into<String>) -> Result<Self, PasswordError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(PasswordError::EmptyHash);
        }
        Ok(Self(value))
    }

    /// PHC string form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl HashCost {
    /// Cheapest cost accepted by Argon2; for tests and demo fixtures only.
    pub const MINIMAL: Self = Self {
        memory_kib: Params::MIN_M_COST,
        iterations: Params::MIN_T_COST,
        parallelism: Params::MIN_P_COST,
    };
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id hasher and verifier.
///
/// # Examples
/// ```
/// use campaign_auth::domain::{HashCost, PasswordHasher};
///
/// let hasher = PasswordHasher::new(HashCost::MINIMAL).expect("valid cost");
/// let hash = hasher.hash("12345678").expect("hash password");
/// assert_eq!(hasher.verify("12345678", &hash), Ok(true));
/// assert_eq!(hasher.verify("12345678 ", &hash), Ok(false));
/// ```
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Build a hasher with explicit cost parameters.
    pub fn new(cost: HashCost) -> Result<Self, PasswordError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|error| PasswordError::InvalidCost {
                message: error.to_string(),
            })?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<PasswordHash, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|error| PasswordError::Hashing {
                message: error.to_string(),
            })?;
        Ok(PasswordHash(hash.to_string()))
    }

    /// Verify `password` against `hash`.
    ///
    /// Returns `Ok(false)` on mismatch and an error only when the stored hash
    /// cannot be parsed or uses an unsupported algorithm.
    pub fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordError> {
        let parsed = PhcHash::new(hash.as_str()).map_err(|error| PasswordError::MalformedHash {
            message: error.to_string(),
        })?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(PasswordError::MalformedHash {
                message: error.to_string(),
            }),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(HashCost::MINIMAL).expect("minimal cost is valid")
    }

    #[rstest]
    fn verifies_matching_password(hasher: PasswordHasher) {
        let hash = hasher.hash("master123").expect("hash");
        assert_eq!(hasher.verify("master123", &hash), Ok(true));
    }

    #[rstest]
    #[case("master124")]
    #[case("master123 ")]
    #[case(" master123")]
    #[case("")]
    fn rejects_near_misses(hasher: PasswordHasher, #[case] attempt: &str) {
        let hash = hasher.hash("master123").expect("hash");
        assert_eq!(hasher.verify(attempt, &hash), Ok(false));
    }

    #[rstest]
    fn salts_each_hash(hasher: PasswordHasher) {
        let first = hasher.hash("same").expect("hash");
        let second = hasher.hash("same").expect("hash");
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    fn default_hasher_verifies_hashes_made_at_other_costs(hasher: PasswordHasher) {
        let hash = hasher.hash("votante1").expect("hash");
        assert_eq!(PasswordHasher::default().verify("votante1", &hash), Ok(true));
    }

    #[rstest]
    #[case("not-a-phc-string")]
    #[case("argon2id:plain")]
    fn malformed_hash_is_an_error(hasher: PasswordHasher, #[case] stored: &str) {
        let hash = PasswordHash::new(stored).expect("non-empty");
        assert!(matches!(
            hasher.verify("anything", &hash),
            Err(PasswordError::MalformedHash { .. })
        ));
    }

    #[test]
    fn empty_hash_is_rejected() {
        assert_eq!(PasswordHash::new("  "), Err(PasswordError::EmptyHash));
    }

    #[test]
    fn debug_redacts_hash() {
        let hash = PasswordHash::new("$argon2id$secret").expect("non-empty");
        assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
    }
}
