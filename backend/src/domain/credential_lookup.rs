//! Credential lookup.
//!
//! A linear scan over the credential records: the first active record whose
//! username or email equals the identifier and whose hash verifies the
//! password wins. Nothing is trimmed or case-folded.

use tracing::warn;

use super::{Credential, PasswordHasher};

/// Find the credential matching `identifier` and `password`.
///
/// Inactive records never match. A record whose stored hash cannot be parsed
/// is skipped with a warning. Failure is silent: `None` does not say whether
/// the identifier or the password was wrong.
///
/// # Examples
/// ```
/// use campaign_auth::domain::{validate_credential, HashCost, PasswordHasher};
///
/// let hasher = PasswordHasher::new(HashCost::MINIMAL).expect("valid cost");
/// assert!(validate_credential(&[], &hasher, "lider@campana.com", "12345678").is_none());
/// ```
pub fn validate_credential<'a>(
    records: &'a [Credential],
    hasher: &PasswordHasher,
    identifier: &str,
    password: &str,
) -> Option<&'a Credential> {
    records
        .iter()
        .filter(|record| record.is_active() && record.matches_identifier(identifier))
        .find(|record| match hasher.verify(password, record.password_hash()) {
            Ok(matched) => matched,
            Err(error) => {
                warn!(
                    credential_id = %record.id(),
                    %error,
                    "skipping credential with unusable password hash"
                );
                false
            }
        })
}
