//! Field validation mirroring the backend's domain constraints.
//!
//! The backend owns the authoritative `Role`, `Email` and `Permission` types;
//! these checks keep a registry file from loading when the backend would later
//! refuse one of its records.

use chrono::{DateTime, NaiveDate, Utc};

/// Role names accepted by the backend, in declaration order.
pub const KNOWN_ROLES: [&str; 6] = [
    "desarrollador",
    "master",
    "candidato",
    "lider",
    "votante",
    "visitante",
];

/// Returns `true` when `role` names one of [`KNOWN_ROLES`].
///
/// # Examples
///
/// ```
/// use credential_registry::is_known_role;
///
/// assert!(is_known_role("lider"));
/// assert!(!is_known_role("Lider"));
/// ```
#[must_use]
pub fn is_known_role(role: &str) -> bool {
    KNOWN_ROLES.contains(&role)
}

/// Validates the shape of an email address.
///
/// Requires exactly one `@`, a non-empty local part, a domain containing a
/// dot that neither starts nor ends the domain, and no whitespace.
///
/// # Examples
///
/// ```
/// use credential_registry::is_valid_email;
///
/// assert!(is_valid_email("lider@campana.com"));
/// assert!(!is_valid_email("lider@campana"));
/// assert!(!is_valid_email(" lider@campana.com"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Validates a login username: non-empty, no whitespace, no `@`.
///
/// Usernames and emails share one lookup namespace, so a username must not
/// look like an email address.
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && !username.contains('@')
        && !username.chars().any(char::is_whitespace)
}

/// Validates a permission token.
///
/// Tokens are non-empty and restricted to ASCII letters, digits and the
/// separators `_`, `-`, `.` and `:`.
#[must_use]
pub fn is_valid_permission(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_permission_char)
}

const fn is_permission_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

/// Parses a `created` value given either as RFC 3339 or as `YYYY-MM-DD`.
///
/// Plain dates are interpreted as midnight UTC.
pub(crate) fn parse_created(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
