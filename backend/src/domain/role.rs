//! Campaign roles.
//!
//! Roles are a closed set with no hierarchy: what a user may do is decided by
//! their permission set alone, the role is descriptive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error returned when a role token is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {value}")]
pub struct UnknownRoleError {
    /// Offending token.
    pub value: String,
}

/// Campaign role assigned to a credential.
///
/// # Examples
/// ```
/// use campaign_auth::domain::Role;
///
/// let role: Role = "lider".parse().expect("known role");
/// assert_eq!(role, Role::Lider);
/// assert_eq!(role.as_str(), "lider");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Developer account with unrestricted access.
    Desarrollador,
    /// Campaign administrator.
    Master,
    /// Candidate.
    Candidato,
    /// Territorial leader.
    Lider,
    /// Registered voter.
    Votante,
    /// Read-only visitor.
    Visitante,
}

impl Role {
    /// Every role in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Desarrollador,
        Self::Master,
        Self::Candidato,
        Self::Lider,
        Self::Votante,
        Self::Visitante,
    ];

    /// Lowercase wire token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desarrollador => "desarrollador",
            Self::Master => "master",
            Self::Candidato => "candidato",
            Self::Lider => "lider",
            Self::Votante => "votante",
            Self::Visitante => "visitante",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRoleError {
                value: s.to_owned(),
            })
    }
}
