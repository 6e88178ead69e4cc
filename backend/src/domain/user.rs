//! Session user projection.
//!
//! [`SessionUser`] is what gets persisted under the session storage key once
//! a login succeeds. It is derived from a [`Credential`] and never contains
//! password material.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Credential, CredentialId, Email, Permission, PermissionSet, Role, Username};

/// Authenticated user as held by the session.
///
/// ## Invariants
/// - Carries no password or hash.
/// - Deserialisation rejects unknown fields, so a stored blob with extra
///   keys is treated as corrupt rather than silently accepted.
///
/// # Examples
/// ```
/// use campaign_auth::domain::SessionUser;
///
/// let json = r#"{
///     "id": "demo-lider",
///     "name": "Líder Territorial",
///     "username": "lider",
///     "email": "lider@campana.com",
///     "role": "lider",
///     "permissions": ["dashboard", "messaging", "navigation"],
///     "territory": "Norte",
///     "isDemoUser": true
/// }"#;
/// let user: SessionUser = serde_json::from_str(json).expect("valid session user");
/// assert!(user.permissions().allows_token("messaging"));
/// assert!(!user.permissions().allows_token("database"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct SessionUser {
    #[schema(value_type = String, example = "demo-lider")]
    id: CredentialId,
    #[schema(example = "Líder Territorial")]
    name: String,
    #[schema(value_type = String, example = "lider")]
    username: Username,
    #[schema(value_type = String, example = "lider@campana.com")]
    email: Email,
    role: Role,
    #[schema(value_type = Vec<String>, example = json!(["dashboard", "messaging"]))]
    permissions: PermissionSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Norte")]
    territory: Option<String>,
    is_demo_user: bool,
}

impl SessionUser {
    /// Identifier of the credential the user logged in with.
    pub fn id(&self) -> &CredentialId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Login username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Login email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Assigned role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Granted permissions.
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Territory scope label, if any.
    pub fn territory(&self) -> Option<&str> {
        self.territory.as_deref()
    }

    /// Whether this is a demo account.
    pub fn is_demo_user(&self) -> bool {
        self.is_demo_user
    }

    /// Whether the user holds `permission`, either literally or through `all`.
    pub fn has_permission(&self, permission: &Permission) -> bool {
        has_permission(self, permission)
    }
}

impl From<&Credential> for SessionUser {
    fn from(value: &Credential) -> Self {
        Self {
            id: value.id().clone(),
            name: value.name().to_owned(),
            username: value.username().clone(),
            email: value.email().clone(),
            role: value.role(),
            permissions: value.permissions().clone(),
            territory: value.territory().map(str::to_owned),
            is_demo_user: value.is_demo_user(),
        }
    }
}

/// Permission check: literal membership or the `all` wildcard.
pub fn has_permission(user: &SessionUser, permission: &Permission) -> bool {
    user.permissions.allows(permission)
}
