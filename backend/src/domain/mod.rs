//! Domain primitives, services and ports.
//!
//! Purpose: define the authentication and access-control model independent
//! of HTTP, storage or the automation transport. Adapters in `inbound` and
//! `outbound` depend on this module, never the other way round.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Credential, Role, PermissionSet: the registry's view of a user.
//! - SessionUser: the projection persisted by a session.
//! - validate_credential, SessionManager: login, logout and restore.
//! - guard, RedirectTracker: protected-route decisions.
//! - AutomationService: permission-gated webhook triggering.

pub mod auth;
pub mod automation;
pub mod credential;
pub mod credential_lookup;
pub mod error;
pub mod panels;
pub mod password;
pub mod permission;
pub mod ports;
pub mod role;
pub mod route_guard;
pub mod session;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::automation::{
    AUTOMATIONS_PERMISSION, AutomationService, RetryPolicy, WebhookEvent, WebhookReceipt,
    WorkflowName, WorkflowNameError,
};
pub use self::credential::{
    Credential, CredentialId, CredentialParts, CredentialValidationError, Email, Username,
};
pub use self::credential_lookup::validate_credential;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::panels::{PANELS, Panel, visible_panels};
pub use self::password::{HashCost, PasswordError, PasswordHash, PasswordHasher};
pub use self::permission::{
    ALL_PERMISSIONS_TOKEN, Permission, PermissionSet, PermissionValidationError,
};
pub use self::role::{Role, UnknownRoleError};
pub use self::route_guard::{
    DEFAULT_LOGIN_PATH, GuardDecision, LoginPath, LoginPathError, Navigation, RedirectTracker,
    guard,
};
pub use self::session::{AuthState, ELECTORAL_USER_KEY, INVALID_CREDENTIALS_MESSAGE, SessionManager};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{SessionUser, has_permission};
