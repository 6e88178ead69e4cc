//! Campaign access control library.
//!
//! Layout follows ports and adapters:
//! - [`domain`]: credentials, sessions, permissions, route guards and
//!   automation triggers.
//! - [`inbound`]: actix-web handlers over the domain services.
//! - [`outbound`]: credential registry, session stores and the n8n client.
//! - [`middleware`]: request tracing and the browser session gate.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::{RequireSession, Trace};
