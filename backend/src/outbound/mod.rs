//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **credentials**: repository backed by the JSON credential registry
//! - **storage**: in-memory and file-backed session stores
//! - **n8n**: reqwest-backed automation webhook dispatcher
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod credentials;
pub mod n8n;
pub mod storage;
