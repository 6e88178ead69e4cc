//! Session storage adapters.
//!
//! The HTTP adapter stores sessions in the cookie session instead; see
//! `inbound::http::session`.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
