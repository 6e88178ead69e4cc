//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers live under [`http`]. The `session-cli` binary drives the
//! same domain services from the command line.

pub mod http;
