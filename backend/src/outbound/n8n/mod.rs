//! N8N outbound adapters.
//!
//! Thin HTTP implementation of the `WebhookDispatcher` port.

mod client;

pub use client::N8nWebhookClient;
