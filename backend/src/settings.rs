//! Server configuration loaded via OrthoConfig.
//!
//! Automation delivery settings carry OrthoConfig defaults so the service
//! starts with no configuration at all. The remaining fields are optional and
//! their accessors fall back to a local deployment against the bundled demo
//! registry.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{LoginPath, LoginPathError, RetryPolicy};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_N8N_BASE_URL: &str = "http://localhost:5678";
const DEFAULT_N8N_ATTEMPTS: u32 = 3;
const DEFAULT_N8N_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_N8N_BACKOFF_MS: u64 = 1_000;

/// Bundled demo registry shipped with the credential-registry crate.
pub fn default_registry_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("crates")
        .join("credential-registry")
        .join("fixtures")
        .join("demo-credentials.json")
}

/// Settings for the HTTP service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CAMPAIGN_AUTH")]
pub struct ServerSettings {
    /// Socket address to bind.
    pub bind_addr: Option<SocketAddr>,
    /// Credential registry file.
    pub registry_path: Option<PathBuf>,
    /// Path browsers are redirected to when a session is missing.
    pub login_path: Option<String>,
    /// Base URL of the n8n automation server.
    #[ortho_config(default = DEFAULT_N8N_BASE_URL.to_owned())]
    pub n8n_base_url: String,
    /// Delivery attempts per automation trigger.
    #[ortho_config(default = DEFAULT_N8N_ATTEMPTS)]
    pub n8n_attempts: u32,
    /// Timeout applied to each delivery attempt, in milliseconds.
    #[ortho_config(default = DEFAULT_N8N_TIMEOUT_MS)]
    pub n8n_timeout_ms: u64,
    /// Linear backoff step between attempts, in milliseconds.
    #[ortho_config(default = DEFAULT_N8N_BACKOFF_MS)]
    pub n8n_backoff_ms: u64,
}

impl ServerSettings {
    /// Return the bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(SocketAddr::V4(SocketAddrV4::new(
            Ipv4Addr::UNSPECIFIED,
            DEFAULT_PORT,
        )))
    }

    /// Return the registry path, falling back to the bundled demo registry.
    pub fn registry_path(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(default_registry_path)
    }

    /// Validate and return the login path, falling back to `/login`.
    pub fn login_path(&self) -> Result<LoginPath, LoginPathError> {
        self.login_path
            .as_deref()
            .map_or_else(|| Ok(LoginPath::default()), LoginPath::new)
    }

    /// Parse and return the automation server base URL.
    pub fn n8n_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.n8n_base_url)
    }

    /// Build the delivery retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.n8n_attempts,
            Duration::from_millis(self.n8n_timeout_ms),
            Duration::from_millis(self.n8n_backoff_ms),
        )
    }
}
