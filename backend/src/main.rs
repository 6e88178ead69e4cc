//! Service entry-point: loads configuration, wires adapters and serves the
//! REST API.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use campaign_auth::domain::{AutomationService, PasswordHasher};
use campaign_auth::inbound::http::health::HealthState;
use campaign_auth::inbound::http::session_config::fingerprint::key_fingerprint;
use campaign_auth::inbound::http::session_config::{BuildMode, session_settings_from_env};
use campaign_auth::inbound::http::state::HttpState;
use campaign_auth::outbound::credentials::RegistryCredentialRepository;
use campaign_auth::outbound::n8n::N8nWebhookClient;
use campaign_auth::settings::ServerSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let http_state = build_http_state(&settings)?;
    let config = ServerConfig::new(session, settings.bind_addr())
        .with_login_path(settings.login_path().map_err(io::Error::other)?);
    info!(bind_addr = %config.bind_addr(), "starting server");

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, http_state, config)?.await
}

fn build_http_state(settings: &ServerSettings) -> io::Result<HttpState> {
    let hasher = PasswordHasher::default();
    let registry_path = settings.registry_path();
    let credentials =
        RegistryCredentialRepository::load(&registry_path, &hasher).map_err(io::Error::other)?;

    let policy = settings.retry_policy();
    let base_url = settings.n8n_base_url().map_err(io::Error::other)?;
    let dispatcher = N8nWebhookClient::new(base_url, policy.attempt_timeout)
        .map_err(io::Error::other)?;
    info!(n8n = %dispatcher.base_url(), attempts = policy.max_attempts, "automation client ready");

    Ok(HttpState::new(
        Arc::new(credentials),
        hasher,
        AutomationService::new(Arc::new(dispatcher), policy),
    ))
}
