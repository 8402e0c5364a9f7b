//! Service entry point: load configuration, initialise logging and serve.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use yt2mp3::config::AppConfig;
use yt2mp3::inbound::http::health::HealthState;
use yt2mp3::inbound::http::session_config::BuildMode;
use yt2mp3::inbound::http::session_config::fingerprint::key_fingerprint;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .inspect_err(|err| error!(error = %err, "invalid configuration"))
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&config.session.key),
        "session signing key loaded"
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::from_app_config(&config)?)?;
    info!(addr = %config.bind_addr, "server listening");
    server.await
}
