mod application;
mod config;
mod errors;
mod mail;
mod routes;
mod state;
mod storage;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::mail::SmtpMailer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::UploadStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting intake v{}", env!("CARGO_PKG_VERSION"));

    // One SMTP transport per sender identity, alive for the whole process
    let applicant_mailer = SmtpMailer::from_config(&config.applicant_mailer)
        .context("failed to configure applicant mailer")?;
    let admin_mailer = SmtpMailer::from_config(&config.admin_mailer)
        .context("failed to configure admin mailer")?;
    info!(
        host = %config.applicant_mailer.host,
        port = config.applicant_mailer.port,
        "SMTP transports initialized"
    );

    let uploads = UploadStore::new(&config.upload_dir, config.max_upload_bytes);
    info!(
        dir = %uploads.dir().display(),
        max_bytes = uploads.max_file_bytes(),
        "Upload store configured"
    );

    let cors = build_cors(&config.cors_origin)?;

    let state = AppState {
        config: config.clone(),
        uploads,
        applicant_mailer: Arc::new(applicant_mailer),
        admin_mailer: Arc::new(admin_mailer),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Only the configured frontend origin may call the API from a browser.
fn build_cors(origin: &str) -> Result<CorsLayer> {
    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("CORS_ORIGIN '{origin}' is not a valid header value"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request()))
}
