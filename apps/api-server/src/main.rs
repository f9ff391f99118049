//! # Redator API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use redator_core::ports::{RateLimiter, TokenVerifier};
use redator_infra::JwtTokenVerifier;

mod config;
mod handlers;
mod middleware;
mod observability;
mod sessions;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Redator API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;
    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwtTokenVerifier::new(config.jwt.clone()));
    let rate_limiter = build_rate_limiter(&config);

    HttpServer::new(move || {
        let app = App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(verifier.clone()));

        let app = match &rate_limiter {
            Some(limiter) => app.app_data(web::Data::new(limiter.clone())),
            None => app,
        };

        app.configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(feature = "rate-limit")]
fn build_rate_limiter(config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
    use redator_infra::InMemoryRateLimiter;

    tracing::info!(
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "AI rate limiting enabled"
    );
    Some(Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())))
}

#[cfg(not(feature = "rate-limit"))]
fn build_rate_limiter(_config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
    tracing::info!("Built without the rate-limit feature; AI endpoints are not throttled");
    None
}
