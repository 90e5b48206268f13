//! # Blog CMS API Server
//!
//! Actix-web HTTP server plus the scheduled publication sweeper.

use actix_web::{App, HttpServer, web};
use tokio_util::sync::CancellationToken;
use tracing_actix_web::TracingLogger;

mod background;
mod config;
mod handlers;
mod middleware;
mod seed;
mod services;
mod state;
mod telemetry;
mod validation;

use background::ScheduledPublisher;
use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Blog CMS API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(config.database.as_ref(), config.jwt.clone()).await;

    if let Some(seed) = &config.seed_admin {
        let seeded = match state.user_service.user_count().await {
            Ok(count) => seed::seed_admin(&state.user_service, count, seed).await,
            Err(e) => Err(e),
        };
        if let Err(e) = seeded {
            tracing::error!(error = %e, "Admin seeding failed");
        }
    }

    if let Err(e) = seed::seed_categories(state.categories.as_ref()).await {
        tracing::error!(error = %e, "Category seeding failed");
    }

    let shutdown = CancellationToken::new();
    let publisher = ScheduledPublisher::new(state.posts.clone(), config.publisher.clone())
        .spawn(shutdown.clone());

    let result = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    shutdown.cancel();
    if let Some(handle) = publisher {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Scheduled publisher task panicked");
        }
    }

    tracing::info!("Server stopped");
    result
}
