use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::{header, HeaderValue, Method};
use tokio::sync::broadcast;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use kelme_booking::config::AppConfig;
use kelme_booking::db;
use kelme_booking::handlers;
use kelme_booking::services::delivery::log::LogSink;
use kelme_booking::services::delivery::webhook::WebhookSink;
use kelme_booking::services::delivery::BookingSink;
use kelme_booking::services::i18n::Catalogs;
use kelme_booking::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let catalogs = Catalogs::load()?;

    let sink: Box<dyn BookingSink> = match &config.webhook_url {
        Some(url) => {
            if config.webhook_secret.is_empty() {
                tracing::warn!("BOOKING_WEBHOOK_SECRET not set, webhook requests will be unsigned");
            }
            tracing::info!("delivering bookings to webhook (url: {url})");
            Box::new(WebhookSink::new(url.clone(), config.webhook_secret.clone()))
        }
        None => {
            tracing::info!("BOOKING_WEBHOOK_URL not set, bookings will only be logged");
            Box::new(LogSink)
        }
    };

    let cors = match &config.allowed_origin {
        Some(origin) => {
            let origin: HeaderValue = origin
                .parse()
                .map_err(|_| anyhow::anyhow!("ALLOWED_ORIGIN is not a valid header value: {origin}"))?;
            CorsLayer::new()
                .allow_origin(AllowOrigin::exact(origin))
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        }
        None => CorsLayer::permissive(),
    };

    let (submissions_tx, _) = broadcast::channel(256);

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        sink,
        catalogs,
        sessions: Mutex::new(HashMap::new()),
        submissions_tx,
    });

    let app = handlers::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
