//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{select_backend, JsonProfileStore},
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState},
};
use axum::{
    http::{header::{ACCEPT, CONTENT_TYPE}, HeaderName, HeaderValue, Method},
    Router,
};
use learnwell_core::ContentGenerator;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Profile Store ---
    let store = Arc::new(JsonProfileStore::new(config.store_path.clone()));
    info!(path = %store.path().display(), "Using JSON profile store.");

    // --- 3. Choose the Generation Backend ---
    let generator = Arc::new(ContentGenerator::new(select_backend(&config)));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        generator,
    });

    // --- 5. Configure CORS ---
    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!(
            "Invalid CORS origin '{}': {}",
            config.cors_origin, e
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static(web::middleware::STUDENT_ID_HEADER),
            HeaderName::from_static(web::middleware::STUDENT_NAME_HEADER),
        ]);

    // --- 6. Create the Web Router ---
    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(web::router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 7. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
