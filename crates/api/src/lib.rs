//! # Slotbook API
//!
//! The API crate provides the web server for the Slotbook appointment service.
//! It exposes JSON endpoints for services, weekly availability, free slot
//! lookup and bookings.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Validate input and call into storage and the booking core
//! - **Middleware**: Bearer token authentication and error mapping
//! - **Config**: Environment-driven configuration
//!
//! Storage and authentication sit behind traits held in [`ApiState`], so the
//! same router runs against PostgreSQL, the in-memory store, or test doubles.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::Result;
use slotbook_core::repository::Store;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use middleware::auth::{AuthProvider, SupabaseAuth};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Users, services, availability and bookings
    pub store: Arc<dyn Store>,
    /// Bearer token verification
    pub auth: Arc<dyn AuthProvider>,
}

impl ApiState {
    pub fn new(store: Arc<dyn Store>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { store, auth }
    }
}

/// Builds the router with every endpoint and request tracing attached.
///
/// CORS and timeouts are deployment concerns and are added by [`start_server`].
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check and session endpoints
        .merge(routes::health::routes())
        // User role endpoints
        .merge(routes::user::routes())
        // Service catalogue endpoints
        .merge(routes::service::routes())
        // Availability and free slot endpoints
        .merge(routes::availability::routes())
        // Booking endpoints
        .merge(routes::booking::routes())
        // Attach shared state to all routes
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let allow_origin = match origins {
        Some(origins) => AllowOrigin::list(origins.iter().filter_map(|origin| {
            match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            }
        })),
        None => AllowOrigin::mirror_request(),
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(allow_origin)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and store
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # async fn run() -> eyre::Result<()> {
/// let config = slotbook_api::config::ApiConfig::from_env()?;
/// let store = Arc::new(slotbook_db::MemoryStore::new());
/// slotbook_api::start_server(config, store).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn Store>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let auth = Arc::new(SupabaseAuth::new(&config.auth_url, &config.auth_api_key));
    let state = Arc::new(ApiState::new(store, auth));

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(cors_layer(config.cors_origins.as_deref()))
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
