//! 3meals hosted API
//!
//! Proxies plan generation and meal alternatives to Gemini and stores
//! email-gated plans in the configured backend.
//!
//! # Configuration
//!
//! Read from the same config file and environment as the CLI:
//! - `THREEMEALS_CONFIG`: Path to config file (default: ~/.config/threemeals/config.yaml)
//! - `THREEMEALS_PORT`: Port to listen on (default: 8080)
//! - `GEMINI_API_KEY`: Model API key (model routes return 500 without it)
//! - `THREEMEALS_STORAGE`: `sqlite` (default) or `kv`
//! - `THREEMEALS_DATA_DIR` / `THREEMEALS_DATABASE_PATH`: where data lives
//!
//! # Endpoints
//!
//! - `GET /health`: Health check
//! - `POST /api/generate-plan`: Preferences in, meal plan out
//! - `POST /api/get-alternatives`: Three replacement meals
//! - `POST /api/save-email`: Store a plan under an email
//! - `POST /api/get-plan`: Look a plan up by email
//! - `GET /api/emails`: The email log, newest first

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use threemeals::config::Config;
use threemeals::gemini::model_from_config;
use threemeals::persistence::open_backend;
use threemeals::server::{router, AppState};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "threemeals=info,threemeals_server=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::load(std::env::var_os("THREEMEALS_CONFIG").map(Into::into)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::create_dir_all(&config.data_dir.value) {
        tracing::error!("Failed to create data directory: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Data directory: {}", config.data_dir.value.display());

    let persistence = match open_backend(&config).await {
        Ok(persistence) => persistence,
        Err(e) => {
            tracing::error!(
                "Failed to open {} storage: {}",
                config.storage_backend.value,
                e
            );
            std::process::exit(1);
        }
    };
    let (generator, alternatives) = model_from_config(&config);

    let app = router(AppState {
        generator,
        alternatives,
        persistence,
    });

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port.value));
    tracing::info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
