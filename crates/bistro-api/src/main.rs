//! # Bistro Boss Server
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export MONGODB_URI=mongodb://localhost:27017
//! export ACCESS_TOKEN_SECRET=...
//! export STRIPE_SECRET_KEY=sk_test_...
//!
//! # Run the server
//! bistro-boss
//! ```

use bistro_api::{routes, AppConfig, AppState};
use bistro_core::{SharedGateway, SharedStore};
use bistro_mongo::{MongoConfig, MongoStore};
use bistro_stripe::StripeIntentGateway;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Print banner
    print_banner();

    let config = AppConfig::from_env()?;
    let addr = config.socket_addr()?;

    let mongo_config = MongoConfig::from_env()?;
    let mongo = MongoStore::connect(&mongo_config).await.map_err(|e| {
        error!("Failed to connect to MongoDB: {}", e);
        anyhow::anyhow!("MongoDB connection failed: {}", e)
    })?;

    let gateway = StripeIntentGateway::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;
    info!(
        "Stripe mode: {}",
        if gateway.config().is_live_mode() { "live" } else { "test" }
    );

    let store: SharedStore = Arc::new(mongo.clone());
    let gateway: SharedGateway = Arc::new(gateway);
    let app = routes::create_router(AppState::new(config, store, gateway));

    info!("🍽️  Bistro Boss starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    mongo.shutdown().await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

fn print_banner() {
    println!(
        r#"
  🍽️  Bistro Boss Server
  ━━━━━━━━━━━━━━━━━━━━━━━
  Menu, carts and payments
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
