use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crafty::{config, db, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crafty=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();
    tracing::info!("Starting crafty ({})", config.app_env);

    let db = match db::init_pool(&config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::serve(db, &config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
