use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wanderplan::{
    config::{app::load_app_config, catalog::load_catalog, database},
    core::catalog::seed_catalog,
    errors::Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = load_app_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!(
        share_base_url = %app_config.share_base_url,
        "Loaded application configuration."
    );

    // 4. Connect and make sure the schema exists
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed the reference catalog when a catalog file is present
    if app_config.catalog_path.exists() {
        let catalog = load_catalog(&app_config.catalog_path)?;
        seed_catalog(&db, &catalog)
            .await
            .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;
    } else {
        warn!(
            path = %app_config.catalog_path.display(),
            "Catalog file not found, skipping seeding"
        );
    }

    db.close().await?;
    info!("Bootstrap complete.");
    Ok(())
}
