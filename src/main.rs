//! ParkShare server entry point
//!
//! Reads configuration from a TOML file (~/.config/parkshare/config.toml),
//! runs migrations and serves the REST API.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use parkshare::config::AppConfig;
use parkshare::domain::provider::RepositoryProvider;
use parkshare::domain::user::{User, UserRole};
use parkshare::infrastructure::crypto::jwt::JwtConfig;
use parkshare::infrastructure::crypto::password::hash_password;
use parkshare::infrastructure::database::migrator::Migrator;
use parkshare::{
    create_api_router, default_config_path, init_database, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PARKSHARE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting ParkShare...");

    // Prometheus recorder must be installed before any metrics calls
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    Migrator::up(&db, None).await?;
    info!("Migrations completed");

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    create_default_admin(repos.as_ref(), &app_cfg).await;

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "parkshare".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    let router = create_api_router(repos, jwt_config, prometheus_handle);

    // ── Serve ──────────────────────────────────────────────────
    let addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    }
    info!("ParkShare shutdown complete");
    Ok(())
}

/// Create the bootstrap admin account when the user table is empty.
async fn create_default_admin(repos: &dyn RepositoryProvider, app_cfg: &AppConfig) {
    let users_count = repos.users().count().await.unwrap_or(0);
    if users_count > 0 {
        return;
    }

    info!("Creating default admin user...");
    let password_hash = match hash_password(&app_cfg.admin.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return;
        }
    };

    let admin = User::new(
        app_cfg.admin.name.clone(),
        app_cfg.admin.email.clone(),
        password_hash,
        app_cfg.admin.phone.clone(),
        UserRole::Admin,
    );
    match repos.users().save(admin).await {
        Ok(()) => {
            info!("Default admin created: {}", app_cfg.admin.email);
            warn!("Please change the admin password immediately!");
        }
        Err(e) => error!("Failed to create admin user: {}", e),
    }
}
