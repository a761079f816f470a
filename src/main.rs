//! Easy Budget entitlement server.
//!
//! Configuration comes from `EASY_BUDGET__*` environment variables (and a
//! `.env` file in development). Without `EASY_BUDGET__DATABASE__URL` the
//! server runs against a seeded in-memory store.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use easy_budget::adapters::auth::JwtSessionValidator;
use easy_budget::adapters::http::{build_router, AppServices, HttpSettings};
use easy_budget::adapters::memory::InMemoryEntitlementStore;
use easy_budget::adapters::postgres::{
    PostgresAccountRepository, PostgresGrantReader, PostgresPromoCodeLedger,
};
use easy_budget::config::{AppConfig, ConfigError, DatabaseConfig, ServerConfig, ValidationError};
use easy_budget::ports::{AccountRepository, GrantReader, PromoCodeLedger};

#[derive(Debug, Error)]
enum StartupError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let addr = config.server.socket_addr()?;
    let (ledger, grants, accounts) = storage(&config.database).await?;

    let services = AppServices {
        ledger,
        grants,
        accounts,
        validator: Arc::new(JwtSessionValidator::new(&config.auth)),
        trial_policy: config.entitlement.trial_policy(),
    };
    let app = build_router(services, &HttpSettings::from_server_config(&config.server));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        trial_window_days = config.entitlement.trial_window_days,
        "Easy Budget entitlement server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

type Storage = (
    Arc<dyn PromoCodeLedger>,
    Arc<dyn GrantReader>,
    Arc<dyn AccountRepository>,
);

async fn storage(database: &DatabaseConfig) -> Result<Storage, StartupError> {
    if database.is_in_memory() {
        tracing::warn!("No database configured; using seeded in-memory store");
        let store = Arc::new(InMemoryEntitlementStore::seeded());
        return Ok((store.clone(), store.clone(), store));
    }

    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(Some(database.idle_timeout()))
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok((
        Arc::new(PostgresPromoCodeLedger::new(pool.clone())),
        Arc::new(PostgresGrantReader::new(pool.clone())),
        Arc::new(PostgresAccountRepository::new(pool)),
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
