// Main entry point for the moderation API server

use anyhow::{Context, Result};
use moderation_core::domains::auth::{IdentityProvider, JwtService};
use moderation_core::kernel::ServerDeps;
use moderation_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn connect(url: &str, max_connections: u32, name: &str) -> Result<PgPool> {
    tracing::info!(pool = name, "Connecting to database...");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .with_context(|| format!("Failed to connect to {} database", name))
}

/// Migrations for the blog tables and the history table are kept apart so
/// the history log can live in its own database. When both share one
/// database each migrator must tolerate the other's applied versions.
async fn migrate(pool: &PgPool, history_pool: &PgPool) -> Result<()> {
    tracing::info!("Running database migrations...");

    let mut blogs = sqlx::migrate!("./migrations");
    blogs.set_ignore_missing(true);
    blogs
        .run(pool)
        .await
        .context("Failed to run blog migrations")?;

    let mut history = sqlx::migrate!("./history_migrations");
    history.set_ignore_missing(true);
    history
        .run(history_pool)
        .await
        .context("Failed to run history migrations")?;

    tracing::info!("Migrations complete");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,moderation_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting blog moderation API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let pool = connect(&config.database_url, config.database_max_connections, "primary").await?;
    let history_pool = if config.history_database_url == config.database_url {
        pool.clone()
    } else {
        connect(
            &config.history_database_url,
            config.database_max_connections,
            "history",
        )
        .await?
    };
    migrate(&pool, &history_pool).await?;

    let identity = IdentityProvider::new(
        JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()),
        config.roles_claim.clone(),
    );
    let deps = ServerDeps::postgres(pool, history_pool, config.history_timeout, identity);

    // Build application
    let app = build_app(deps, config.rate_limit_enabled)?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
