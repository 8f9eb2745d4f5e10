//! # Todo API Server
//!
//! Multi-tenant to-do backend. Every task belongs to the subject of the
//! bearer token that created it; requests are authenticated with shared-secret
//! JWTs minted by the front end.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/todo JWT_SECRET=... cargo run -p todo-api
//! ```

use todo_api::{
    app::{build_router, AppState},
    config::Config,
};
use todo_shared::db::{migrations::run_migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_api=debug,todo_shared=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Todo API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let db = pool::create_pool(config.database.pool_config()).await?;

    if let Err(e) = run_migrations(&db).await {
        if config.database.schema_strict {
            return Err(e.into());
        }
        tracing::error!("Schema migration failed, continuing without it: {}", e);
    }

    let bind_address = config.bind_address();
    let state = AppState::new(db.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
