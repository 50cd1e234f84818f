use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schoolerp_api::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use schoolerp_api::background::orphan_sweep;
use schoolerp_api::config::ServerConfig;
use schoolerp_api::router::build_app_router;
use schoolerp_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None | Some("serve") => serve().await,
        Some("hash-password") => {
            let password = args
                .next()
                .context("usage: schoolerp-api hash-password <password>")?;
            print_password_hash(&password)
        }
        Some(other) => bail!("unknown command '{other}' (expected: serve, hash-password)"),
    }
}

/// Print the PHC string to put into `ADMIN_PASSWORD_HASH`.
fn print_password_hash(password: &str) -> anyhow::Result<()> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH).map_err(anyhow::Error::msg)?;
    let hash = hash_password(password).map_err(|e| anyhow::anyhow!("hashing failed: {e}"))?;
    println!("{hash}");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "schoolerp_api=debug,schoolerp_storage=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve() -> anyhow::Result<()> {
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        public_origin = %config.public_origin,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = schoolerp_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    schoolerp_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    schoolerp_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Image store ---
    let images = schoolerp_storage::connect(&config.storage)
        .await
        .context("Failed to initialise image store")?;

    // --- Orphan sweep ---
    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    let sweep_handle = if config.orphan_sweep.interval_secs > 0 {
        Some(tokio::spawn(orphan_sweep::run(
            pool.clone(),
            Arc::clone(&images),
            config.orphan_sweep,
            sweep_cancel.clone(),
        )))
    } else {
        tracing::info!("Orphan sweep disabled (ORPHAN_SWEEP_INTERVAL_SECS=0)");
        None
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        images,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse::<std::net::IpAddr>().context("Invalid HOST address")?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    if let Some(handle) = sweep_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Orphan sweep stopped");
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
