use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use urbansense_api::config::ServerConfig;
use urbansense_api::router::build_app_router;
use urbansense_api::state::AppState;
use urbansense_api::{auth, background};
use urbansense_core::roles::ROLE_ADMIN;
use urbansense_db::models::user::CreateUser;
use urbansense_db::repositories::{RoleRepo, UserRepo};
use urbansense_db::DbPool;
use urbansense_events::Broadcaster;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "urbansense_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = urbansense_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    urbansense_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    urbansense_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    ensure_bootstrap_admin(&pool).await;

    // --- Broadcast loop context ---
    let broadcaster = Broadcaster::new(pool.clone(), config.feed.clone());
    tracing::info!("Broadcaster created");

    // --- Demo reading generator ---
    let simulator_cancel = tokio_util::sync::CancellationToken::new();
    let simulator_handle = if config.simulator_enabled {
        let handle = tokio::spawn(background::simulator::run(
            pool.clone(),
            simulator_cancel.clone(),
        ));
        Some(handle)
    } else {
        tracing::info!("Reading simulator disabled");
        None
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        broadcaster: Arc::clone(&broadcaster),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if let Some(handle) = simulator_handle {
        simulator_cancel.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Reading simulator stopped");
    }

    broadcaster.shutdown().await;
    tracing::info!("Broadcast loop stopped, feed channels closed");

    tracing::info!("Graceful shutdown complete");
}

/// Create the initial admin account when the users table is empty.
///
/// Username and password come from `ADMIN_USERNAME` / `ADMIN_PASSWORD`;
/// the fallback password is for local development only and is logged as a
/// warning.
async fn ensure_bootstrap_admin(pool: &DbPool) {
    let count = UserRepo::count(pool)
        .await
        .expect("Failed to count user accounts");
    if count > 0 {
        return;
    }

    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        tracing::warn!("ADMIN_PASSWORD not set, using the development default");
        "change-me-now".into()
    });

    let password_hash =
        auth::password::hash_password(&password).expect("Failed to hash bootstrap password");

    let role_id = RoleRepo::find_id_by_name(pool, ROLE_ADMIN)
        .await
        .expect("Failed to look up admin role")
        .expect("Roles must be seeded by migrations");

    let user_id = UserRepo::create(
        pool,
        &CreateUser {
            username: username.clone(),
            email: format!("{username}@urbansense.local"),
            password_hash,
            role_id,
        },
    )
    .await
    .expect("Failed to create bootstrap admin");

    tracing::info!(user_id, username = %username, "Bootstrap admin account created");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
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
