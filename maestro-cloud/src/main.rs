//! maestro-cloud server binary

use std::net::SocketAddr;

use maestro_cloud::{AppState, BoxError, Config, api};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maestro_cloud=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting maestro-cloud (env: {})", config.environment);
    if config.admin_password_hash.is_none() {
        tracing::warn!("ADMIN_PASSWORD_HASH not set, superadmin login disabled");
    }

    let state = AppState::new(&config).await?;
    let app = api::build_app(&state).with_state(state.clone());

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    // Expired session sweep (hourly)
    let pool = state.pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match maestro_cloud::db::sessions::delete_expired(&pool, shared::util::now_millis())
                .await
            {
                Ok(0) => {}
                Ok(n) => tracing::info!(removed = n, "Expired sessions removed"),
                Err(e) => tracing::warn!("Session sweep failed: {e}"),
            }
        }
    });

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("maestro-cloud HTTP listening on {http_addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
