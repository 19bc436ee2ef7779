use std::time::Duration;

mod app;
mod auth;
mod categorias;
mod config;
mod contenido;
mod error;
mod fotos;
mod ingredientes;
mod productos;
mod recetas;
mod state;
mod storage;
mod ventas;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "dulzura_backend=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&app_state.db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    // Hourly sweep of expired refresh tokens.
    let sweep_db = app_state.db.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            if let Err(e) = auth::services::sweep_expired_tokens(&sweep_db).await {
                tracing::warn!(error = %e, "token sweep failed");
            }
        }
    });

    let app = app::build_app(app_state);
    app::serve(app).await
}
