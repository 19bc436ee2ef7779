use std::net::SocketAddr;

use axum::{routing::get, Json, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::StorageConfig;
use crate::state::AppState;
use crate::{auth, categorias, contenido, fotos, ingredientes, productos, recetas, ventas};

pub fn build_app(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth::router())
        .merge(categorias::router())
        .merge(productos::router())
        .merge(ingredientes::router())
        .merge(recetas::router())
        .merge(ventas::router())
        .merge(fotos::router())
        .merge(contenido::router());

    let mut app = Router::new()
        .nest("/api", api)
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({ "status": "ok" })) }),
        );

    // Locally stored uploads are served straight off the filesystem; the S3
    // backend serves its own URLs.
    if let StorageConfig::Local { base_dir, .. } = &state.config.storage {
        app = app.nest_service("/uploads", ServeDir::new(base_dir));
    }

    app.with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    // Route registration panics on conflicting paths, so building the full
    // router is itself a regression test.
    #[tokio::test]
    async fn router_builds_with_every_route() {
        let _app = build_app(AppState::fake());
    }
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "3000".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
