pub mod config;
pub mod error;
pub mod prediction;
mod routes;
mod sanitize;
pub mod state;
mod vision;

use axum::{extract::Request, routing::get, Router, ServiceExt};
use routes::{describe::describe_routes, generate::generate_routes};
use state::AppState;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tower::{Layer, ServiceBuilder};
use tower_http::cors::{Any, CorsLayer};
use tower_http::{normalize_path::NormalizePathLayer, trace::TraceLayer};

pub async fn run(app_state: AppState) -> anyhow::Result<()> {
    let config = app_state.config().clone();

    let app = Router::new()
        .merge(describe_routes())
        .merge(generate_routes())
        .route("/", get(routes::index))
        .route("/health_check", get(routes::health_check))
        .route("/api-docs/openapi.json", get(routes::openapi_doc))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .layer(
            CorsLayer::new()
                .allow_headers(Any)
                .allow_origin(Any)
                .allow_methods(Any),
        )
        .with_state(Arc::new(app_state));

    let app = NormalizePathLayer::trim_trailing_slash().layer(app);

    let addr = SocketAddr::from_str(format!("{}:{}", &config.host, &config.port).as_str())?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(signal_shutdown())
        .await?;

    Ok(())
}

async fn signal_shutdown() {
    tokio::signal::ctrl_c()
        .await
        .expect("expect tokio signal ctrl-c");
    tracing::info!("signal shutdown");
}
