use std::{net::SocketAddr, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    http::{Method, StatusCode, header::CONTENT_TYPE},
    routing::get,
};
use tokio::{net::TcpListener, sync::watch};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{
    config::config_model::Server,
    infrastructure::axum_http::{
        default_routers,
        routers::{self, payments::PaymentsState},
    },
};

/// The service router without transport concerns.
pub fn app(state: PaymentsState) -> Router {
    Router::new()
        .fallback(default_routers::not_found)
        .nest("/payments", routers::payments::routes(state))
        .route("/health", get(default_routers::health_check))
}

/// Wraps a router with the timeout, body limit, CORS and tracing layers.
pub fn with_layers(router: Router, server: &Server) -> Result<Router> {
    Ok(router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.timeout),
        ))
        .layer(RequestBodyLimitLayer::new(
            (server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::PATCH])
                .allow_headers([CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http()))
}

pub async fn start(
    server: Server,
    state: PaymentsState,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let app = with_layers(app(state), &server)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], server.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            // A dropped sender also means shutdown.
            let _ = shutdown.wait_for(|stop| *stop).await;
            info!("HTTP server shutting down");
        })
        .await?;
    Ok(())
}

/// Resolves on the first SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = ?err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = ?err, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
