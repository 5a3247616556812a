use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handler::proc::{handle_path, handle_root, SharedResolver};

/// Routes every path, under any method, to the `/proc` handler.
pub fn build_router(resolver: SharedResolver) -> Router {
    Router::new()
        .route("/", any(handle_root))
        .route("/*path", any(handle_path))
        .layer(TraceLayer::new_for_http())
        .with_state(resolver)
}

/// Bind `addr` and serve until the cancellation token is triggered.
pub async fn run_http_listener(
    addr: &str,
    resolver: SharedResolver,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, resolver, shutdown).await
}

/// Serve on an already bound listener.
///
/// In-flight requests finish before this returns; new connections are
/// refused once `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    resolver: SharedResolver,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, build_router(resolver))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("HTTP listener stopped");
    Ok(())
}
