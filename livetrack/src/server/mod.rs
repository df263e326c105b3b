//! HTTP surface of the tracking service.
//!
//! | Method   | Path                            | Handler                    |
//! |----------|---------------------------------|----------------------------|
//! | `POST`   | `/driver/location`              | [`routes::report_location`] |
//! | `DELETE` | `/driver/location/{driver_id}`  | [`routes::go_offline`]     |
//! | `GET`    | `/orders/{order_id}/tracking`   | [`routes::track_order`]    |
//! | `GET`    | `/drivers/nearby`               | [`routes::nearby_drivers`] |
//! | `GET`    | `/health`                       | [`routes::health`]         |
//!
//! Errors are JSON `{"success": false, "message": ...}` with 400, 404 or 503.

mod error;
pub mod payload;
pub mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

pub use error::{ApiError, ServerError};
pub use state::AppState;

use crate::assignment::AssignmentResolver;

/// Build the router over shared state.
pub fn router<R>(state: Arc<AppState<R>>) -> Router
where
    R: AssignmentResolver + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/driver/location", post(routes::report_location::<R>))
        .route("/driver/location/{driver_id}", delete(routes::go_offline::<R>))
        .route("/orders/{order_id}/tracking", get(routes::track_order::<R>))
        .route("/drivers/nearby", get(routes::nearby_drivers::<R>))
        .route("/health", get(routes::health::<R>))
        .layer(cors)
        .with_state(state)
}

/// Bind a listener, logging the address.
pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    tracing::info!(addr, "Listening");
    Ok(listener)
}

/// Serve until `shutdown` is cancelled, then drain in-flight requests.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
