/// HTTP/JSON service exposing point and range lookups
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;

pub use error::AppError;
pub use models::PriceResp;
pub use router::create_router;
pub use state::AppState;

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::error::Result;

/// Serve until `shutdown` flips to true
pub async fn serve(addr: SocketAddr, state: AppState, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
