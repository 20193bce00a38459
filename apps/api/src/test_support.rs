//! Helpers shared by tests that talk to a real HTTP endpoint.

use axum::Router;
use tokio::net::TcpListener;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
