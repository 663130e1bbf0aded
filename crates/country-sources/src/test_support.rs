//! Local fixture servers for client tests

use axum::Router;

/// Serve `app` on an ephemeral loopback port and return its base URL.
pub(crate) async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing listens on
pub(crate) const UNREACHABLE: &str = "http://127.0.0.1:1";
