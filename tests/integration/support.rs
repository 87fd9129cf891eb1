use std::net::SocketAddr;
use std::path::PathBuf;

use cloudmodel_transport::WsClientChannel;
use server::state::AppState;

/// Spawns a real `cloudmodel-server` on an ephemeral port and returns the
/// WebSocket URL new clients should connect to. The server task is detached
/// and torn down when the process exits.
#[allow(dead_code)]
pub async fn spawn_server() -> String {
    let (url, _base) = spawn_server_with_static_dir(None).await;
    url
}

/// Like [`spawn_server`], but also returns the bare `http://host:port` base
/// URL so callers can issue plain HTTP requests (e.g. for static assets).
#[allow(dead_code)]
pub async fn spawn_server_with_static_dir(static_dir: Option<PathBuf>) -> (String, String) {
    let state = AppState::new();
    let router = server::build_router(state, static_dir);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind ephemeral port");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server task");
    });
    (format!("ws://{addr}/ws"), format!("http://{addr}"))
}

#[allow(dead_code)]
pub async fn connect(url: &str) -> WsClientChannel {
    WsClientChannel::connect(url).await.expect("client connects")
}
