pub mod cli;
pub mod connection;
pub mod serializer;
pub mod state;

pub use state::AppState;

use std::path::PathBuf;

use axum::extract::Request;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower::Service;
use tower_http::services::{ServeDir, ServeFile};

pub fn build_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let router = Router::new()
        .route("/ws", get(connection::ws_handler))
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz));

    let router = match static_dir {
        Some(dir) => router.fallback(move |method: Method, uri: Uri, req: Request| {
            let dir = dir.clone();
            async move { static_fallback(method, uri, req, dir).await }
        }),
        None => router.fallback(fallback_404),
    };

    router.with_state(state)
}

fn is_reserved_backend_path(path: &str) -> bool {
    let first_segment = path.trim_start_matches('/').split('/').next().unwrap_or("");
    matches!(first_segment, "ws" | "healthz" | "readyz")
}

async fn static_fallback(method: Method, uri: Uri, req: Request, static_dir: PathBuf) -> Response {
    let path = uri.path();
    if is_reserved_backend_path(path) {
        return StatusCode::NOT_FOUND.into_response();
    }
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let index = static_dir.join("index.html");
    let mut service = ServeDir::new(static_dir).fallback(ServeFile::new(index));
    match service.call(req).await {
        Ok(response) => response.into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn fallback_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html("<!DOCTYPE html><title>404</title><p>Not found.</p>"))
}

mod health {
    use axum::response::IntoResponse;
    pub async fn healthz() -> impl IntoResponse {
        "ok"
    }
    pub async fn readyz() -> impl IntoResponse {
        "ok"
    }
}
