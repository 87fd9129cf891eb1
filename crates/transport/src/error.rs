/// Errors surfaced by a [`crate::MessageChannel`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("websocket connect failed: {0}")]
    Connect(String),
    #[error("websocket transport error: {0}")]
    Ws(String),
    #[error("message was not valid JSON: {0}")]
    Json(String),
    #[error("channel closed")]
    Closed,
}
