use axum::extract::ws::{Message, WebSocket};
use cloudmodel_protocol::WsMessage;
use tracing::warn;

use crate::channel::MessageChannel;
use crate::error::TransportError;

/// Server-side channel: wraps the axum WebSocket handed to a connection
/// handler after `ws.on_upgrade(...)`.
pub struct WsServerChannel {
    socket: WebSocket,
}

impl WsServerChannel {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

impl MessageChannel for WsServerChannel {
    async fn send(&mut self, msg: &WsMessage) -> Result<(), TransportError> {
        let json = serde_json::to_string(msg).map_err(|e| TransportError::Json(e.to_string()))?;
        self.socket
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| TransportError::Ws(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Option<WsMessage>, TransportError> {
        loop {
            match self.socket.recv().await {
                None => return Ok(None),
                Some(Err(e)) => {
                    warn!(error = %e, "websocket transport error");
                    return Err(TransportError::Ws(e.to_string()));
                }
                Some(Ok(Message::Text(text))) => {
                    let msg = serde_json::from_str(&text).map_err(|e| TransportError::Json(e.to_string()))?;
                    return Ok(Some(msg));
                }
                Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(Message::Binary(_))) => continue,
            }
        }
    }
}
