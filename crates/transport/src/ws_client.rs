use cloudmodel_protocol::WsMessage;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::MaybeTlsStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, warn};

use crate::channel::MessageChannel;
use crate::error::TransportError;

type WsStream = tokio_tungstenite::WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Client-side channel: connects to a CloudModel server over WebSocket.
pub struct WsClientChannel {
    inner: WsStream,
}

impl WsClientChannel {
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let (inner, _response) = tokio_tungstenite::connect_async(url).await.map_err(|e| {
            warn!(url, error = %e, "websocket connect failed");
            TransportError::Connect(e.to_string())
        })?;
        debug!(url, "connected to server");
        Ok(Self { inner })
    }
}

impl MessageChannel for WsClientChannel {
    async fn send(&mut self, msg: &WsMessage) -> Result<(), TransportError> {
        let json = serde_json::to_string(msg).map_err(|e| TransportError::Json(e.to_string()))?;
        self.inner
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| TransportError::Ws(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Option<WsMessage>, TransportError> {
        loop {
            match self.inner.next().await {
                None => return Ok(None),
                Some(Err(e)) => return Err(TransportError::Ws(e.to_string())),
                Some(Ok(Message::Text(text))) => {
                    let msg = serde_json::from_str(&text).map_err(|e| TransportError::Json(e.to_string()))?;
                    return Ok(Some(msg));
                }
                Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(Message::Ping(data))) => {
                    debug!("replying to ping");
                    let _ = self.inner.send(Message::Pong(data)).await;
                    continue;
                }
                Some(Ok(Message::Pong(_) | Message::Binary(_) | Message::Frame(_))) => continue,
            }
        }
    }
}
