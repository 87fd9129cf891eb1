//! An in-memory `MessageChannel` pair, for engine/server unit tests and for
//! exercising the protocol without binding a real socket (spec §9
//! "Transport abstraction... provide one in-memory implementation for
//! tests").

use cloudmodel_protocol::WsMessage;
use tokio::sync::mpsc;

use crate::channel::MessageChannel;
use crate::error::TransportError;

/// One end of an in-memory duplex pipe of [`WsMessage`]s.
pub struct InMemoryChannel {
    tx: mpsc::Sender<WsMessage>,
    rx: mpsc::Receiver<WsMessage>,
}

impl MessageChannel for InMemoryChannel {
    async fn send(&mut self, msg: &WsMessage) -> Result<(), TransportError> {
        self.tx.send(msg.clone()).await.map_err(|_| TransportError::Closed)
    }

    async fn recv(&mut self) -> Result<Option<WsMessage>, TransportError> {
        Ok(self.rx.recv().await)
    }
}

/// Create a connected pair: whatever is sent on one end is received on the
/// other, in order, matching the ordering guarantee §5 requires of a real
/// transport.
pub fn in_memory_pair(buffer: usize) -> (InMemoryChannel, InMemoryChannel) {
    let (tx_a, rx_b) = mpsc::channel(buffer);
    let (tx_b, rx_a) = mpsc::channel(buffer);
    (InMemoryChannel { tx: tx_a, rx: rx_a }, InMemoryChannel { tx: tx_b, rx: rx_b })
}
