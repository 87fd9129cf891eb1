use cloudmodel_protocol::WsMessage;

use crate::error::TransportError;

/// The transport adapter (spec §4.3): a bidirectional, order-preserving pipe
/// carrying the three logical channels (`catchup`, `event`, `propose`) as a
/// single discriminated [`WsMessage`] stream.
///
/// One `MessageChannel` exists per connection. The engine and server know
/// nothing about this trait's implementations — they only call `send` and
/// `recv`, so swapping WebSockets for an in-memory pipe in tests requires no
/// changes to `cloudmodel-engine` or the server serializer.
pub trait MessageChannel: Send {
    /// Send one message. Implementations MUST preserve send order.
    fn send(
        &mut self,
        msg: &WsMessage,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Receive the next message, or `Ok(None)` on a clean close.
    fn recv(&mut self) -> impl Future<Output = Result<Option<WsMessage>, TransportError>> + Send;
}
