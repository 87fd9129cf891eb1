use std::sync::Arc;

use tokio::sync::broadcast;

use cloudmodel_protocol::Event;

use crate::serializer::Serializer;

/// Shared server state: the serializer and the fan-out channel connection
/// handlers subscribe to so an accepted event reaches every other session.
#[derive(Clone)]
pub struct AppState {
    pub serializer: Arc<Serializer>,
    pub broadcast_tx: broadcast::Sender<Event>,
}

impl AppState {
    pub fn new() -> Self {
        let (broadcast_tx, _rx) = broadcast::channel(1024);
        Self { serializer: Arc::new(Serializer::new()), broadcast_tx }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
