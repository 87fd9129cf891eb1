use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::IntoResponse;
use tracing::{info, warn};

use cloudmodel_protocol::{Catchup, ErrorMessage, WsMessage, error_codes};
use cloudmodel_transport::{MessageChannel, TransportError, WsServerChannel};

use crate::serializer::Decision;
use crate::state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(WsServerChannel::new(socket), state))
}

async fn handle_socket(mut channel: impl MessageChannel, state: AppState) {
    let snapshot = state.serializer.catchup().await;
    let mut delivered_up_to = snapshot.len() as u64;
    if channel
        .send(&WsMessage::Catchup(Catchup { event_stream: snapshot }))
        .await
        .is_err()
    {
        return;
    }

    let mut broadcast_rx = state.broadcast_tx.subscribe();
    info!("client connected, caught up to event {delivered_up_to}");

    loop {
        tokio::select! {
            incoming = channel.recv() => {
                match incoming {
                    Ok(Some(WsMessage::Propose(proposal))) => {
                        match state.serializer.propose(proposal).await {
                            Decision::Accept(accept, event) => {
                                if channel.send(&WsMessage::Accept(accept)).await.is_err() {
                                    break;
                                }
                                delivered_up_to = event.id;
                                let _ = state.broadcast_tx.send(event);
                            }
                            Decision::Reject(reject) => {
                                if channel.send(&WsMessage::Reject(reject)).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Ok(Some(_)) => {
                        let error = WsMessage::Error(ErrorMessage {
                            code: error_codes::UNEXPECTED_MESSAGE_KIND.to_owned(),
                            message: "server only accepts propose messages from clients".to_owned(),
                        });
                        if channel.send(&error).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        info!("client disconnected");
                        break;
                    }
                    Err(TransportError::Json(reason)) => {
                        let error = WsMessage::Error(ErrorMessage {
                            code: error_codes::MALFORMED_MESSAGE.to_owned(),
                            message: reason,
                        });
                        let _ = channel.send(&error).await;
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "transport error, closing connection");
                        break;
                    }
                }
            }
            event = broadcast_rx.recv() => {
                match event {
                    Ok(event) if event.id > delivered_up_to => {
                        if channel.send(&WsMessage::Event(event.clone())).await.is_err() {
                            break;
                        }
                        delivered_up_to = event.id;
                    }
                    Ok(_) => {}
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "connection lagged behind broadcast, closing");
                        break;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}
