#[path = "support.rs"]
mod support;

use cloudmodel_protocol::{WsMessage, error_codes};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::protocol::Message;

/// Error-handling checks (spec §7) over a real TCP WebSocket using a raw
/// tungstenite client (not `WsClientChannel`), so we can send bytes the
/// engine would never produce.
#[tokio::test]
async fn malformed_json_gets_a_protocol_error_and_closes_the_connection() {
    let url = support::spawn_server().await;
    let (mut ws, _response) = tokio_tungstenite::connect_async(&url).await.expect("connect");

    match ws.next().await.unwrap().unwrap() {
        Message::Text(text) => {
            let msg: WsMessage = serde_json::from_str(&text).expect("catchup parses");
            assert!(matches!(msg, WsMessage::Catchup(_)));
        }
        other => panic!("expected text catchup, got {other:?}"),
    }

    ws.send(Message::Text("{not-valid-json".into())).await.expect("send malformed text");

    match ws.next().await.unwrap().unwrap() {
        Message::Text(text) => {
            let msg: WsMessage = serde_json::from_str(&text).expect("error message parses");
            match msg {
                WsMessage::Error(err) => assert_eq!(err.code, error_codes::MALFORMED_MESSAGE),
                other => panic!("expected error message, got {other:?}"),
            }
        }
        other => panic!("expected text error message, got {other:?}"),
    }

    // The server drops the socket after the error; tungstenite surfaces
    // that as either a clean close frame or a reset, depending on timing.
    match ws.next().await {
        None | Some(Ok(Message::Close(_))) | Some(Err(_)) => {}
        other => panic!("expected the server to close the connection, got {other:?}"),
    }
}

/// A well-formed but out-of-place message (anything but `propose`) gets a
/// protocol error but doesn't kill the connection.
#[tokio::test]
async fn unexpected_message_kind_gets_an_error_but_connection_survives() {
    let url = support::spawn_server().await;
    let (mut ws, _response) = tokio_tungstenite::connect_async(&url).await.expect("connect");
    ws.next().await.unwrap().unwrap(); // catchup

    let bogus = WsMessage::Accept(cloudmodel_protocol::AcceptEnvelope { client_event_id: 0, event_id: 1 });
    ws.send(Message::Text(serde_json::to_string(&bogus).unwrap().into())).await.unwrap();

    match ws.next().await.unwrap().unwrap() {
        Message::Text(text) => {
            let msg: WsMessage = serde_json::from_str(&text).unwrap();
            match msg {
                WsMessage::Error(err) => assert_eq!(err.code, error_codes::UNEXPECTED_MESSAGE_KIND),
                other => panic!("expected error message, got {other:?}"),
            }
        }
        other => panic!("expected text error message, got {other:?}"),
    }

    // The connection is still alive: a valid propose still works.
    let proposal = WsMessage::Propose(cloudmodel_protocol::Proposal {
        shared_msg: serde_json::json!({"author": "alice", "text": "hi"}),
        latest_known_event_id: 0,
        client_event_id: 0,
    });
    ws.send(Message::Text(serde_json::to_string(&proposal).unwrap().into())).await.unwrap();
    match ws.next().await.unwrap().unwrap() {
        Message::Text(text) => {
            let msg: WsMessage = serde_json::from_str(&text).unwrap();
            assert!(matches!(msg, WsMessage::Accept(_)));
        }
        other => panic!("expected accept, got {other:?}"),
    }
}
