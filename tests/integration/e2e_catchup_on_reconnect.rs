#[path = "support.rs"]
mod support;

use chat::app::{ChatApp, LocalInput};
use cloudmodel_engine::{ClientReplica, LocalOrigin, RejectionStrategy};
use cloudmodel_protocol::WsMessage;
use cloudmodel_transport::MessageChannel;

/// Scenario 3 (spec §8): a client disconnects after having a proposal
/// accepted, then reconnects as a brand new session. The server's
/// `catchup` bundle must carry the whole log so far.
#[tokio::test]
async fn reconnecting_client_catches_up_on_prior_events() {
    let url = support::spawn_server().await;

    {
        let mut channel = support::connect(&url).await;
        let mut replica = ClientReplica::new(ChatApp { author: "alice".into() }, RejectionStrategy::ReapplyAllPending);
        match channel.recv().await.unwrap().unwrap() {
            WsMessage::Catchup(c) => {
                replica.apply_catchup(c);
            }
            other => panic!("expected catchup, got {other:?}"),
        }
        let proposals = replica.dispatch_local_origin(LocalOrigin::local(LocalInput::Send("first".into())));
        channel.send(&WsMessage::Propose(proposals[0].clone())).await.unwrap();
        match channel.recv().await.unwrap().unwrap() {
            WsMessage::Accept(accept) => {
                replica.dispatch_accept(accept).unwrap();
            }
            other => panic!("expected accept, got {other:?}"),
        }
        assert_eq!(replica.latest_known_event_id(), 1);
        // channel dropped here, closing the first session
    }

    let mut reconnect_channel = support::connect(&url).await;
    let mut replica = ClientReplica::new(ChatApp { author: "bob".into() }, RejectionStrategy::ReapplyAllPending);
    match reconnect_channel.recv().await.unwrap().unwrap() {
        WsMessage::Catchup(catchup) => {
            assert_eq!(catchup.event_stream.len(), 1);
            replica.apply_catchup(catchup);
        }
        other => panic!("expected catchup, got {other:?}"),
    }

    assert_eq!(replica.latest_known_event_id(), 1);
    assert_eq!(replica.canonical_shared_state().0[0].text, "first");
}
