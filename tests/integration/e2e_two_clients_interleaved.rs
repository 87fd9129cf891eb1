#[path = "support.rs"]
mod support;

use chat::app::{ChatApp, LocalInput};
use cloudmodel_engine::{ClientReplica, LocalOrigin, RejectionStrategy};
use cloudmodel_protocol::WsMessage;
use cloudmodel_transport::MessageChannel;

async fn catchup(replica: &mut ClientReplica<ChatApp>, channel: &mut impl MessageChannel) {
    match channel.recv().await.unwrap().unwrap() {
        WsMessage::Catchup(c) => {
            replica.apply_catchup(c);
        }
        other => panic!("expected catchup, got {other:?}"),
    }
}

/// Scenario 2 (spec §8): two clients propose concurrently. The server
/// accepts whichever arrives first and rejects the other; the rejected
/// client catches up and its `ReapplyAllPending` strategy resends. Both
/// clients converge on the same final shared log.
#[tokio::test]
async fn two_clients_interleaved_proposals_converge() {
    let url = support::spawn_server().await;
    let mut alice_channel = support::connect(&url).await;
    let mut bob_channel = support::connect(&url).await;

    let mut alice = ClientReplica::new(ChatApp { author: "alice".into() }, RejectionStrategy::ReapplyAllPending);
    let mut bob = ClientReplica::new(ChatApp { author: "bob".into() }, RejectionStrategy::ReapplyAllPending);

    catchup(&mut alice, &mut alice_channel).await;
    catchup(&mut bob, &mut bob_channel).await;

    let alice_proposals = alice.dispatch_local_origin(LocalOrigin::local(LocalInput::Send("from alice".into())));
    alice_channel.send(&WsMessage::Propose(alice_proposals[0].clone())).await.unwrap();

    // Alice's proposal lands and is accepted before Bob proposes.
    match alice_channel.recv().await.unwrap().unwrap() {
        WsMessage::Accept(accept) => {
            alice.dispatch_accept(accept).unwrap();
        }
        other => panic!("expected accept, got {other:?}"),
    }

    // Bob, still at event 0, proposes against a now-stale view.
    let bob_proposals = bob.dispatch_local_origin(LocalOrigin::local(LocalInput::Send("from bob".into())));
    bob_channel.send(&WsMessage::Propose(bob_proposals[0].clone())).await.unwrap();

    // Bob sees alice's event broadcast, then his own proposal rejected.
    let bob_retries = loop {
        match bob_channel.recv().await.unwrap().unwrap() {
            WsMessage::Event(event) => {
                bob.dispatch_remote_events(vec![event]);
            }
            WsMessage::Reject(reject) => break bob.dispatch_reject(reject),
            other => panic!("unexpected message: {other:?}"),
        }
    };

    assert_eq!(bob.latest_known_event_id(), 1, "bob must have caught up past alice's event");
    assert_eq!(bob_retries.len(), 1, "ReapplyAllPending must resend bob's proposal");
    bob_channel.send(&WsMessage::Propose(bob_retries[0].clone())).await.unwrap();

    match bob_channel.recv().await.unwrap().unwrap() {
        WsMessage::Accept(accept) => {
            bob.dispatch_accept(accept).unwrap();
        }
        other => panic!("expected accept on retry, got {other:?}"),
    }

    match alice_channel.recv().await.unwrap().unwrap() {
        WsMessage::Event(event) => {
            alice.dispatch_remote_events(vec![event]);
        }
        other => panic!("expected bob's event broadcast to alice, got {other:?}"),
    }

    assert_eq!(alice.canonical_shared_state().0, bob.canonical_shared_state().0);
    assert_eq!(alice.canonical_shared_state().0.len(), 2);
    assert_eq!(alice.canonical_shared_state().0[0].text, "from alice");
    assert_eq!(alice.canonical_shared_state().0[1].text, "from bob");
}
