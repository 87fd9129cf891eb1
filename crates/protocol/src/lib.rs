// cloudmodel-protocol: wire types for the CloudModel replication protocol.
//
// All messages are JSON. The `kind` field on `WsMessage` discriminates the
// three logical channels (`catchup`, `event`, `propose`) plus their
// responses. `SharedMsg` is opaque to this crate: applications supply their
// own JSON shape and this crate only ever sees `serde_json::Value`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Core data model
// ---------------------------------------------------------------------------

/// An accepted, id-bearing record in the canonical log.
///
/// `id` is assigned by the server and is monotonically increasing across the
/// whole log (never decreases, never repeats).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub msg: serde_json::Value,
}

/// Client -> server proposal (wire name `propose`).
///
/// `latest_known_event_id` is the proposer's view of the log at submission
/// time; the server's acceptance test is `latest_known_event_id == log.len()`.
///
/// Wire keys are camelCase (`sharedMsg`, `latestKnownEventId`,
/// `clientEventId`), per spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub shared_msg: serde_json::Value,
    pub latest_known_event_id: u64,
    pub client_event_id: u64,
}

/// Server -> client acceptance of a `Proposal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptEnvelope {
    pub client_event_id: u64,
    pub event_id: u64,
}

/// Server -> client rejection of a stale `Proposal`.
///
/// `missing_events` is the tail of the log the proposer hadn't seen yet,
/// i.e. `log[latest_known_event_id..]` from the proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectEnvelope {
    pub client_event_id: u64,
    pub missing_events: Vec<Event>,
}

/// The initial bundle a server sends a client immediately on connect
/// (wire name `catchup`). May be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Catchup {
    #[serde(default)]
    pub event_stream: Vec<Event>,
}

/// Frozen protocol error codes.
pub mod error_codes {
    pub const MALFORMED_MESSAGE: &str = "MALFORMED_MESSAGE";
    pub const UNEXPECTED_MESSAGE_KIND: &str = "UNEXPECTED_MESSAGE_KIND";
}

/// Protocol-level error, carried out-of-band from the `reject`/`accept`
/// reply path (e.g. malformed JSON on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Top-level discriminated union
// ---------------------------------------------------------------------------

/// All messages that cross the wire between client and server.
///
/// Serializes/deserializes using the `kind` field as a tag:
///
/// ```json
/// { "kind": "catchup", "eventStream": [] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
#[serde(rename_all = "snake_case")]
pub enum WsMessage {
    /// Server -> client, exactly once per session, as the first message.
    Catchup(Catchup),
    /// Server -> client broadcast of a single accepted event.
    Event(Event),
    /// Client -> server proposal.
    Propose(Proposal),
    /// Server -> client, reply to `Propose` when the proposer was caught up.
    Accept(AcceptEnvelope),
    /// Server -> client, reply to `Propose` when the proposer was stale.
    Reject(RejectEnvelope),
    /// Either direction: a malformed or unexpected message was received.
    Error(ErrorMessage),
}
