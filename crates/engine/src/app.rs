//! The capability set an application supplies to the engine.
//!
//! `CloudApp` is the fixed set of pure, synchronous callbacks the engine
//! needs to fold events and local actions into state. It owns no I/O: the
//! engine calls these functions and nothing else to decide what the
//! replicated state should look like.

/// An application-defined shared/local state machine.
///
/// `SharedMsg`/`SharedState` are the replicated half (folded from the
/// server's canonical log plus any locally pending proposals).
/// `LocalMsg`/`LocalState` are purely client-local (never sent to the
/// server, never replicated).
pub trait CloudApp {
    type SharedMsg: Clone;
    type LocalMsg;
    type SharedState: Clone;
    type LocalState: Clone;

    /// The shared state before any events have been folded in.
    fn init_shared(&self) -> Self::SharedState;

    /// The local state before any local actions have run.
    fn init_local(&self) -> Self::LocalState;

    /// Fold one shared message into shared state. MUST be pure and
    /// deterministic: every client must converge to the same value given
    /// the same event sequence (spec invariant on `SharedState`).
    fn reduce_shared(&self, msg: &Self::SharedMsg, state: &Self::SharedState) -> Self::SharedState;

    /// Fold one local message into local state, possibly producing
    /// follow-up actions to run afterwards (e.g. a local message that also
    /// wants to propose a shared event).
    fn reduce_local(
        &self,
        msg: Self::LocalMsg,
        state: Self::LocalState,
    ) -> (Self::LocalState, Vec<LocalOrigin<Self>>)
    where
        Self: Sized;

    /// Encode a shared message to the JSON shape carried on the wire.
    fn encode_shared(&self, msg: &Self::SharedMsg) -> serde_json::Value;

    /// Decode a shared message from its wire JSON shape.
    fn decode_shared(&self, json: &serde_json::Value) -> Result<Self::SharedMsg, String>;

    /// Turn a decode failure into a local message so the application can
    /// display it. Never crashes the engine and never advances canonical
    /// state (spec §4.2.7).
    fn on_decode_error(&self, error: String) -> Self::LocalMsg;
}

/// An action originating locally (from the view/UI), as opposed to one
/// delivered by the transport.
///
/// Either field may be set, both, or neither — e.g. a "send" button click
/// might update local UI state (`local_msg`) and also propose a shared
/// chat message (`proposed_event`) in the same action.
pub struct LocalOrigin<A: CloudApp + ?Sized> {
    pub local_msg: Option<A::LocalMsg>,
    pub proposed_event: Option<A::SharedMsg>,
}

impl<A: CloudApp + ?Sized> LocalOrigin<A> {
    pub fn local(msg: A::LocalMsg) -> Self {
        Self { local_msg: Some(msg), proposed_event: None }
    }

    pub fn propose(msg: A::SharedMsg) -> Self {
        Self { local_msg: None, proposed_event: Some(msg) }
    }

    pub fn both(local_msg: A::LocalMsg, proposed_event: A::SharedMsg) -> Self {
        Self { local_msg: Some(local_msg), proposed_event: Some(proposed_event) }
    }
}
