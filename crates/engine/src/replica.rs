//! The client reconciliation engine (spec §4.2).
//!
//! [`ClientReplica`] owns the four fields of `ClientReplica` from the data
//! model (§3): `latest_known_event_id`, `latest_known_shared_model`,
//! `pending_events`, and `local_model`. It is driven entirely by its
//! `dispatch_*` methods — it performs no I/O and knows nothing about
//! WebSockets, sockets.io, or any other transport; callers read the
//! `Proposal`s it returns and are responsible for actually sending them.

use std::collections::VecDeque;

use cloudmodel_protocol::{AcceptEnvelope, Catchup, Event, Proposal, RejectEnvelope};
use tracing::{debug, warn};

use crate::app::{CloudApp, LocalOrigin};
use crate::error::EngineError;
use crate::rejection::RejectionStrategy;

/// A shared message the client has dispatched (or queued to dispatch) but
/// whose server outcome is not yet known.
#[derive(Debug, Clone)]
pub struct PendingProposal<SharedMsg> {
    pub client_event_id: u64,
    pub msg: SharedMsg,
}

/// Coarse view of the engine's state machine (spec §4.2.8). Purely
/// observational — nothing in the engine branches on this directly, it
/// falls out of whether `pending_events` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No pending proposals, nothing in flight.
    Idle,
    /// The head of the pending queue has been dispatched and a response is
    /// awaited.
    Waiting,
}

pub struct ClientReplica<A: CloudApp> {
    app: A,
    latest_known_event_id: u64,
    latest_known_shared_model: A::SharedState,
    pending_events: VecDeque<PendingProposal<A::SharedMsg>>,
    local_model: A::LocalState,
    next_client_event_id: u64,
    rejection_strategy: RejectionStrategy<A>,
}

impl<A: CloudApp> ClientReplica<A> {
    /// Construct a fresh replica. Per §9 Open Question 3, shared state
    /// starts at `app.init_shared()` and is only folded from the `catchup`
    /// bundle once the transport delivers one — it is not assumed to
    /// already reflect history.
    pub fn new(app: A, rejection_strategy: RejectionStrategy<A>) -> Self {
        let latest_known_shared_model = app.init_shared();
        let local_model = app.init_local();
        Self {
            app,
            latest_known_event_id: 0,
            latest_known_shared_model,
            pending_events: VecDeque::new(),
            local_model,
            next_client_event_id: 0,
            rejection_strategy,
        }
    }

    pub fn state(&self) -> EngineState {
        if self.pending_events.is_empty() { EngineState::Idle } else { EngineState::Waiting }
    }

    pub fn latest_known_event_id(&self) -> u64 {
        self.latest_known_event_id
    }

    pub fn canonical_shared_state(&self) -> &A::SharedState {
        &self.latest_known_shared_model
    }

    pub fn local_state(&self) -> &A::LocalState {
        &self.local_model
    }

    pub fn pending_count(&self) -> usize {
        self.pending_events.len()
    }

    /// The projected state the view renders: canonical state folded with
    /// every pending proposal, in submission order (spec §4.2.6, I5).
    /// Recomputed on every call — never cached.
    pub fn predicted_shared_state(&self) -> A::SharedState {
        let mut state = self.latest_known_shared_model.clone();
        for pending in &self.pending_events {
            state = self.app.reduce_shared(&pending.msg, &state);
        }
        state
    }

    /// Fold the initial `catchup` bundle into canonical state (§4.1
    /// "Connection handler"). Must be called at most once, before any other
    /// dispatch.
    pub fn apply_catchup(&mut self, catchup: Catchup) -> Vec<Proposal> {
        self.fold_remote_events(catchup.event_stream)
    }

    /// Handle a `LocalOrigin` action produced by the view (§4.2.3).
    pub fn dispatch_local_origin(&mut self, origin: LocalOrigin<A>) -> Vec<Proposal> {
        let mut proposals = Vec::new();
        self.process_local_origin(origin, &mut proposals);
        proposals
    }

    /// Handle an `Accept` reply (§4.2.4). Returns the next proposal to send
    /// if the queue still has a head afterwards.
    pub fn dispatch_accept(&mut self, accept: AcceptEnvelope) -> Result<Vec<Proposal>, EngineError> {
        let Some(head) = self.pending_events.front() else {
            // Edge case per spec: an Accept with no pending head indicates a
            // protocol bug or replay. Ignored, not fatal.
            warn!(event_id = accept.event_id, "accept with no pending proposal; ignoring");
            return Ok(Vec::new());
        };
        if head.client_event_id != accept.client_event_id {
            return Err(EngineError::AcceptClientEventIdMismatch {
                head: head.client_event_id,
                accepted: accept.client_event_id,
            });
        }

        let accepted = self.pending_events.pop_front().expect("checked above");
        self.latest_known_shared_model =
            self.app.reduce_shared(&accepted.msg, &self.latest_known_shared_model);
        self.latest_known_event_id = accept.event_id;
        debug!(event_id = accept.event_id, "proposal accepted");

        let mut proposals = Vec::new();
        if let Some(new_head) = self.pending_events.front() {
            proposals.push(self.build_proposal(new_head));
        }
        Ok(proposals)
    }

    /// Handle a `Reject` reply (§4.2.4): fold in the missing tail, then
    /// re-derive the pending queue per the rejection strategy.
    pub fn dispatch_reject(&mut self, reject: RejectEnvelope) -> Vec<Proposal> {
        let mut proposals = Vec::new();
        let fresh: Vec<Event> = reject
            .missing_events
            .into_iter()
            .filter(|e| e.id > self.latest_known_event_id)
            .collect();
        self.fold_events_into_canonical(fresh, &mut proposals);

        let old_pending = std::mem::take(&mut self.pending_events);
        self.pending_events = self.rejection_strategy.apply(old_pending, &self.latest_known_shared_model);

        if let Some(head) = self.pending_events.front() {
            proposals.push(self.build_proposal(head));
        }
        proposals
    }

    /// Handle a broadcast of remote events from the `event`/`catchup`
    /// channel (§4.2.5). Pending proposals are untouched; remote events
    /// interleave beneath the optimistic projection.
    pub fn dispatch_remote_events(&mut self, events: Vec<Event>) -> Vec<Proposal> {
        self.fold_remote_events(events)
    }

    // -- internals ------------------------------------------------------

    fn fold_remote_events(&mut self, events: Vec<Event>) -> Vec<Proposal> {
        let mut proposals = Vec::new();
        let fresh: Vec<Event> = events.into_iter().filter(|e| e.id > self.latest_known_event_id).collect();
        self.fold_events_into_canonical(fresh, &mut proposals);
        proposals
    }

    /// Fold already-deduplicated, id-ordered events into canonical state.
    /// Stops at (and does not advance past) the first event whose shared
    /// message fails to decode, per §4.2.7.
    fn fold_events_into_canonical(&mut self, events: Vec<Event>, proposals: &mut Vec<Proposal>) {
        for event in events {
            match self.app.decode_shared(&event.msg) {
                Ok(msg) => {
                    self.latest_known_shared_model = self.app.reduce_shared(&msg, &self.latest_known_shared_model);
                    self.latest_known_event_id = event.id;
                }
                Err(err) => {
                    warn!(event_id = event.id, error = %err, "failed to decode shared event; stopping fold");
                    let local_msg = self.app.on_decode_error(err);
                    self.process_local_origin(LocalOrigin::local(local_msg), proposals);
                    break;
                }
            }
        }
    }

    fn process_local_origin(&mut self, origin: LocalOrigin<A>, proposals: &mut Vec<Proposal>) {
        let mut queue = VecDeque::new();
        queue.push_back(origin);

        while let Some(origin) = queue.pop_front() {
            if let Some(local_msg) = origin.local_msg {
                let (new_local_model, followups) =
                    self.app.reduce_local(local_msg, self.local_model.clone());
                self.local_model = new_local_model;
                queue.extend(followups);
            }

            if let Some(shared_msg) = origin.proposed_event {
                let client_event_id = self.next_client_event_id;
                self.next_client_event_id += 1;
                let was_empty = self.pending_events.is_empty();
                self.pending_events.push_back(PendingProposal { client_event_id, msg: shared_msg });

                // Head-only send rule (I3): only dispatch if this proposal
                // became the new head. Anything behind it waits.
                if was_empty {
                    let head = self.pending_events.front().expect("just pushed");
                    proposals.push(self.build_proposal(head));
                }
            }
        }
    }

    fn build_proposal(&self, pending: &PendingProposal<A::SharedMsg>) -> Proposal {
        Proposal {
            shared_msg: self.app.encode_shared(&pending.msg),
            latest_known_event_id: self.latest_known_event_id,
            client_event_id: pending.client_event_id,
        }
    }
}
