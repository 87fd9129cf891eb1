//! cloudmodel-engine: the client reconciliation engine.
//!
//! This is the optimistic-replication half of the CloudModel protocol. It
//! maintains the last-known canonical state, the pending proposal queue, and
//! exposes a pure projection ("predicted state") for the view, per the
//! client data model.
//!
//! # Ordering (§9 Open Question 2)
//!
//! If a broadcast of a new event arrives before the `Accept` reply for a
//! proposal that the server had already ordered ahead of it, no special
//! handling is needed here: the duplicate filter in
//! [`ClientReplica::dispatch_remote_events`] (`id > latest_known_event_id`)
//! tolerates the reordering on its own, and `Accept`/`Reject` advance
//! `latest_known_event_id` through the same path.

mod app;
mod error;
mod rejection;
mod replica;

pub use app::{CloudApp, LocalOrigin};
pub use error::EngineError;
pub use rejection::RejectionStrategy;
pub use replica::{ClientReplica, EngineState, PendingProposal};
