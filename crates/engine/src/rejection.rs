//! The policy applied to the pending queue after a `Reject`.

use std::collections::VecDeque;

use crate::app::CloudApp;
use crate::replica::PendingProposal;

type Queue<A> = VecDeque<PendingProposal<<A as CloudApp>::SharedMsg>>;
type CustomRejectionFn<A> = dyn Fn(Queue<A>, &<A as CloudApp>::SharedState) -> Queue<A> + Send + Sync;

/// What to do with the pending proposal queue after a rejection has been
/// caught up (spec §4.2.4, §9 "Rejection strategy as a capability").
pub enum RejectionStrategy<A: CloudApp> {
    /// Drop every pending proposal. The in-flight optimistic actions are
    /// lost; upper layers may re-request them.
    DropAllPending,
    /// Keep the queue exactly as it was (including the just-rejected head)
    /// and re-propose it against the now-caught-up canonical state.
    ReapplyAllPending,
    /// Call a custom function with the old queue and the caught-up shared
    /// state, and use its return value as the new queue.
    Custom(Box<CustomRejectionFn<A>>),
}

impl<A: CloudApp> RejectionStrategy<A> {
    pub(crate) fn apply(
        &self,
        pending: VecDeque<PendingProposal<A::SharedMsg>>,
        caught_up_shared_state: &A::SharedState,
    ) -> VecDeque<PendingProposal<A::SharedMsg>> {
        match self {
            RejectionStrategy::DropAllPending => VecDeque::new(),
            RejectionStrategy::ReapplyAllPending => pending,
            RejectionStrategy::Custom(f) => f(pending, caught_up_shared_state),
        }
    }
}
