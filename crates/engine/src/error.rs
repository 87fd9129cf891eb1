/// Fatal engine errors.
///
/// These never arise from normal protocol operation against a correct
/// server; they indicate a protocol bug, a replay, or a tampered message.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// §9 Open Question 1: the reference behaviour ignores `client_event_id`
    /// on `Accept` and trusts the pending head. This implementation
    /// additionally verifies the two agree and treats a mismatch as fatal.
    #[error(
        "accept client_event_id mismatch: pending head has {head}, server accepted {accepted}"
    )]
    AcceptClientEventIdMismatch { head: u64, accepted: u64 },
}
