//! The single serializer at the heart of the server: every proposal is
//! decided against one in-order event log, guarded by one lock, so there is
//! never more than one writer deciding at a time.

use tokio::sync::Mutex;

use cloudmodel_protocol::{AcceptEnvelope, Event, Proposal, RejectEnvelope};

/// What the serializer decided about a proposal.
pub enum Decision {
    Accept(AcceptEnvelope, Event),
    Reject(RejectEnvelope),
}

pub struct Serializer {
    log: Mutex<Vec<Event>>,
}

impl Serializer {
    pub fn new() -> Self {
        Self { log: Mutex::new(Vec::new()) }
    }

    /// A snapshot of every event accepted so far, for a freshly connected
    /// or reconnecting client to fold into its canonical model.
    pub async fn catchup(&self) -> Vec<Event> {
        self.log.lock().await.clone()
    }

    /// Decide a proposal: accept it onto the end of the log if the proposer
    /// was caught up, otherwise reject it with the events it missed.
    pub async fn propose(&self, proposal: Proposal) -> Decision {
        let mut log = self.log.lock().await;
        let current_len = log.len() as u64;

        if proposal.latest_known_event_id == current_len {
            let event = Event { id: current_len + 1, msg: proposal.shared_msg };
            log.push(event.clone());
            let accept = AcceptEnvelope {
                client_event_id: proposal.client_event_id,
                event_id: event.id,
            };
            Decision::Accept(accept, event)
        } else {
            let missing_events = log
                .iter()
                .skip(proposal.latest_known_event_id as usize)
                .cloned()
                .collect();
            Decision::Reject(RejectEnvelope {
                client_event_id: proposal.client_event_id,
                missing_events,
            })
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}
