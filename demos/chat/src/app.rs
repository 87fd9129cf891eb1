//! A toy shared chat log: the simplest possible [`CloudApp`], used both as
//! the demo client and as a reference for anyone writing their own
//! application adapter.

use serde::{Deserialize, Serialize};

use cloudmodel_engine::{CloudApp, LocalOrigin};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMsg {
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatLog(pub Vec<ChatMsg>);

/// What the demo's input loop feeds into `reduce_local`.
pub enum LocalInput {
    /// The local user typed a line to send.
    Send(String),
    /// A remote event failed to decode as a `ChatMsg`.
    DecodeError(String),
}

pub struct ChatApp {
    pub author: String,
}

impl CloudApp for ChatApp {
    type SharedMsg = ChatMsg;
    type LocalMsg = LocalInput;
    type SharedState = ChatLog;
    // Local-only notices (decode errors) the shared log doesn't carry.
    type LocalState = Vec<String>;

    fn init_shared(&self) -> Self::SharedState {
        ChatLog::default()
    }

    fn init_local(&self) -> Self::LocalState {
        Vec::new()
    }

    fn reduce_shared(&self, msg: &Self::SharedMsg, state: &Self::SharedState) -> Self::SharedState {
        let mut log = state.clone();
        log.0.push(msg.clone());
        log
    }

    fn reduce_local(
        &self,
        msg: Self::LocalMsg,
        mut state: Self::LocalState,
    ) -> (Self::LocalState, Vec<LocalOrigin<Self>>) {
        match msg {
            LocalInput::Send(text) => {
                let chat_msg = ChatMsg { author: self.author.clone(), text };
                (state, vec![LocalOrigin::propose(chat_msg)])
            }
            LocalInput::DecodeError(error) => {
                state.push(format!("dropped a malformed event: {error}"));
                (state, Vec::new())
            }
        }
    }

    fn encode_shared(&self, msg: &Self::SharedMsg) -> serde_json::Value {
        serde_json::to_value(msg).expect("ChatMsg always encodes")
    }

    fn decode_shared(&self, json: &serde_json::Value) -> Result<Self::SharedMsg, String> {
        serde_json::from_value(json.clone()).map_err(|e| e.to_string())
    }

    fn on_decode_error(&self, error: String) -> Self::LocalMsg {
        LocalInput::DecodeError(error)
    }
}
