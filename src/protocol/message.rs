//! Message types for the imposter protocol

use crate::game::{Player, PlayerId, SessionSnapshot, Verdict};
use serde::{Deserialize, Serialize};

/// Intents sent from a player's client to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Handshake with protocol version
    Hello { protocol_version: u32 },

    /// Open a new session with the caller as its first player
    CreateGame {
        session_id: String,
        player_name: String,
    },

    /// Join a session that is still in the lobby
    JoinGame {
        session_id: String,
        player_name: String,
    },

    /// Adjust a player's score directly, outside round scoring
    UpdateScore {
        session_id: String,
        player_id: PlayerId,
        points: i64,
    },

    /// Leave the lobby and begin round one
    StartGame { session_id: String },

    /// Request a full snapshot of a session
    FetchGameData { session_id: String },

    /// Submit the caller's word for this round
    SubmitWord { session_id: String, word: String },

    /// Vote for the player the caller believes is the imposter
    Vote {
        session_id: String,
        target: PlayerId,
    },
}

impl ClientMessage {
    /// Intent name, used for logging and acknowledgements
    pub fn name(&self) -> &'static str {
        match self {
            ClientMessage::Hello { .. } => "Hello",
            ClientMessage::CreateGame { .. } => "CreateGame",
            ClientMessage::JoinGame { .. } => "JoinGame",
            ClientMessage::UpdateScore { .. } => "UpdateScore",
            ClientMessage::StartGame { .. } => "StartGame",
            ClientMessage::FetchGameData { .. } => "FetchGameData",
            ClientMessage::SubmitWord { .. } => "SubmitWord",
            ClientMessage::Vote { .. } => "Vote",
        }
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// Sent on connect; tells the client its own player id
    Welcome {
        player_id: PlayerId,
        protocol_version: u32,
    },

    /// Session state changed
    GameStateUpdate(SessionSnapshot),

    /// Session left the lobby
    StartGame { session_id: String },

    /// Reply to `FetchGameData`
    GameDataFetched(SessionSnapshot),

    /// Round verdict
    RoundResult { verdict: Verdict, message: String },

    /// Imposter of the round just resolved; `None` if they already left
    RevealImposter { player_id: Option<PlayerId> },

    /// Final standings after the last round
    GameEnded { players: Vec<Player> },

    /// Error response
    Error { message: String },

    /// Acknowledgment (for commands that need confirmation)
    Ack { for_command: String },
}
