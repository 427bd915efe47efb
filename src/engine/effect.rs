//! Effects the engine asks the transport to carry out

use crate::game::PlayerId;
use crate::protocol::ServerMessage;
use std::time::Duration;
use uuid::Uuid;

/// A single instruction for the transport layer
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Deliver a message to one connection
    Send { to: PlayerId, message: ServerMessage },

    /// Deliver a message to every connection in a session's group
    Broadcast {
        session_id: String,
        message: ServerMessage,
    },

    /// Add a connection to a session's broadcast group
    JoinGroup {
        session_id: String,
        connection: PlayerId,
    },

    /// Forget a session's broadcast group once the session is gone
    DropGroup { session_id: String },

    /// Advance the session after `delay`; `instance` guards against a
    /// session re-created under the same id in the meantime
    ScheduleAdvance {
        session_id: String,
        instance: Uuid,
        delay: Duration,
    },

    /// Drop any pending advance for the session
    CancelAdvance { session_id: String },
}
