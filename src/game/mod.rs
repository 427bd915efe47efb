//! Game core - players, sessions, imposter rotation, vote tally

mod error;
mod imposter;
mod registry;
mod session;
mod tally;

pub use error::{ErrorKind, GameError, GameResult};
pub use imposter::select_imposter;
pub use registry::SessionRegistry;
pub use session::{Advance, Session, SessionSnapshot, VoteOutcome};
pub use tally::{apply_awards, majority_threshold, tally, RoundResult, TallyOutcome};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a player, assigned by the transport per connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A player taking part in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    /// Display name chosen at join
    pub name: String,

    /// Cumulative score across rounds
    pub score: i64,

    /// Word submitted this round
    pub word: Option<String>,

    /// Player voted for this round
    pub vote: Option<PlayerId>,

    pub is_imposter: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
            word: None,
            vote: None,
            is_imposter: false,
        }
    }

    /// Clear everything that only lives for one round
    pub fn reset_round(&mut self) {
        self.word = None;
        self.vote = None;
        self.is_imposter = false;
    }
}

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Accepting joins, no secret assigned
    Lobby,
    /// Secret assigned, accepting words and votes
    InRound,
    /// Verdict computed, waiting for the next round
    RoundResolved,
    /// Round limit reached
    Ended,
}

/// Outcome of a round's vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    InnocentsWin,
    ImposterWins,
}

impl Verdict {
    /// Text shown to players when the round resolves
    pub fn announcement(&self) -> &'static str {
        match self {
            Verdict::InnocentsWin => "Innocents won! 💯",
            Verdict::ImposterWins => "Imposter won! ☠️",
        }
    }
}

/// Game rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of rounds before the session ends
    pub round_limit: u32,

    /// Delay between a verdict and the next round, in milliseconds
    pub reveal_delay_ms: u64,

    /// Points for each innocent when the imposter is caught
    pub innocent_award: i64,

    /// Points for the imposter when they escape
    pub imposter_award: i64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_limit: 5,
            reveal_delay_ms: 5000,
            innocent_award: 20,
            imposter_award: 50,
        }
    }
}
