//! Game errors

use super::PlayerId;
use thiserror::Error;

/// Result type for session operations.
pub type GameResult<T> = Result<T, GameError>;

/// Broad category of a [`GameError`], used to decide who hears about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced session or player does not exist
    NotFound,
    /// Action attempted outside its permitted phase
    InvalidState,
    /// Internal invariant breach; logged, never shown to players
    Precondition,
}

/// Errors raised by the session state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Game not found")]
    SessionNotFound(String),

    #[error("Game not found or already started")]
    JoinRejected(String),

    #[error("Player not found")]
    PlayerNotFound(PlayerId),

    #[error("Game already started")]
    AlreadyStarted(String),

    #[error("Already in this game")]
    AlreadyJoined(String),

    #[error("Score out of range")]
    ScoreOverflow(PlayerId),

    #[error("No round in progress")]
    NotInRound(String),

    #[error("Round has not been resolved")]
    NotResolved(String),

    #[error("Session '{0}' has no players to choose an imposter from")]
    NoPlayers(String),
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::SessionNotFound(_)
            | GameError::JoinRejected(_)
            | GameError::PlayerNotFound(_) => ErrorKind::NotFound,
            GameError::AlreadyStarted(_)
            | GameError::AlreadyJoined(_)
            | GameError::ScoreOverflow(_)
            | GameError::NotInRound(_)
            | GameError::NotResolved(_) => ErrorKind::InvalidState,
            GameError::NoPlayers(_) => ErrorKind::Precondition,
        }
    }

    /// Whether the originating player should be told about this error
    pub fn is_user_visible(&self) -> bool {
        self.kind() != ErrorKind::Precondition
    }
}
