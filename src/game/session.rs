//! Session state machine - lobby, rounds, verdicts, game end

use super::{
    apply_awards, select_imposter, tally, GameConfig, GameError, GameResult, Phase, Player,
    PlayerId, RoundResult, TallyOutcome,
};
use crate::content::{SecretPair, WordSource};
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of recording a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Still waiting on other players
    Pending,
    /// Everyone voted; scores have been awarded
    Resolved(RoundResult),
}

/// Result of moving past a resolved round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// A new round started
    NextRound { round: u32 },
    /// Round limit reached; final standings
    Ended { players: Vec<Player> },
}

/// Full view of a session, as sent to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub phase: Phase,
    pub started: bool,
    pub current_round: u32,
    pub round_limit: u32,
    pub category: Option<String>,
    pub secret_word: Option<String>,
    pub players: Vec<Player>,
    pub imposter_history: Vec<PlayerId>,
    pub created_at: DateTime<Utc>,
}

/// One game, addressed by a caller-chosen id
#[derive(Debug, Clone)]
pub struct Session {
    id: String,

    /// Distinguishes this session from a later one created under the same id
    instance: Uuid,

    created_at: DateTime<Utc>,
    rules: GameConfig,
    phase: Phase,
    current_round: u32,
    secret: Option<SecretPair>,

    /// Players in join order
    pub(super) players: Vec<Player>,

    /// Players who served as imposter since the last full rotation
    pub(super) imposter_history: Vec<PlayerId>,
}

impl Session {
    /// Create a session in the lobby with its first player
    pub fn new(id: impl Into<String>, first_player: Player, round_limit: u32) -> Self {
        Self::with_rules(
            id,
            first_player,
            GameConfig {
                round_limit,
                ..GameConfig::default()
            },
        )
    }

    /// Create a session with explicit game rules
    pub fn with_rules(id: impl Into<String>, first_player: Player, mut rules: GameConfig) -> Self {
        rules.round_limit = rules.round_limit.max(1);
        Self {
            id: id.into(),
            instance: Uuid::new_v4(),
            created_at: Utc::now(),
            rules,
            phase: Phase::Lobby,
            current_round: 1,
            secret: None,
            players: vec![first_player],
            imposter_history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn instance(&self) -> Uuid {
        self.instance
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the game has left the lobby
    pub fn is_started(&self) -> bool {
        self.phase != Phase::Lobby
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn round_limit(&self) -> u32 {
        self.rules.round_limit
    }

    /// Current category and word; only set once started
    pub fn secret(&self) -> Option<&SecretPair> {
        self.secret.as_ref()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn imposter(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_imposter)
    }

    pub fn imposter_history(&self) -> &[PlayerId] {
        &self.imposter_history
    }

    fn player_mut(&mut self, id: PlayerId) -> GameResult<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GameError::PlayerNotFound(id))
    }

    fn require_phase(&self, phase: Phase) -> GameResult<()> {
        if self.phase == phase {
            return Ok(());
        }
        Err(match phase {
            Phase::Lobby => GameError::AlreadyStarted(self.id.clone()),
            Phase::InRound => GameError::NotInRound(self.id.clone()),
            Phase::RoundResolved | Phase::Ended => GameError::NotResolved(self.id.clone()),
        })
    }

    /// Add a player; only allowed in the lobby
    pub fn join(&mut self, player: Player) -> GameResult<()> {
        if self.phase != Phase::Lobby {
            return Err(GameError::JoinRejected(self.id.clone()));
        }
        if self.contains(player.id) {
            return Err(GameError::AlreadyJoined(self.id.clone()));
        }
        tracing::info!("Player '{}' ({}) joined '{}'", player.name, player.id, self.id);
        self.players.push(player);
        Ok(())
    }

    /// Leave the lobby and begin round one
    pub fn start(&mut self, words: &dyn WordSource, rng: &mut dyn RngCore) -> GameResult<()> {
        self.require_phase(Phase::Lobby)?;
        if self.players.is_empty() {
            return Err(GameError::NoPlayers(self.id.clone()));
        }

        for player in self.players.iter_mut() {
            player.reset_round();
        }
        self.imposter_history.clear();
        self.current_round = 1;
        self.secret = Some(words.next(rng));
        select_imposter(self, rng)?;
        self.phase = Phase::InRound;

        tracing::info!(
            "Session '{}' started with {} players",
            self.id,
            self.players.len()
        );
        Ok(())
    }

    /// Record a player's word for this round
    pub fn submit_word(&mut self, player: PlayerId, word: impl Into<String>) -> GameResult<()> {
        self.require_phase(Phase::InRound)?;
        self.player_mut(player)?.word = Some(word.into());
        Ok(())
    }

    /// Record a vote and tally once everyone has voted
    pub fn vote(&mut self, player: PlayerId, target: PlayerId) -> GameResult<VoteOutcome> {
        self.require_phase(Phase::InRound)?;
        self.player_mut(player)?.vote = Some(target);

        match tally(&self.players) {
            TallyOutcome::Pending => Ok(VoteOutcome::Pending),
            TallyOutcome::Decided(result) => {
                apply_awards(&mut self.players, result.verdict, &self.rules);
                self.phase = Phase::RoundResolved;
                tracing::info!(
                    "Round {} of '{}' resolved: {:?} ({} of {} votes needed)",
                    self.current_round,
                    self.id,
                    result.verdict,
                    result.imposter_votes,
                    result.threshold
                );
                Ok(VoteOutcome::Resolved(result))
            }
        }
    }

    /// Move past a resolved round: start the next one, or end the game
    pub fn advance(&mut self, words: &dyn WordSource, rng: &mut dyn RngCore) -> GameResult<Advance> {
        self.require_phase(Phase::RoundResolved)?;

        if self.current_round >= self.rules.round_limit {
            self.phase = Phase::Ended;
            tracing::info!("Session '{}' ended after {} rounds", self.id, self.current_round);
            return Ok(Advance::Ended {
                players: self.players.clone(),
            });
        }

        if self.players.is_empty() {
            return Err(GameError::NoPlayers(self.id.clone()));
        }

        self.current_round += 1;
        for player in self.players.iter_mut() {
            player.reset_round();
        }
        select_imposter(self, rng)?;
        self.secret = Some(words.next(rng));
        self.phase = Phase::InRound;

        tracing::info!("Session '{}' entered round {}", self.id, self.current_round);
        Ok(Advance::NextRound {
            round: self.current_round,
        })
    }

    /// Remove a player in any phase. A departing imposter is not replaced.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        let player = self.players.remove(index);
        if player.is_imposter && self.phase == Phase::InRound {
            tracing::warn!(
                "Imposter {} left '{}' mid-round; round continues without one",
                id,
                self.id
            );
        }
        Some(player)
    }

    /// Administrative score change, outside of round scoring
    pub fn adjust_score(&mut self, player: PlayerId, points: i64) -> GameResult<()> {
        let entry = self.player_mut(player)?;
        entry.score = entry
            .score
            .checked_add(points)
            .ok_or(GameError::ScoreOverflow(player))?;
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            phase: self.phase,
            started: self.is_started(),
            current_round: self.current_round,
            round_limit: self.rules.round_limit,
            category: self.secret.as_ref().map(|s| s.category.clone()),
            secret_word: self.secret.as_ref().map(|s| s.word.clone()),
            players: self.players.clone(),
            imposter_history: self.imposter_history.clone(),
            created_at: self.created_at,
        }
    }
}
