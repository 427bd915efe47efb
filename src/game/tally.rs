//! Vote tally and round scoring

use super::{GameConfig, Player, PlayerId, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of a fully voted round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub verdict: Verdict,

    /// Imposter at the time of the tally, if they are still present
    pub imposter: Option<PlayerId>,

    /// Votes received by the imposter
    pub imposter_votes: usize,

    /// Votes needed to catch the imposter
    pub threshold: usize,
}

/// Outcome of a tally attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyOutcome {
    /// At least one player has not voted yet
    Pending,
    Decided(RoundResult),
}

/// Votes needed for a strict majority of `player_count`
pub fn majority_threshold(player_count: usize) -> usize {
    player_count / 2 + 1
}

/// Tally the votes of `players`.
///
/// Nothing is counted until every player has voted. Votes for ids that are no
/// longer in the session still count toward that id.
pub fn tally(players: &[Player]) -> TallyOutcome {
    if players.is_empty() || players.iter().any(|p| p.vote.is_none()) {
        return TallyOutcome::Pending;
    }

    let mut votes: HashMap<PlayerId, usize> = HashMap::new();
    for target in players.iter().filter_map(|p| p.vote) {
        *votes.entry(target).or_default() += 1;
    }

    let imposter = players.iter().find(|p| p.is_imposter).map(|p| p.id);
    let imposter_votes = imposter
        .and_then(|id| votes.get(&id).copied())
        .unwrap_or(0);
    let threshold = majority_threshold(players.len());

    let verdict = if imposter_votes >= threshold {
        Verdict::InnocentsWin
    } else {
        Verdict::ImposterWins
    };

    TallyOutcome::Decided(RoundResult {
        verdict,
        imposter,
        imposter_votes,
        threshold,
    })
}

/// Award round points for `verdict`. Exactly one side scores.
pub fn apply_awards(players: &mut [Player], verdict: Verdict, config: &GameConfig) {
    for player in players.iter_mut() {
        match verdict {
            Verdict::InnocentsWin if !player.is_imposter => player.score += config.innocent_award,
            Verdict::ImposterWins if player.is_imposter => player.score += config.imposter_award,
            _ => {}
        }
    }
}
