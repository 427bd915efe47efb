//! Imposter rotation - nobody repeats until every current player has served

use super::{GameError, GameResult, PlayerId, Session};
use rand::seq::SliceRandom;
use rand::Rng;

/// Pick the next imposter for `session` and record them in its history.
///
/// Candidates are the current players who have not yet served. When that set
/// is empty the history is cleared and every current player is eligible again,
/// so at most two passes are made.
pub fn select_imposter<R: Rng + ?Sized>(session: &mut Session, rng: &mut R) -> GameResult<PlayerId> {
    if session.players.is_empty() {
        return Err(GameError::NoPlayers(session.id().to_string()));
    }

    for _ in 0..2 {
        let candidates: Vec<usize> = session
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| !session.imposter_history.contains(&p.id))
            .map(|(index, _)| index)
            .collect();

        let Some(&chosen) = candidates.choose(rng) else {
            tracing::debug!(
                "All players in '{}' have been imposter, starting a new rotation",
                session.id()
            );
            session.imposter_history.clear();
            continue;
        };

        for player in session.players.iter_mut() {
            player.is_imposter = false;
        }
        session.players[chosen].is_imposter = true;
        let imposter = session.players[chosen].id;
        session.imposter_history.push(imposter);

        tracing::debug!(
            "Selected imposter {} in '{}' ({} candidates)",
            imposter,
            session.id(),
            candidates.len()
        );
        return Ok(imposter);
    }

    Err(GameError::NoPlayers(session.id().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Player;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn session_with(count: usize) -> Session {
        let mut players = (0..count).map(|i| Player::new(PlayerId::new(), format!("p{}", i)));
        let mut session = Session::new("room", players.next().unwrap(), 5);
        for player in players {
            session.join(player).unwrap();
        }
        session
    }

    #[test]
    fn test_marks_exactly_one_imposter() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = session_with(4);

        let id = select_imposter(&mut session, &mut rng).unwrap();

        let flagged: Vec<_> = session.players().iter().filter(|p| p.is_imposter).collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].id, id);
        assert_eq!(session.imposter_history(), &[id]);
    }

    #[test]
    fn test_full_rotation_before_repeat() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = session_with(5);

        let mut seen = HashSet::new();
        for _ in 0..5 {
            let id = select_imposter(&mut session, &mut rng).unwrap();
            assert!(seen.insert(id), "player {} chosen twice in one rotation", id);
        }
        assert_eq!(session.imposter_history().len(), 5);

        // Sixth pick starts a fresh rotation
        let id = select_imposter(&mut session, &mut rng).unwrap();
        assert_eq!(session.imposter_history(), &[id]);
    }

    #[test]
    fn test_single_player_always_chosen() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = session_with(1);
        let only = session.players()[0].id;

        for _ in 0..3 {
            assert_eq!(select_imposter(&mut session, &mut rng).unwrap(), only);
        }
    }

    #[test]
    fn test_departed_history_entries_are_ignored() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = session_with(2);
        let first = select_imposter(&mut session, &mut rng).unwrap();

        let remaining = session
            .players()
            .iter()
            .find(|p| p.id != first)
            .map(|p| p.id)
            .unwrap();
        session.remove_player(remaining);
        session.join(Player::new(PlayerId::new(), "late")).unwrap();

        let next = select_imposter(&mut session, &mut rng).unwrap();
        assert_ne!(next, first);
    }

    #[test]
    fn test_no_players_is_reported() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = session_with(1);
        let only = session.players()[0].id;
        session.remove_player(only);

        let err = select_imposter(&mut session, &mut rng).unwrap_err();
        assert_eq!(err, GameError::NoPlayers("room".to_string()));
    }
}
