//! Session registry - session id to session mapping

use super::{GameConfig, Player, PlayerId, Session};
use std::collections::HashMap;

/// Owns every live session, keyed by the caller-chosen id
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session, replacing any session already registered under `id`.
    ///
    /// Returns the new session and the one it replaced, if any.
    pub fn create(
        &mut self,
        id: &str,
        first_player: Player,
        rules: &GameConfig,
    ) -> (&mut Session, Option<Session>) {
        let session = Session::with_rules(id, first_player, rules.clone());
        let replaced = self.sessions.remove(id);
        if replaced.is_some() {
            tracing::warn!("Session '{}' already existed and was replaced", id);
        }
        let session = self.sessions.entry(id.to_string()).or_insert(session);
        (session, replaced)
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Session> {
        let removed = self.sessions.remove(id);
        if removed.is_some() {
            tracing::info!("Session '{}' torn down", id);
        }
        removed
    }

    /// Ids of every session that contains `player`
    pub fn find_by_player(&self, player: PlayerId) -> Vec<String> {
        self.sessions
            .values()
            .filter(|s| s.contains(player))
            .map(|s| s.id().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_lookup() {
        let mut registry = SessionRegistry::new();
        let alice = PlayerId::new();

        registry.create("A1", Player::new(alice, "alice"), &GameConfig::default());

        let session = registry.get("A1").unwrap();
        assert_eq!(session.players().len(), 1);
        assert!(session.contains(alice));
        assert!(registry.get("a1").is_none(), "ids are case-sensitive");
    }

    #[test]
    fn test_create_replaces_existing() {
        let mut registry = SessionRegistry::new();
        let rules = GameConfig::default();
        let (first, _) = registry.create("dup", Player::new(PlayerId::new(), "first"), &rules);
        let first_instance = first.instance();

        let (second, replaced) =
            registry.create("dup", Player::new(PlayerId::new(), "second"), &rules);
        assert_ne!(second.instance(), first_instance);
        assert_eq!(replaced.map(|s| s.instance()), Some(first_instance));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut registry = SessionRegistry::new();
        registry.create("gone", Player::new(PlayerId::new(), "x"), &GameConfig::default());

        assert!(registry.remove("gone").is_some());
        assert!(registry.get("gone").is_none());
        assert!(registry.remove("gone").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_find_by_player() {
        let mut registry = SessionRegistry::new();
        let rules = GameConfig::default();
        let shared = PlayerId::new();
        registry.create("one", Player::new(shared, "a"), &rules);
        registry.create("two", Player::new(PlayerId::new(), "b"), &rules);

        assert_eq!(registry.find_by_player(shared), vec!["one".to_string()]);
        assert!(registry.find_by_player(PlayerId::new()).is_empty());
    }
}
