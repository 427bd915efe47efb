//! Engine - routes player intents to sessions and reports what to send back
//!
//! The engine never touches the network. Every call returns a list of
//! [`Effect`]s for the transport to carry out, in order.

mod effect;

pub use effect::Effect;

use crate::content::WordSource;
use crate::game::{
    Advance, GameConfig, GameError, GameResult, Player, PlayerId, Session, SessionRegistry,
    VoteOutcome,
};
use crate::protocol::{check_version_compatibility, ClientMessage, ServerMessage, PROTOCOL_VERSION};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use uuid::Uuid;

/// Owns every session and applies intents one at a time
pub struct Engine {
    rules: GameConfig,
    registry: SessionRegistry,
    words: Box<dyn WordSource>,
    rng: StdRng,
}

impl Engine {
    /// Create an engine seeded from OS entropy
    pub fn new(rules: GameConfig, words: Box<dyn WordSource>) -> Self {
        Self::with_rng(rules, words, StdRng::from_entropy())
    }

    /// Create an engine with a caller-supplied RNG
    pub fn with_rng(rules: GameConfig, words: Box<dyn WordSource>, rng: StdRng) -> Self {
        Self {
            rules,
            registry: SessionRegistry::new(),
            words,
            rng,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Apply one intent from `connection`
    pub fn handle(&mut self, connection: PlayerId, msg: ClientMessage) -> Vec<Effect> {
        let intent = msg.name();
        tracing::debug!("{} from {}", intent, connection);

        match self.dispatch(connection, msg) {
            Ok(effects) => effects,
            Err(e) if e.is_user_visible() => {
                tracing::debug!("{} from {} rejected: {}", intent, connection, e);
                vec![Effect::Send {
                    to: connection,
                    message: ServerMessage::Error {
                        message: e.to_string(),
                    },
                }]
            }
            Err(e) => {
                tracing::error!("{} from {} aborted: {}", intent, connection, e);
                Vec::new()
            }
        }
    }

    fn dispatch(&mut self, connection: PlayerId, msg: ClientMessage) -> GameResult<Vec<Effect>> {
        match msg {
            ClientMessage::Hello { protocol_version } => {
                let message = match check_version_compatibility(protocol_version, PROTOCOL_VERSION)
                {
                    Ok(()) => ServerMessage::Ack {
                        for_command: "Hello".to_string(),
                    },
                    Err(e) => ServerMessage::Error {
                        message: e.to_string(),
                    },
                };
                Ok(vec![Effect::Send {
                    to: connection,
                    message,
                }])
            }

            ClientMessage::CreateGame {
                session_id,
                player_name,
            } => {
                let player = Player::new(connection, player_name);
                let (session, replaced) = self.registry.create(&session_id, player, &self.rules);
                let snapshot = session.snapshot();
                tracing::info!("Session '{}' created by {}", session_id, connection);

                let mut effects = Vec::new();
                if replaced.is_some() {
                    effects.push(Effect::CancelAdvance {
                        session_id: session_id.clone(),
                    });
                    effects.push(Effect::DropGroup {
                        session_id: session_id.clone(),
                    });
                }
                effects.push(Effect::JoinGroup {
                    session_id: session_id.clone(),
                    connection,
                });
                effects.push(Effect::Broadcast {
                    session_id,
                    message: ServerMessage::GameStateUpdate(snapshot),
                });
                Ok(effects)
            }

            ClientMessage::JoinGame {
                session_id,
                player_name,
            } => {
                let session = self
                    .registry
                    .get_mut(&session_id)
                    .ok_or_else(|| GameError::JoinRejected(session_id.clone()))?;
                session.join(Player::new(connection, player_name))?;
                let snapshot = session.snapshot();

                Ok(vec![
                    Effect::JoinGroup {
                        session_id: session_id.clone(),
                        connection,
                    },
                    Effect::Broadcast {
                        session_id,
                        message: ServerMessage::GameStateUpdate(snapshot),
                    },
                ])
            }

            ClientMessage::UpdateScore {
                session_id,
                player_id,
                points,
            } => {
                let session = self.session_mut(&session_id)?;
                session.adjust_score(player_id, points)?;
                tracing::info!(
                    "Score of {} in '{}' adjusted by {}",
                    player_id,
                    session_id,
                    points
                );
                let snapshot = session.snapshot();
                Ok(vec![Effect::Broadcast {
                    session_id,
                    message: ServerMessage::GameStateUpdate(snapshot),
                }])
            }

            ClientMessage::StartGame { session_id } => {
                let session = self
                    .registry
                    .get_mut(&session_id)
                    .ok_or_else(|| GameError::SessionNotFound(session_id.clone()))?;
                session.start(self.words.as_ref(), &mut self.rng)?;
                let snapshot = session.snapshot();

                Ok(vec![
                    Effect::Broadcast {
                        session_id: session_id.clone(),
                        message: ServerMessage::StartGame {
                            session_id: session_id.clone(),
                        },
                    },
                    Effect::Broadcast {
                        session_id,
                        message: ServerMessage::GameStateUpdate(snapshot),
                    },
                ])
            }

            ClientMessage::FetchGameData { session_id } => {
                let session = self
                    .registry
                    .get(&session_id)
                    .ok_or(GameError::SessionNotFound(session_id))?;
                Ok(vec![Effect::Send {
                    to: connection,
                    message: ServerMessage::GameDataFetched(session.snapshot()),
                }])
            }

            ClientMessage::SubmitWord { session_id, word } => {
                let session = self.session_mut(&session_id)?;
                session.submit_word(connection, word)?;
                let snapshot = session.snapshot();
                Ok(vec![Effect::Broadcast {
                    session_id,
                    message: ServerMessage::GameStateUpdate(snapshot),
                }])
            }

            ClientMessage::Vote { session_id, target } => {
                let delay = Duration::from_millis(self.rules.reveal_delay_ms);
                let session = self.session_mut(&session_id)?;

                match session.vote(connection, target)? {
                    VoteOutcome::Pending => {
                        let snapshot = session.snapshot();
                        Ok(vec![Effect::Broadcast {
                            session_id,
                            message: ServerMessage::GameStateUpdate(snapshot),
                        }])
                    }
                    VoteOutcome::Resolved(result) => {
                        let instance = session.instance();
                        Ok(vec![
                            Effect::Broadcast {
                                session_id: session_id.clone(),
                                message: ServerMessage::RoundResult {
                                    verdict: result.verdict,
                                    message: result.verdict.announcement().to_string(),
                                },
                            },
                            Effect::Broadcast {
                                session_id: session_id.clone(),
                                message: ServerMessage::RevealImposter {
                                    player_id: result.imposter,
                                },
                            },
                            Effect::ScheduleAdvance {
                                session_id,
                                instance,
                                delay,
                            },
                        ])
                    }
                }
            }
        }
    }

    fn session_mut(&mut self, id: &str) -> GameResult<&mut Session> {
        self.registry
            .get_mut(id)
            .ok_or_else(|| GameError::SessionNotFound(id.to_string()))
    }

    /// Remove a departed connection from every session it plays in
    pub fn disconnect(&mut self, connection: PlayerId) -> Vec<Effect> {
        let mut effects = Vec::new();

        for session_id in self.registry.find_by_player(connection) {
            let Some(session) = self.registry.get_mut(&session_id) else {
                continue;
            };
            session.remove_player(connection);

            if session.is_empty() {
                self.registry.remove(&session_id);
                effects.push(Effect::CancelAdvance {
                    session_id: session_id.clone(),
                });
                effects.push(Effect::DropGroup { session_id });
            } else {
                let snapshot = session.snapshot();
                effects.push(Effect::Broadcast {
                    session_id,
                    message: ServerMessage::GameStateUpdate(snapshot),
                });
            }
        }

        effects
    }

    /// Deferred step after a verdict: next round or game end.
    ///
    /// No-op when the session is gone or was replaced since scheduling.
    pub fn advance_round(&mut self, session_id: &str, instance: Uuid) -> Vec<Effect> {
        let Some(session) = self.registry.get_mut(session_id) else {
            tracing::debug!("Skipping advance for '{}': session is gone", session_id);
            return Vec::new();
        };
        if session.instance() != instance {
            tracing::debug!("Skipping advance for '{}': session was replaced", session_id);
            return Vec::new();
        }

        match session.advance(self.words.as_ref(), &mut self.rng) {
            Ok(Advance::NextRound { .. }) => vec![Effect::Broadcast {
                session_id: session_id.to_string(),
                message: ServerMessage::GameStateUpdate(session.snapshot()),
            }],
            Ok(Advance::Ended { players }) => {
                self.registry.remove(session_id);
                vec![
                    Effect::Broadcast {
                        session_id: session_id.to_string(),
                        message: ServerMessage::GameEnded { players },
                    },
                    Effect::DropGroup {
                        session_id: session_id.to_string(),
                    },
                ]
            }
            Err(e) => {
                tracing::error!("Advance of '{}' aborted: {}", session_id, e);
                Vec::new()
            }
        }
    }
}
