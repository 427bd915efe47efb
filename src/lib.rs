//! imposter - authoritative session server for the Imposter word party game
//!
//! This crate provides the core functionality for imposter, including:
//! - Session state machine (lobby, rounds, verdicts, scoring)
//! - Imposter rotation and vote tallying
//! - Client-server protocol
//! - Configuration management
//!
//! # Architecture
//!
//! Clients connect over TCP and send intents. Every intent is routed to a
//! single engine task that owns all sessions, so mutations to a session are
//! applied strictly in arrival order. The engine answers with effects
//! (unicast, broadcast, timers) that the server carries out.

pub mod config;
pub mod content;
pub mod engine;
pub mod game;
pub mod protocol;
pub mod server;
