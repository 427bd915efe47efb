//! Protocol definitions for client-server communication
//!
//! Uses MessagePack for compact binary serialization, framed with a
//! big-endian length prefix.

mod message;

pub use message::{ClientMessage, ServerMessage};

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Protocol version for compatibility checking
pub const PROTOCOL_VERSION: u32 = 1;

/// Protocol-specific errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Protocol version mismatch: client={client}, server={server}")]
    VersionMismatch { client: u32, server: u32 },

    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: u32, max: u32 },
}

/// Largest accepted frame payload (1 MB)
pub const MAX_MESSAGE_SIZE: u32 = 1024 * 1024;

/// Serialize a message to MessagePack bytes
pub fn serialize<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec(msg)?)
}

/// Deserialize a message from MessagePack bytes
pub fn deserialize<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T> {
    rmp_serde::from_slice(bytes).map_err(|e| {
        anyhow!(ProtocolError::MalformedMessage(format!(
            "Failed to deserialize: {}",
            e
        )))
    })
}

/// Frame a message with length prefix for streaming
///
/// Frame format: [4-byte length BE][payload]
pub fn frame_message(payload: &[u8]) -> Vec<u8> {
    let len = payload.len() as u32;
    let mut framed = Vec::with_capacity(4 + payload.len());
    framed.extend_from_slice(&len.to_be_bytes());
    framed.extend_from_slice(payload);
    framed
}

/// Reject frames whose declared length exceeds [`MAX_MESSAGE_SIZE`]
pub fn check_frame_length(length: u32) -> Result<()> {
    if length > MAX_MESSAGE_SIZE {
        bail!(ProtocolError::MessageTooLarge {
            size: length,
            max: MAX_MESSAGE_SIZE
        });
    }
    Ok(())
}

/// Check if client and server protocol versions are compatible
pub fn check_version_compatibility(client_version: u32, server_version: u32) -> Result<()> {
    if client_version != server_version {
        bail!(ProtocolError::VersionMismatch {
            client: client_version,
            server: server_version
        });
    }
    Ok(())
}
