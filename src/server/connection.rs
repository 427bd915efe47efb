//! Client connection handling

use crate::game::PlayerId;
use crate::protocol::{
    check_frame_length, deserialize, frame_message, serialize, ClientMessage, ServerMessage,
    PROTOCOL_VERSION,
};
use anyhow::{anyhow, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Represents a connected client
pub struct ClientConnection {
    /// Connection id, which doubles as the player id
    id: PlayerId,

    /// Channel to send messages to this client
    sender: mpsc::Sender<ServerMessage>,
}

impl ClientConnection {
    /// Create a new client connection
    pub fn new(sender: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            id: PlayerId::new(),
            sender,
        }
    }

    /// Get client ID
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Queue a message for the client without waiting.
    ///
    /// Fails if the client's queue is full or its writer has gone away.
    pub fn send(&self, msg: ServerMessage) -> Result<()> {
        self.sender
            .try_send(msg)
            .map_err(|e| anyhow!("Failed to send message to client {}: {}", self.id, e))
    }
}

/// Read a length-prefixed message from a stream
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut len_bytes = [0u8; 4];

    match reader.read_exact(&mut len_bytes).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_be_bytes(len_bytes);
    check_frame_length(len)?;

    let mut buffer = vec![0u8; len as usize];
    reader.read_exact(&mut buffer).await?;

    Ok(Some(buffer))
}

/// Write a length-prefixed message to a stream
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<()> {
    let framed = frame_message(payload);
    writer.write_all(&framed).await?;
    writer.flush().await?;
    Ok(())
}

/// Task to write outgoing messages to the client
pub async fn client_writer_task<W: AsyncWrite + Unpin>(
    mut writer: W,
    mut receiver: mpsc::Receiver<ServerMessage>,
) {
    while let Some(msg) = receiver.recv().await {
        match serialize(&msg) {
            Ok(payload) => {
                if let Err(e) = write_message(&mut writer, &payload).await {
                    tracing::error!("Failed to write message to client: {}", e);
                    break;
                }
            }
            Err(e) => {
                tracing::error!("Failed to serialize message: {}", e);
            }
        }
    }

    tracing::debug!("Client writer task finished");
}

/// Parse a client message from bytes
pub fn parse_client_message(bytes: &[u8]) -> Result<ClientMessage> {
    deserialize(bytes)
}

/// Create a welcome message for a new client
pub fn create_welcome_message(player_id: PlayerId) -> ServerMessage {
    ServerMessage::Welcome {
        player_id,
        protocol_version: PROTOCOL_VERSION,
    }
}

/// Create an error message
pub fn create_error_message(message: String) -> ServerMessage {
    ServerMessage::Error { message }
}
