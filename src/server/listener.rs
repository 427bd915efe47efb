//! TCP listener and the engine loop that serializes all game mutations

use super::connection::{
    client_writer_task, create_error_message, create_welcome_message, parse_client_message,
    read_message, ClientConnection,
};
use super::hub::Hub;
use crate::engine::{Effect, Engine};
use crate::game::PlayerId;
use crate::protocol::{ClientMessage, ServerMessage};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Input to the engine loop
enum EngineInput {
    Connected {
        client: ClientConnection,
    },
    Intent {
        connection: PlayerId,
        message: ClientMessage,
    },
    Disconnected {
        connection: PlayerId,
    },
    TimerFired {
        session_id: String,
        instance: Uuid,
    },
    Shutdown,
}

/// TCP server listener
pub struct ServerListener {
    listener: TcpListener,
}

impl ServerListener {
    /// Bind to `addr` (e.g. `0.0.0.0:3001`, or port 0 for an ephemeral port)
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        Ok(Self { listener })
    }

    /// Address the server is listening on
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the server until a shutdown signal arrives
    pub async fn run(self, engine: Engine, mut shutdown_rx: mpsc::Receiver<()>) -> Result<()> {
        tracing::info!("Server listening on {}", self.local_addr()?);

        let (input_tx, input_rx) = mpsc::channel::<EngineInput>(256);
        let engine_handle = tokio::spawn(EngineLoop::new(engine, input_tx.clone()).run(input_rx));

        // Main server loop
        loop {
            tokio::select! {
                // Handle shutdown signal
                _ = shutdown_rx.recv() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }

                // Accept new connections
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, addr)) => {
                            let input_tx = input_tx.clone();
                            tokio::spawn(async move {
                                if let Err(e) = handle_client(stream, input_tx).await {
                                    tracing::error!("Client {} error: {}", addr, e);
                                }
                            });
                        }
                        Err(e) => {
                            tracing::error!("Failed to accept connection: {}", e);
                        }
                    }
                }
            }
        }

        if input_tx.send(EngineInput::Shutdown).await.is_err() {
            tracing::debug!("Engine loop already stopped");
        }
        if let Err(e) = engine_handle.await {
            tracing::error!("Engine loop failed: {}", e);
        }

        Ok(())
    }
}

/// Handle a single client connection
async fn handle_client(stream: TcpStream, input_tx: mpsc::Sender<EngineInput>) -> Result<()> {
    let (mut reader, writer) = stream.into_split();

    // Create message channel for this client
    let (tx, rx) = mpsc::channel::<ServerMessage>(256);
    let reply_tx = tx.clone();
    let client = ClientConnection::new(tx);
    let client_id = client.id();

    tracing::info!("Client connected: {}", client_id);

    // Spawn writer task
    let writer_handle = tokio::spawn(client_writer_task(writer, rx));

    input_tx
        .send(EngineInput::Connected { client })
        .await
        .context("Engine loop is gone")?;

    // Read and process messages
    loop {
        match read_message(&mut reader).await {
            Ok(Some(bytes)) => match parse_client_message(&bytes) {
                Ok(message) => {
                    let intent = EngineInput::Intent {
                        connection: client_id,
                        message,
                    };
                    if input_tx.send(intent).await.is_err() {
                        tracing::warn!("Engine loop is gone, closing {}", client_id);
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to parse message: {}", e);
                    let _ = reply_tx
                        .send(create_error_message(format!("Invalid message: {}", e)))
                        .await;
                }
            },
            Ok(None) => {
                // Client disconnected
                tracing::info!("Client disconnected: {}", client_id);
                break;
            }
            Err(e) => {
                tracing::error!("Error reading from client {}: {}", client_id, e);
                break;
            }
        }
    }

    let _ = input_tx
        .send(EngineInput::Disconnected {
            connection: client_id,
        })
        .await;

    writer_handle.abort();

    tracing::info!("Client handler finished: {}", client_id);

    Ok(())
}

/// Pending round advance for one session
struct PendingAdvance {
    instance: Uuid,
    handle: JoinHandle<()>,
}

/// Single owner of the engine, the hub and the round timers
struct EngineLoop {
    engine: Engine,
    hub: Hub,
    timers: HashMap<String, PendingAdvance>,
    input_tx: mpsc::Sender<EngineInput>,
}

impl EngineLoop {
    fn new(engine: Engine, input_tx: mpsc::Sender<EngineInput>) -> Self {
        Self {
            engine,
            hub: Hub::new(),
            timers: HashMap::new(),
            input_tx,
        }
    }

    async fn run(mut self, mut input_rx: mpsc::Receiver<EngineInput>) {
        while let Some(input) = input_rx.recv().await {
            let effects = match input {
                EngineInput::Connected { client } => {
                    let id = client.id();
                    self.hub.register(client);
                    self.hub.send_to(id, create_welcome_message(id));
                    Vec::new()
                }
                EngineInput::Intent {
                    connection,
                    message,
                } => self.engine.handle(connection, message),
                EngineInput::Disconnected { connection } => {
                    self.hub.unregister(connection);
                    self.engine.disconnect(connection)
                }
                EngineInput::TimerFired {
                    session_id,
                    instance,
                } => {
                    if self
                        .timers
                        .get(&session_id)
                        .is_some_and(|pending| pending.instance == instance)
                    {
                        self.timers.remove(&session_id);
                    }
                    self.engine.advance_round(&session_id, instance)
                }
                EngineInput::Shutdown => break,
            };

            for effect in effects {
                self.apply(effect);
            }
        }

        for (_, pending) in self.timers.drain() {
            pending.handle.abort();
        }
        tracing::info!(
            "Engine loop finished with {} sessions and {} clients",
            self.engine.registry().len(),
            self.hub.client_count()
        );
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Send { to, message } => self.hub.send_to(to, message),
            Effect::Broadcast {
                session_id,
                message,
            } => self.hub.broadcast(&session_id, message),
            Effect::JoinGroup {
                session_id,
                connection,
            } => self.hub.join_group(&session_id, connection),
            Effect::DropGroup { session_id } => self.hub.drop_group(&session_id),
            Effect::ScheduleAdvance {
                session_id,
                instance,
                delay,
            } => {
                let input_tx = self.input_tx.clone();
                let fired = EngineInput::TimerFired {
                    session_id: session_id.clone(),
                    instance,
                };
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = input_tx.send(fired).await;
                });
                tracing::debug!("Round advance for '{}' in {:?}", session_id, delay);
                if let Some(previous) = self
                    .timers
                    .insert(session_id, PendingAdvance { instance, handle })
                {
                    previous.handle.abort();
                }
            }
            Effect::CancelAdvance { session_id } => {
                if let Some(pending) = self.timers.remove(&session_id) {
                    tracing::debug!("Cancelled round advance for '{}'", session_id);
                    pending.handle.abort();
                }
            }
        }
    }
}
