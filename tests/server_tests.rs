//! Integration tests for the TCP server

use imposter::content::CategoryTable;
use imposter::engine::Engine;
use imposter::game::{GameConfig, PlayerId};
use imposter::protocol::{deserialize, serialize, ClientMessage, ServerMessage, PROTOCOL_VERSION};
use imposter::server::{read_message, write_message, ServerListener};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

async fn start_server(rules: GameConfig) -> (SocketAddr, mpsc::Sender<()>, JoinHandle<()>) {
    let engine = Engine::with_rng(
        rules,
        Box::new(CategoryTable::builtin()),
        StdRng::seed_from_u64(99),
    );
    let server = ServerListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

    let handle = tokio::spawn(async move {
        server.run(engine, shutdown_rx).await.unwrap();
    });

    (addr, shutdown_tx, handle)
}

async fn recv(stream: &mut TcpStream) -> ServerMessage {
    let bytes = timeout(Duration::from_secs(2), read_message(stream))
        .await
        .expect("Should receive message")
        .expect("Read should succeed")
        .expect("Stream should stay open");
    deserialize(&bytes).expect("Should deserialize")
}

async fn send(stream: &mut TcpStream, msg: &ClientMessage) {
    let bytes = serialize(msg).unwrap();
    write_message(stream, &bytes).await.unwrap();
}

/// Connect and consume the welcome message
async fn connect(addr: SocketAddr) -> (TcpStream, PlayerId) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    match recv(&mut stream).await {
        ServerMessage::Welcome {
            player_id,
            protocol_version,
        } => {
            assert_eq!(protocol_version, PROTOCOL_VERSION);
            (stream, player_id)
        }
        other => panic!("Expected Welcome message, got {:?}", other),
    }
}

async fn shutdown(shutdown_tx: mpsc::Sender<()>, handle: JoinHandle<()>) {
    let _ = shutdown_tx.send(()).await;
    let _ = timeout(Duration::from_secs(2), handle).await;
}

#[tokio::test]
async fn test_server_welcomes_and_acks_hello() {
    let (addr, shutdown_tx, handle) = start_server(GameConfig::default()).await;
    let (mut stream, _) = connect(addr).await;

    send(
        &mut stream,
        &ClientMessage::Hello {
            protocol_version: PROTOCOL_VERSION,
        },
    )
    .await;

    match recv(&mut stream).await {
        ServerMessage::Ack { for_command } => assert_eq!(for_command, "Hello"),
        other => panic!("Expected Ack message, got {:?}", other),
    }

    drop(stream);
    shutdown(shutdown_tx, handle).await;
}

#[tokio::test]
async fn test_server_reports_unknown_game() {
    let (addr, shutdown_tx, handle) = start_server(GameConfig::default()).await;
    let (mut stream, _) = connect(addr).await;

    send(
        &mut stream,
        &ClientMessage::FetchGameData {
            session_id: "nowhere".to_string(),
        },
    )
    .await;

    match recv(&mut stream).await {
        ServerMessage::Error { message } => assert_eq!(message, "Game not found"),
        other => panic!("Expected Error message, got {:?}", other),
    }

    drop(stream);
    shutdown(shutdown_tx, handle).await;
}

#[tokio::test]
async fn test_full_single_round_game() {
    let rules = GameConfig {
        round_limit: 1,
        reveal_delay_ms: 50,
        ..GameConfig::default()
    };
    let (addr, shutdown_tx, handle) = start_server(rules).await;
    let (mut alice, alice_id) = connect(addr).await;
    let (mut bob, bob_id) = connect(addr).await;

    send(
        &mut alice,
        &ClientMessage::CreateGame {
            session_id: "A1".to_string(),
            player_name: "alice".to_string(),
        },
    )
    .await;
    assert!(matches!(recv(&mut alice).await, ServerMessage::GameStateUpdate(_)));

    send(
        &mut bob,
        &ClientMessage::JoinGame {
            session_id: "A1".to_string(),
            player_name: "bob".to_string(),
        },
    )
    .await;
    for stream in [&mut alice, &mut bob] {
        match recv(stream).await {
            ServerMessage::GameStateUpdate(snapshot) => assert_eq!(snapshot.players.len(), 2),
            other => panic!("Expected state update, got {:?}", other),
        }
    }

    send(
        &mut alice,
        &ClientMessage::StartGame {
            session_id: "A1".to_string(),
        },
    )
    .await;
    let mut imposter = None;
    for stream in [&mut alice, &mut bob] {
        assert!(matches!(recv(stream).await, ServerMessage::StartGame { .. }));
        match recv(stream).await {
            ServerMessage::GameStateUpdate(snapshot) => {
                assert!(snapshot.started);
                imposter = snapshot.players.iter().find(|p| p.is_imposter).map(|p| p.id);
            }
            other => panic!("Expected state update, got {:?}", other),
        }
    }
    let imposter = imposter.expect("one player is imposter");
    assert!(imposter == alice_id || imposter == bob_id);

    // Both vote for the imposter: 2 of 2 meets the threshold
    send(
        &mut alice,
        &ClientMessage::Vote {
            session_id: "A1".to_string(),
            target: imposter,
        },
    )
    .await;
    for stream in [&mut alice, &mut bob] {
        assert!(matches!(recv(stream).await, ServerMessage::GameStateUpdate(_)));
    }
    send(
        &mut bob,
        &ClientMessage::Vote {
            session_id: "A1".to_string(),
            target: imposter,
        },
    )
    .await;

    for stream in [&mut alice, &mut bob] {
        match recv(stream).await {
            ServerMessage::RoundResult { message, .. } => assert_eq!(message, "Innocents won! 💯"),
            other => panic!("Expected round result, got {:?}", other),
        }
        match recv(stream).await {
            ServerMessage::RevealImposter { player_id } => assert_eq!(player_id, Some(imposter)),
            other => panic!("Expected reveal, got {:?}", other),
        }
        match recv(stream).await {
            ServerMessage::GameEnded { players } => {
                assert_eq!(players.len(), 2);
                let innocent = players.iter().find(|p| p.id != imposter).unwrap();
                assert_eq!(innocent.score, 20);
            }
            other => panic!("Expected game end, got {:?}", other),
        }
    }

    // Session is gone once the game ends
    send(
        &mut alice,
        &ClientMessage::FetchGameData {
            session_id: "A1".to_string(),
        },
    )
    .await;
    assert!(matches!(recv(&mut alice).await, ServerMessage::Error { .. }));

    drop(alice);
    drop(bob);
    shutdown(shutdown_tx, handle).await;
}

#[tokio::test]
async fn test_disconnect_updates_remaining_players() {
    let (addr, shutdown_tx, handle) = start_server(GameConfig::default()).await;
    let (mut alice, _) = connect(addr).await;
    let (mut bob, _) = connect(addr).await;

    send(
        &mut alice,
        &ClientMessage::CreateGame {
            session_id: "room".to_string(),
            player_name: "alice".to_string(),
        },
    )
    .await;
    recv(&mut alice).await;
    send(
        &mut bob,
        &ClientMessage::JoinGame {
            session_id: "room".to_string(),
            player_name: "bob".to_string(),
        },
    )
    .await;
    recv(&mut alice).await;
    recv(&mut bob).await;

    drop(alice);

    match recv(&mut bob).await {
        ServerMessage::GameStateUpdate(snapshot) => {
            assert_eq!(snapshot.players.len(), 1);
            assert_eq!(snapshot.players[0].name, "bob");
        }
        other => panic!("Expected state update, got {:?}", other),
    }

    drop(bob);
    shutdown(shutdown_tx, handle).await;
}
