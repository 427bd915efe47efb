//! Broadcast hub - connected clients and per-session groups

use super::connection::ClientConnection;
use crate::game::PlayerId;
use crate::protocol::ServerMessage;
use std::collections::HashMap;

/// Tracks connected clients and the session groups they belong to
#[derive(Default)]
pub struct Hub {
    clients: HashMap<PlayerId, ClientConnection>,

    /// Session id -> member connections, in join order
    groups: HashMap<String, Vec<PlayerId>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, client: ClientConnection) {
        self.clients.insert(client.id(), client);
    }

    /// Forget a client and drop it from every group
    pub fn unregister(&mut self, id: PlayerId) {
        self.clients.remove(&id);
        self.groups.retain(|_, members| {
            members.retain(|m| *m != id);
            !members.is_empty()
        });
    }

    pub fn join_group(&mut self, session_id: &str, id: PlayerId) {
        let members = self.groups.entry(session_id.to_string()).or_default();
        if !members.contains(&id) {
            members.push(id);
        }
    }

    /// Dissolve a session's group; members stay connected
    pub fn drop_group(&mut self, session_id: &str) {
        if self.groups.remove(session_id).is_some() {
            tracing::debug!("Dropped broadcast group '{}'", session_id);
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn group_members(&self, session_id: &str) -> &[PlayerId] {
        self.groups.get(session_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Send to a single client
    pub fn send_to(&self, id: PlayerId, msg: ServerMessage) {
        match self.clients.get(&id) {
            Some(client) => {
                if let Err(e) = client.send(msg) {
                    tracing::warn!("{}", e);
                }
            }
            None => tracing::debug!("Dropping message for unknown client {}", id),
        }
    }

    /// Send to every client in a session's group
    pub fn broadcast(&self, session_id: &str, msg: ServerMessage) {
        for id in self.group_members(session_id) {
            if let Some(client) = self.clients.get(id) {
                if let Err(e) = client.send(msg.clone()) {
                    tracing::warn!("Failed to broadcast to '{}': {}", session_id, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn client() -> (ClientConnection, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(8);
        (ClientConnection::new(tx), rx)
    }

    fn ack() -> ServerMessage {
        ServerMessage::Ack {
            for_command: "test".to_string(),
        }
    }

    #[test]
    fn test_broadcast_reaches_group_only() {
        let mut hub = Hub::new();
        let (a, mut a_rx) = client();
        let (b, mut b_rx) = client();
        let a_id = a.id();
        hub.register(a);
        hub.register(b);
        hub.join_group("room", a_id);

        hub.broadcast("room", ack());

        assert_eq!(a_rx.try_recv().unwrap(), ack());
        assert!(b_rx.try_recv().is_err());
        assert_eq!(hub.group_members("room"), &[a_id]);
        assert!(hub.group_members("other").is_empty());
    }

    #[test]
    fn test_unregister_leaves_groups() {
        let mut hub = Hub::new();
        let (a, _a_rx) = client();
        let a_id = a.id();
        hub.register(a);
        hub.join_group("room", a_id);
        hub.join_group("room", a_id);
        assert_eq!(hub.group_members("room").len(), 1);

        hub.unregister(a_id);

        assert_eq!(hub.client_count(), 0);
        assert!(hub.group_members("room").is_empty());
    }

    #[test]
    fn test_dropped_group_gets_no_broadcasts() {
        let mut hub = Hub::new();
        let (a, mut a_rx) = client();
        let (c, mut c_rx) = client();
        let (a_id, c_id) = (a.id(), c.id());
        hub.register(a);
        hub.register(c);
        hub.join_group("A1", a_id);

        hub.drop_group("A1");
        hub.join_group("A1", c_id);
        hub.broadcast("A1", ack());

        assert!(a_rx.try_recv().is_err());
        assert_eq!(c_rx.try_recv().unwrap(), ack());
        assert_eq!(hub.group_members("A1"), &[c_id]);
        assert_eq!(hub.client_count(), 2);
    }

    #[test]
    fn test_send_to_single_client() {
        let mut hub = Hub::new();
        let (a, mut a_rx) = client();
        let a_id = a.id();
        hub.register(a);

        hub.send_to(a_id, ack());
        hub.send_to(PlayerId::new(), ack());

        assert_eq!(a_rx.try_recv().unwrap(), ack());
        assert!(a_rx.try_recv().is_err());
    }
}
