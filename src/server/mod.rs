//! Server module - TCP listener, client connections and broadcast groups

mod connection;
mod hub;
mod listener;

pub use connection::{read_message, write_message, ClientConnection};
pub use hub::Hub;
pub use listener::ServerListener;
