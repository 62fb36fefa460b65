use std::sync::Arc;
use tokio::sync::mpsc;

use crate::{
    client::ClientId,
    messages::{ClientToServer, ServerToClient},
};

#[derive(Debug)]
pub enum CoordinatorMessage {
    /// A client finished the handshake and can receive messages
    ClientConnected {
        client_id: ClientId,
        client_response_tx: mpsc::UnboundedSender<Arc<ServerToClient>>,
    },
    /// A decoded action from a connected client
    ClientAction {
        client_id: ClientId,
        action: ClientToServer,
    },
    /// Client disconnected, clean up from the waiting pool and any lobby
    ClientDisconnected { client_id: ClientId },

    /// Sent by the countdown task once per tick
    CountdownTick { seconds: u32 },
    /// Sent by the countdown task after the last tick has elapsed
    CountdownFinished,
}

impl CoordinatorMessage {
    pub fn client_action(client_id: ClientId, action: ClientToServer) -> Self {
        Self::ClientAction { client_id, action }
    }
}
