use crate::client::ClientId;
use crate::messages::ServerToClient;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outbound channels of every connected client. Delivery is best-effort:
/// a client whose writer has gone away is skipped without affecting the rest.
pub struct ClientBroadcaster {
    client_senders: HashMap<ClientId, mpsc::UnboundedSender<Arc<ServerToClient>>>,
}

impl ClientBroadcaster {
    pub fn new() -> Self {
        Self {
            client_senders: HashMap::new(),
        }
    }

    pub fn add_client(
        &mut self,
        client_id: ClientId,
        sender: mpsc::UnboundedSender<Arc<ServerToClient>>,
    ) {
        self.client_senders.insert(client_id, sender);
    }

    pub fn remove_client(&mut self, client_id: ClientId) {
        self.client_senders.remove(&client_id);
    }

    pub fn is_connected(&self, client_id: ClientId) -> bool {
        self.client_senders.contains_key(&client_id)
    }

    // Single fan-out implementation; the message is serialised once per recipient by its writer
    fn broadcast_to_filtered<'a, I, F>(&self, targets: I, response: ServerToClient, filter: F)
    where
        I: IntoIterator<Item = &'a ClientId>,
        F: Fn(ClientId) -> bool,
    {
        let message = Arc::new(response);
        for &client_id in targets {
            if !filter(client_id) {
                continue;
            }
            if let Some(sender) = self.client_senders.get(&client_id) {
                let _ = sender.send(message.clone());
            }
        }
    }

    pub fn broadcast<'a, I>(&self, targets: I, response: ServerToClient)
    where
        I: IntoIterator<Item = &'a ClientId>,
    {
        self.broadcast_to_filtered(targets, response, |_| true);
    }

    pub fn broadcast_except<'a, I>(&self, targets: I, except: ClientId, response: ServerToClient)
    where
        I: IntoIterator<Item = &'a ClientId>,
    {
        self.broadcast_to_filtered(targets, response, |id| id != except);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::drain;
    use uuid::Uuid;

    #[test]
    fn test_broadcast_except_skips_sender() {
        let mut broadcaster = ClientBroadcaster::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let (a_tx, mut a_rx) = mpsc::unbounded_channel();
        let (b_tx, mut b_rx) = mpsc::unbounded_channel();
        broadcaster.add_client(a, a_tx);
        broadcaster.add_client(b, b_tx);

        broadcaster.broadcast_except(&[a, b], a, ServerToClient::GameLost {});

        assert!(drain(&mut a_rx).is_empty());
        assert_eq!(drain(&mut b_rx), vec![ServerToClient::GameLost {}]);
    }

    #[test]
    fn test_closed_receiver_does_not_stop_fan_out() {
        let mut broadcaster = ClientBroadcaster::new();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, mut b_rx) = mpsc::unbounded_channel();
        broadcaster.add_client(a, a_tx);
        broadcaster.add_client(b, b_tx);
        drop(a_rx);

        // c was never registered, a's writer is gone
        broadcaster.broadcast(&[a, c, b], ServerToClient::update_users(3));

        assert_eq!(drain(&mut b_rx), vec![ServerToClient::update_users(3)]);
    }
}
