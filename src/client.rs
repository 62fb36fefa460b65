use crate::messages::{ClientToServer, CoordinatorMessage, ServerToClient};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use socket2::{SockRef, TcpKeepalive};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{WebSocketStream, accept_async};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Identity of one connection; the coordinator never looks past it.
pub type ClientId = Uuid;

/// Pause after a failed accept so a persistent error (e.g. fd exhaustion) cannot spin the loop
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// What the receive loop should do with one inbound frame
enum Inbound {
    Action(ClientToServer),
    Ignored,
    Closed,
}

/// Accept loop: one session task per connection, forever
pub async fn accept_clients(
    listener: TcpListener,
    coordinator_tx: mpsc::UnboundedSender<CoordinatorMessage>,
) {
    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };

        // Configure TCP keep-alive
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(10))
            .with_interval(Duration::from_secs(1));
        let sf = SockRef::from(&socket);
        let _ = sf.set_tcp_keepalive(&keepalive);

        tokio::spawn(handle_client(socket, addr, coordinator_tx.clone()));
    }
}

/// Session handler: performs the WebSocket handshake, forwards decoded actions to the
/// coordinator and reports the disconnect however the connection ends.
pub async fn handle_client(
    stream: TcpStream,
    addr: SocketAddr,
    coordinator_tx: mpsc::UnboundedSender<CoordinatorMessage>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake with {} failed: {}", addr, e);
            return;
        }
    };

    let client_id: ClientId = Uuid::new_v4();
    info!("Client {} connected from {}", client_id, addr);

    let (ws_sender, mut ws_receiver) = ws_stream.split();
    let (writer_tx, writer_rx) = mpsc::unbounded_channel::<Arc<ServerToClient>>();

    if coordinator_tx
        .send(CoordinatorMessage::ClientConnected {
            client_id,
            client_response_tx: writer_tx,
        })
        .is_err()
    {
        error!("Coordinator unavailable, dropping client {}", client_id);
        return;
    }

    // Spawn task to handle writing to the client socket
    let write_task = tokio::spawn(handle_client_writer(ws_sender, writer_rx, client_id));

    while let Some(frame) = ws_receiver.next().await {
        match read_frame(frame) {
            Inbound::Action(action) => {
                debug!("Client {} sent {:?}", client_id, action);
                if coordinator_tx
                    .send(CoordinatorMessage::client_action(client_id, action))
                    .is_err()
                {
                    error!("Coordinator unavailable, closing client {}", client_id);
                    break;
                }
            }
            Inbound::Ignored => {}
            Inbound::Closed => break,
        }
    }

    info!("Client {} disconnected", client_id);
    let _ = coordinator_tx.send(CoordinatorMessage::ClientDisconnected { client_id });

    write_task.abort();
}

fn read_frame(frame: Result<Message, tungstenite::Error>) -> Inbound {
    match frame {
        Ok(Message::Text(text)) => match ClientToServer::from_json(text.as_str()) {
            Ok(action) => Inbound::Action(action),
            Err(e) => {
                debug!("Ignoring unrecognised message {:?}: {}", text.as_str(), e);
                Inbound::Ignored
            }
        },
        Ok(Message::Close(_)) => Inbound::Closed,
        Ok(_) => Inbound::Ignored,
        Err(e) => {
            debug!("Client read error: {}", e);
            Inbound::Closed
        }
    }
}

/// Handle writing messages to the client socket
async fn handle_client_writer(
    mut writer: SplitSink<WebSocketStream<TcpStream>, Message>,
    mut rx: mpsc::UnboundedReceiver<Arc<ServerToClient>>,
    client_id: ClientId,
) {
    while let Some(message) = rx.recv().await {
        let text = match message.to_json() {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to encode {:?} for client {}: {}", message, client_id, e);
                continue;
            }
        };
        if let Err(e) = writer.send(Message::Text(text.into())).await {
            debug!("Failed to write to client {}: {}", client_id, e);
            break;
        }
    }
    let _ = writer.close().await;
}
