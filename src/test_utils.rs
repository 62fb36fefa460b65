use crate::messages::ServerToClient;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

pub fn contains_response_of_type<T>(responses: &[T], variant: &T) -> bool {
    responses
        .iter()
        .any(|msg| std::mem::discriminant(msg) == std::mem::discriminant(variant))
}

/// Everything queued for a client so far, without waiting.
pub fn drain(rx: &mut UnboundedReceiver<Arc<ServerToClient>>) -> Vec<ServerToClient> {
    let mut responses = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        responses.push((*msg).clone());
    }
    responses
}
