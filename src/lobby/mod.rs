pub mod broadcaster;
pub mod handlers;
pub mod lobby;
pub mod store;

// Re-export the main types for easy access
pub use broadcaster::ClientBroadcaster;
pub use handlers::{LobbyHandlers, RoundOutcome};
pub use store::LobbyStores;
