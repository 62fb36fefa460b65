use crate::config::MatchmakingSettings;
use crate::messages::CoordinatorMessage;
use tokio::sync::mpsc;
use tracing::debug;

/// Timed countdown before a match starts. Runs as its own task and only reports
/// ticks back to the coordinator, which owns the waiting pool and does the broadcasting.
pub async fn countdown_task(
    coordinator_tx: mpsc::UnboundedSender<CoordinatorMessage>,
    settings: MatchmakingSettings,
) {
    debug!("Countdown started ({}s)", settings.countdown_seconds);

    for seconds in (1..=settings.countdown_seconds).rev() {
        if coordinator_tx
            .send(CoordinatorMessage::CountdownTick { seconds })
            .is_err()
        {
            debug!("Coordinator gone, countdown stopped");
            return;
        }
        tokio::time::sleep(settings.tick).await;
    }

    let _ = coordinator_tx.send(CoordinatorMessage::CountdownFinished);
}
