//! Progress reporting - a bounded, drop-on-slow event stream.
//!
//! One channel per run. Emission never blocks the pipeline beyond a
//! short send timeout; an event that cannot be delivered in time is
//! dropped, never duplicated. Ordering follows pipeline execution
//! order.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::types::progress::{ProgressEvent, Stage, StageStatus};

/// Create a per-run progress channel.
///
/// The sender goes into the run; the receiver goes to the consumer.
pub fn channel(capacity: usize) -> (ProgressSender, mpsc::Receiver<ProgressEvent>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        ProgressSender {
            tx: Some(tx),
            emit_timeout: Duration::from_millis(100),
        },
        rx,
    )
}

/// The pipeline's end of a progress channel.
///
/// A disabled sender silently discards events, for callers that do not
/// consume progress.
pub struct ProgressSender {
    tx: Option<mpsc::Sender<ProgressEvent>>,
    emit_timeout: Duration,
}

impl ProgressSender {
    /// A sender that discards every event.
    pub fn disabled() -> Self {
        Self {
            tx: None,
            emit_timeout: Duration::ZERO,
        }
    }

    /// Set the per-event send timeout.
    pub fn with_emit_timeout(mut self, timeout: Duration) -> Self {
        self.emit_timeout = timeout;
        self
    }

    /// Emit one stage transition.
    ///
    /// Waits at most the emit timeout on a slow consumer, then drops
    /// the event.
    pub(crate) async fn emit(
        &self,
        run_id: Uuid,
        stage: Stage,
        status: StageStatus,
        message: impl Into<String>,
    ) {
        let Some(tx) = &self.tx else {
            return;
        };

        let event = ProgressEvent::new(run_id, stage, status, message);
        if let Err(e) = tx.send_timeout(event, self.emit_timeout).await {
            debug!(stage = %stage, error = %e, "Progress event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_arrive_in_emission_order() {
        let (sender, mut rx) = channel(8);
        let run_id = Uuid::new_v4();

        sender
            .emit(run_id, Stage::Normalizing, StageStatus::Active, "a")
            .await;
        sender
            .emit(run_id, Stage::Normalizing, StageStatus::Completed, "b")
            .await;
        drop(sender);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.status, StageStatus::Active);
        assert_eq!(second.status, StageStatus::Completed);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_slow_consumer_drops_events_without_blocking() {
        let (sender, _rx) = channel(1);
        let sender = sender.with_emit_timeout(Duration::from_millis(10));
        let run_id = Uuid::new_v4();

        // Fills the buffer; nobody is reading
        sender
            .emit(run_id, Stage::Planning, StageStatus::Active, "first")
            .await;

        let start = std::time::Instant::now();
        sender
            .emit(run_id, Stage::Planning, StageStatus::Completed, "second")
            .await;

        // Returned promptly instead of waiting on the consumer
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_disabled_sender_discards_silently() {
        let sender = ProgressSender::disabled();
        sender
            .emit(Uuid::new_v4(), Stage::Scoring, StageStatus::Active, "noop")
            .await;
    }
}
