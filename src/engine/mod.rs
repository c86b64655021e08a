//! Background order processing.
//!
//! The store pushes the id of every newly placed order onto a bounded queue;
//! [`OrderWorker`] is its only consumer. Processing is best effort: ids dropped
//! because the queue was full, or still queued when the process exits, are
//! never processed. The worker never writes back to the store.

use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::WorkerConfig;
use crate::store::Id;

pub struct OrderWorker {
    rx: mpsc::Receiver<Id>,
    processing_delay: Duration,
}

impl OrderWorker {
    pub fn new(rx: mpsc::Receiver<Id>, processing_delay: Duration) -> Self {
        Self { rx, processing_delay }
    }

    pub fn from_config(rx: mpsc::Receiver<Id>, config: &WorkerConfig) -> Self {
        Self::new(rx, Duration::from_millis(config.processing_delay_ms))
    }

    /// Drain the queue until every sender is dropped.
    ///
    /// Returns the number of orders processed.
    pub async fn run(mut self) -> u64 {
        tracing::info!(
            delay_ms = self.processing_delay.as_millis() as u64,
            "Order worker started"
        );

        let mut processed = 0;
        while let Some(order_id) = self.rx.recv().await {
            self.process(order_id).await;
            processed += 1;
        }

        tracing::info!(processed, "Order worker stopped");
        processed
    }

    /// Post-processing for one order (notification, audit trail).
    async fn process(&self, order_id: Id) {
        tokio::time::sleep(self.processing_delay).await;
        tracing::info!(order_id, "Order {} processed in background", order_id);
    }
}
