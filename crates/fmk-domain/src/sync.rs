//! Write-through of column assignments to the attribute store.
//!
//! The drag machine never awaits a write. It pushes a [`SyncRequest`] onto a
//! [`SyncQueue`] and carries on; a [`SyncWorker`] drains the queue in
//! dispatch order on its own task. Failed writes are logged and dropped, the
//! in-memory board is not rolled back.

use std::sync::Arc;

use fmk_core::{AttributeStore, RecordHandle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One "set attribute `key` of `record` to `value`" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub record: RecordHandle,
    pub key: String,
    pub value: String,
}

impl SyncRequest {
    pub fn new(record: RecordHandle, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            record,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Sending half of the sync channel.
#[derive(Debug, Clone, Default)]
pub struct SyncQueue {
    tx: Option<mpsc::UnboundedSender<SyncRequest>>,
}

impl SyncQueue {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SyncRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A queue that drops every request. Used for read-only sessions.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Queue a write without waiting for it. Returns false if nothing will deliver it.
    pub fn dispatch(&self, request: SyncRequest) -> bool {
        let Some(ref tx) = self.tx else {
            tracing::debug!("No sync channel available - skipping write");
            return false;
        };

        tracing::debug!(
            "Queueing write of {}={} to {}",
            request.key,
            request.value,
            request.record.path
        );
        match tx.send(request) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to queue write: channel closed: {:?}", e.0.record.path);
                false
            }
        }
    }

    /// Stop accepting requests. The worker finishes what is already queued.
    pub fn close(&mut self) {
        self.tx = None;
    }

    pub fn is_open(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }
}

/// Counts of what a worker did before its queue closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Receiving half of the sync channel.
pub struct SyncWorker {
    store: Arc<dyn AttributeStore>,
    rx: mpsc::UnboundedReceiver<SyncRequest>,
}

impl SyncWorker {
    pub fn new(store: Arc<dyn AttributeStore>, rx: mpsc::UnboundedReceiver<SyncRequest>) -> Self {
        Self { store, rx }
    }

    /// Deliver requests one at a time until every sender is gone.
    pub async fn run(mut self) -> SyncReport {
        let mut report = SyncReport::default();
        while let Some(request) = self.rx.recv().await {
            match self
                .store
                .write(&request.record, &request.key, &request.value)
                .await
            {
                Ok(()) => {
                    tracing::debug!("Wrote {}={} to {}", request.key, request.value, request.record.path);
                    report.delivered += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to write {}={} to {}: {}",
                        request.key,
                        request.value,
                        request.record.path,
                        e
                    );
                    report.failed += 1;
                }
            }
        }
        tracing::debug!(
            "Sync queue closed: {} delivered, {} failed",
            report.delivered,
            report.failed
        );
        report
    }

    pub fn spawn(self) -> JoinHandle<SyncReport> {
        tokio::spawn(self.run())
    }
}
