//! Serialized request queue for outbound scoring calls
//!
//! The upstream scoring API tolerates exactly one in-flight request at a
//! time, with a pause between requests. This queue owns that discipline:
//! submitted jobs run strictly one at a time in submission order, with a
//! fixed interval after each job before the next starts.
//!
//! The queue owns all of its state. Independent instances do not interact,
//! so tests (and multiple classrooms worth of checkers) can each run their
//! own. Cloning a [`RequestQueue`] yields another handle to the same worker.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

type QueuedJob = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Errors surfaced to a submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue worker is gone; the job was never accepted.
    Closed,
    /// The job was accepted but produced no result (it panicked).
    Canceled,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Closed => write!(f, "request queue is closed"),
            QueueError::Canceled => write!(f, "queued job was canceled before producing a result"),
        }
    }
}

impl std::error::Error for QueueError {}

/// A FIFO queue that runs async jobs one at a time with a fixed pause
/// between them.
#[derive(Clone)]
pub struct RequestQueue {
    sender: mpsc::UnboundedSender<QueuedJob>,
}

impl RequestQueue {
    /// Spawn the worker task. Requires a running tokio runtime.
    ///
    /// `interval` is the pause between the end of one job and the start of
    /// the next. Dropping every handle closes intake; jobs already queued
    /// still run to completion.
    pub fn new(interval: Duration) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<QueuedJob>();

        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                // Run each job in its own task so a panic rejects only its
                // submitter and the worker keeps draining.
                let _ = tokio::spawn(job).await;
                tokio::time::sleep(interval).await;
            }
        });

        Self { sender }
    }

    /// Queue a job and wait for its result.
    ///
    /// Jobs run in submission order. The job's own failures travel through
    /// its output type; [`QueueError`] covers only queue-level conditions.
    pub async fn submit<F, T>(&self, job: F) -> Result<T, QueueError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();
        let wrapped: QueuedJob = Box::pin(async move {
            // The submitter may have given up; delivery failure is fine.
            let _ = result_tx.send(job.await);
        });

        self.sender
            .send(wrapped)
            .map_err(|_| QueueError::Closed)?;
        result_rx.await.map_err(|_| QueueError::Canceled)
    }
}
