//! Fire-and-forget narrative tasks bound to a session's lifetime.

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::{NarrativeKind, Narrator};
use crate::domain::Transaction;

/// Result of a finished background task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeUpdate {
    /// Session epoch the task was started in.
    pub epoch: u64,
    pub kind: NarrativeKind,
    /// Transaction the text describes, for impact updates.
    pub transaction_id: Option<String>,
    /// Position of the request among forest summaries; zero for impact.
    pub generation: u64,
    pub text: String,
}

/// Owns the background tasks started for one session.
///
/// Tasks race their narrator call against the scope's cancellation token.
/// [`reset`](Self::reset) cancels everything in flight and moves to a new
/// epoch, so late results from a previous session are dropped by
/// [`drain`](Self::drain).
pub struct EnrichmentScope {
    handle: Handle,
    token: CancellationToken,
    epoch: u64,
    forest_generation: u64,
    sender: UnboundedSender<NarrativeUpdate>,
    receiver: UnboundedReceiver<NarrativeUpdate>,
}

impl EnrichmentScope {
    pub fn new(handle: Handle) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            handle,
            token: CancellationToken::new(),
            epoch: 0,
            forest_generation: 0,
            sender,
            receiver,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Supersedes any forest summary still in flight.
    pub fn spawn_forest_summary(&mut self, narrator: &Narrator, transactions: Vec<Transaction>) {
        self.forest_generation += 1;
        let narrator = narrator.clone();
        let generation = self.forest_generation;
        self.spawn(NarrativeKind::ForestSummary, None, generation, async move {
            narrator.summarize_forest(&transactions).await
        });
    }

    pub fn spawn_impact(&self, narrator: &Narrator, transaction: Transaction) {
        let narrator = narrator.clone();
        let id = transaction.id.clone();
        self.spawn(NarrativeKind::Impact, Some(id), 0, async move {
            narrator.describe_impact(&transaction).await
        });
    }

    fn spawn<F>(
        &self,
        kind: NarrativeKind,
        transaction_id: Option<String>,
        generation: u64,
        work: F,
    ) where
        F: std::future::Future<Output = String> + Send + 'static,
    {
        let token = self.token.clone();
        let sender = self.sender.clone();
        let epoch = self.epoch;
        debug!(?kind, epoch, "spawning narrative task");
        self.handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    trace!(?kind, epoch, "narrative task cancelled");
                }
                text = work => {
                    // The receiver lives as long as the scope; a closed
                    // channel only means the session is gone.
                    let _ = sender.send(NarrativeUpdate {
                        epoch,
                        kind,
                        transaction_id,
                        generation,
                        text,
                    });
                }
            }
        });
    }

    /// Finished results from the current epoch, oldest first.
    pub fn drain(&mut self) -> Vec<NarrativeUpdate> {
        let mut updates = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(update) if self.is_current(&update) => updates.push(update),
                Ok(stale) => {
                    trace!(epoch = stale.epoch, "discarding stale narrative update");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        updates
    }

    fn is_current(&self, update: &NarrativeUpdate) -> bool {
        update.epoch == self.epoch
            && (update.kind != NarrativeKind::ForestSummary
                || update.generation == self.forest_generation)
    }

    /// Cancels outstanding tasks and starts a new epoch.
    pub fn reset(&mut self) {
        self.token.cancel();
        self.token = CancellationToken::new();
        self.epoch += 1;
        debug!(epoch = self.epoch, "enrichment scope reset");
    }
}

impl Drop for EnrichmentScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
