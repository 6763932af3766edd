//! Ordered, best-effort persistence of session snapshots.
//!
//! The controller enqueues commands while it still holds its state lock, so
//! the queue order is the edit order. A single background task applies them
//! one at a time; a failed write is logged and remembered but never stops
//! the in-memory workflow.
//!
//! Failures are tracked per target. A snapshot failure is cleared only by a
//! later successful save or removal of the same research id; writing the
//! active-session pointer never hides it.

use inquiry_core::error::InquiryError;
use inquiry_core::session::{ResearchId, ResearchSession, SessionStore};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

enum PersistenceCommand {
    Save(Box<ResearchSession>),
    Remove(ResearchId),
    SetActive(ResearchId),
    ClearActive,
    Flush(oneshot::Sender<()>),
}

/// Outstanding write failures.
#[derive(Default)]
struct FailureLedger {
    /// Snapshot failures, oldest first.
    snapshots: Vec<(ResearchId, InquiryError)>,
    pointer: Option<InquiryError>,
    stopped: Option<InquiryError>,
}

impl FailureLedger {
    fn snapshot_written(&mut self, id: &ResearchId) {
        self.snapshots.retain(|(failed, _)| failed != id);
    }

    fn snapshot_failed(&mut self, id: ResearchId, error: InquiryError) {
        self.snapshot_written(&id);
        self.snapshots.push((id, error));
    }

    /// Snapshot failures take precedence over pointer failures.
    fn current(&self) -> Option<InquiryError> {
        self.stopped
            .clone()
            .or_else(|| self.snapshots.last().map(|(_, e)| e.clone()))
            .or_else(|| self.pointer.clone())
    }
}

type SharedLedger = Arc<Mutex<FailureLedger>>;

fn with_ledger<R>(ledger: &Mutex<FailureLedger>, f: impl FnOnce(&mut FailureLedger) -> R) -> R {
    f(&mut ledger.lock().unwrap_or_else(|e| e.into_inner()))
}

/// Handle to the background persistence task.
#[derive(Clone)]
pub struct PersistenceQueue {
    sender: mpsc::UnboundedSender<PersistenceCommand>,
    failures: SharedLedger,
}

impl PersistenceQueue {
    /// Spawns the writer task on the current tokio runtime.
    pub fn spawn(store: Arc<dyn SessionStore>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let failures = SharedLedger::default();
        tokio::spawn(run(store, receiver, failures.clone()));
        Self { sender, failures }
    }

    pub fn save(&self, session: &ResearchSession) {
        self.enqueue(PersistenceCommand::Save(Box::new(session.clone())));
    }

    pub fn remove(&self, id: &ResearchId) {
        self.enqueue(PersistenceCommand::Remove(id.clone()));
    }

    pub fn set_active(&self, id: &ResearchId) {
        self.enqueue(PersistenceCommand::SetActive(id.clone()));
    }

    pub fn clear_active(&self) {
        self.enqueue(PersistenceCommand::ClearActive);
    }

    /// Waits until every command enqueued before this call has been applied.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        self.enqueue(PersistenceCommand::Flush(tx));
        let _ = rx.await;
    }

    /// An outstanding write failure, as `InquiryError::Persistence`.
    pub fn last_error(&self) -> Option<InquiryError> {
        with_ledger(&self.failures, |ledger| ledger.current())
    }

    fn enqueue(&self, command: PersistenceCommand) {
        if self.sender.send(command).is_err() {
            tracing::warn!("Persistence task has stopped; change kept in memory only");
            with_ledger(&self.failures, |ledger| {
                ledger.stopped = Some(InquiryError::persistence("persistence task has stopped"));
            });
        }
    }
}

async fn run(
    store: Arc<dyn SessionStore>,
    mut receiver: mpsc::UnboundedReceiver<PersistenceCommand>,
    failures: SharedLedger,
) {
    let mut backlog: Option<PersistenceCommand> = None;
    loop {
        let command = match backlog.take() {
            Some(command) => command,
            None => match receiver.recv().await {
                Some(command) => command,
                None => break,
            },
        };

        // Consecutive saves of the same session collapse to the newest one.
        let command = match command {
            PersistenceCommand::Save(mut session) => {
                while let Ok(next) = receiver.try_recv() {
                    match next {
                        PersistenceCommand::Save(newer) if newer.id == session.id => session = newer,
                        other => {
                            backlog = Some(other);
                            break;
                        }
                    }
                }
                PersistenceCommand::Save(session)
            }
            other => other,
        };

        apply(store.as_ref(), command, &failures).await;
    }
    tracing::debug!("Persistence task finished");
}

async fn apply(store: &dyn SessionStore, command: PersistenceCommand, failures: &Mutex<FailureLedger>) {
    match command {
        PersistenceCommand::Save(session) => {
            let result = store.save(&session).await;
            settle_snapshot(failures, &session.id, "save", result);
        }
        PersistenceCommand::Remove(id) => {
            let result = store.remove(&id).await;
            settle_snapshot(failures, &id, "remove", result);
        }
        PersistenceCommand::SetActive(id) => {
            let result = store.set_active_session_id(&id).await;
            settle_pointer(failures, Some(&id), "set-active", result);
        }
        PersistenceCommand::ClearActive => {
            let result = store.clear_active_session_id().await;
            settle_pointer(failures, None, "clear-active", result);
        }
        PersistenceCommand::Flush(done) => {
            let _ = done.send(());
        }
    }
}

fn settle_snapshot(
    failures: &Mutex<FailureLedger>,
    id: &ResearchId,
    action: &'static str,
    result: inquiry_core::error::Result<()>,
) {
    match result {
        Ok(()) => with_ledger(failures, |ledger| ledger.snapshot_written(id)),
        Err(e) => {
            warn_failed(Some(id), action, &e);
            let error = InquiryError::persistence(format!("{action} of {id} failed: {e}"));
            with_ledger(failures, |ledger| ledger.snapshot_failed(id.clone(), error));
        }
    }
}

fn settle_pointer(
    failures: &Mutex<FailureLedger>,
    id: Option<&ResearchId>,
    action: &'static str,
    result: inquiry_core::error::Result<()>,
) {
    match result {
        Ok(()) => with_ledger(failures, |ledger| ledger.pointer = None),
        Err(e) => {
            warn_failed(id, action, &e);
            let error = InquiryError::persistence(format!("{action} failed: {e}"));
            with_ledger(failures, |ledger| ledger.pointer = Some(error));
        }
    }
}

fn warn_failed(id: Option<&ResearchId>, action: &'static str, error: &InquiryError) {
    tracing::warn!(
        research_id = id.map(|id| id.as_str()).unwrap_or("-"),
        action,
        error = %error,
        "Persistence failed; session remains usable in memory"
    );
}
