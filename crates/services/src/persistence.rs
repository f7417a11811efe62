//! Background writer for the persisted slice.
//!
//! Commits hand the writer the newest course slice and return immediately.
//! The writer task waits out the debounce, then saves whatever is latest, so
//! a burst of commits becomes a single write of the final state.

use std::sync::Arc;
use std::time::Duration;

use learn_core::state::CourseState;
use storage::repository::KeyValueStore;
use storage::snapshot;
use tokio::sync::watch;
use tokio::task::JoinHandle;

type Pending = Option<Arc<CourseState>>;

/// Owns the writer task. Dropping it without [`SnapshotWriter::shutdown`]
/// abandons any write still waiting on the debounce.
pub struct SnapshotWriter {
    pending: watch::Sender<Pending>,
    task: JoinHandle<()>,
}

impl SnapshotWriter {
    /// Spawn the writer on the current tokio runtime.
    #[must_use]
    pub fn spawn(kv: Arc<dyn KeyValueStore>, key: String, debounce: Duration) -> Self {
        let (pending, rx) = watch::channel(None);
        let task = tokio::spawn(run(rx, kv, key, debounce));
        Self { pending, task }
    }

    /// Queue `courses` for writing, replacing anything not yet written.
    pub fn schedule(&self, courses: &Arc<CourseState>) {
        self.pending.send_replace(Some(Arc::clone(courses)));
    }

    /// Write the last scheduled snapshot, if any, and stop the task.
    pub async fn shutdown(self) {
        let Self { pending, task } = self;
        drop(pending);
        if let Err(err) = task.await {
            tracing::warn!(error = %err, "snapshot writer ended abnormally");
        }
    }
}

async fn run(
    mut rx: watch::Receiver<Pending>,
    kv: Arc<dyn KeyValueStore>,
    key: String,
    debounce: Duration,
) {
    // `changed` still reports a value sent just before the sender dropped.
    while rx.changed().await.is_ok() {
        if !debounce.is_zero() {
            tokio::time::sleep(debounce).await;
        }
        let latest = rx.borrow_and_update().clone();
        let Some(courses) = latest else {
            continue;
        };
        match snapshot::save(kv.as_ref(), &key, &courses).await {
            Ok(()) => tracing::debug!(key = %key, "snapshot written"),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "snapshot write failed; retrying on next commit");
            }
        }
    }
    tracing::debug!(key = %key, "snapshot writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryStore;

    #[tokio::test]
    async fn shutdown_flushes_latest_schedule() {
        let kv = InMemoryStore::new();
        let writer = SnapshotWriter::spawn(
            Arc::new(kv.clone()),
            "k".into(),
            Duration::from_millis(20),
        );

        let mut courses = CourseState::seeded();
        writer.schedule(&Arc::new(courses.clone()));
        courses.enrolled.clear();
        writer.schedule(&Arc::new(courses.clone()));
        writer.shutdown().await;

        let stored = snapshot::load(&kv, "k").await.unwrap();
        assert_eq!(stored, courses);
    }

    #[tokio::test]
    async fn shutdown_without_schedule_writes_nothing() {
        let kv = InMemoryStore::new();
        let writer = SnapshotWriter::spawn(Arc::new(kv.clone()), "k".into(), Duration::ZERO);
        writer.shutdown().await;
        assert_eq!(kv.len().unwrap(), 0);
    }
}
