//! The single source of truth: holds the current [`AppState`], applies
//! intents through the reducers, and tells subscribers what changed.

use std::fmt;
use std::sync::Arc;

use learn_core::state::{AppState, CourseIntent, Intent, Slice, SliceSet};
use storage::repository::Storage;
use storage::snapshot;

use crate::config::StoreConfig;
use crate::error::StoreInitError;
use crate::persistence::SnapshotWriter;

/// Callback invoked with the committed state after a relevant change.
pub type Listener = Box<dyn FnMut(&AppState) + Send>;

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    slices: SliceSet,
    listener: Listener,
}

pub struct Store {
    state: AppState,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
    writer: Option<SnapshotWriter>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .field("persistent", &self.writer.is_some())
            .finish()
    }
}

impl Store {
    /// An in-memory store. Nothing is persisted.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
            next_subscription: 0,
            writer: None,
        }
    }

    /// A store whose persisted slice is saved through `writer`.
    #[must_use]
    pub fn with_writer(state: AppState, writer: SnapshotWriter) -> Self {
        Self {
            writer: Some(writer),
            ..Self::new(state)
        }
    }

    /// Hydrate from `storage` and start the snapshot writer.
    ///
    /// A missing or unreadable snapshot falls back to seeded state; this never
    /// fails. Must be called inside a tokio runtime.
    pub async fn open(storage: &Storage, config: &StoreConfig) -> Self {
        let state = match snapshot::load(storage.kv.as_ref(), &config.storage_key).await {
            Some(courses) => {
                tracing::info!(
                    key = %config.storage_key,
                    enrolled = courses.enrolled.len(),
                    "restored persisted progress"
                );
                AppState::restored(courses)
            }
            None => {
                tracing::info!(key = %config.storage_key, "starting from seeded state");
                AppState::seeded()
            }
        };
        let writer = SnapshotWriter::spawn(
            Arc::clone(&storage.kv),
            config.storage_key.clone(),
            config.save_debounce,
        );
        Self::with_writer(state, writer)
    }

    /// Open a store backed by the `SQLite` database at `db_url`.
    ///
    /// # Errors
    ///
    /// Returns `StoreInitError` if the database cannot be opened or migrated.
    pub async fn open_sqlite(db_url: &str, config: &StoreConfig) -> Result<Self, StoreInitError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::open(&storage, config).await)
    }

    /// The current committed state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply one intent. Returns whether any slice changed.
    ///
    /// Intents are processed one at a time and to completion; every listener
    /// for the changed slice has run by the time this returns.
    pub fn dispatch(&mut self, intent: impl Into<Intent>) -> bool {
        let intent = intent.into();
        let forces_write = matches!(intent, Intent::Course(CourseIntent::ResetCourseProgress));
        let (next, changed) = self.state.reduce(&intent);

        let Some(slice) = changed else {
            tracing::trace!(?intent, "intent left state unchanged");
            if forces_write {
                self.persist();
            }
            return false;
        };

        self.state = next;
        tracing::debug!(%slice, "slice updated");
        if slice.is_persisted() {
            self.persist();
        }
        self.notify(slice);
        true
    }

    /// Decode and apply an intent in its JSON wire form.
    ///
    /// Unrecognized or malformed intents are ignored and leave state untouched.
    pub fn dispatch_json(&mut self, raw: &str) -> bool {
        match Intent::from_json(raw) {
            Ok(intent) => self.dispatch(intent),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring undecodable intent");
                false
            }
        }
    }

    /// Register `listener` for changes to any slice in `slices`.
    ///
    /// Listeners run synchronously, in registration order, with the newly
    /// committed state. A listener must not call back into the store.
    pub fn subscribe(
        &mut self,
        slices: impl Into<SliceSet>,
        listener: impl FnMut(&AppState) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            slices: slices.into(),
            listener: Box::new(listener),
        });
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Detach the snapshot writer, leaving the store in-memory only.
    pub fn take_writer(&mut self) -> Option<SnapshotWriter> {
        self.writer.take()
    }

    /// Flush any pending snapshot and stop the writer.
    pub async fn shutdown(mut self) {
        if let Some(writer) = self.take_writer() {
            writer.shutdown().await;
        }
    }

    fn persist(&self) {
        if let Some(writer) = &self.writer {
            writer.schedule(self.state.courses());
        }
    }

    fn notify(&mut self, slice: Slice) {
        for subscriber in &mut self.subscribers {
            if subscriber.slices.contains(slice) {
                (subscriber.listener)(&self.state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::model::EnrolledCourse;
    use learn_core::state::{AuthIntent, UserIntent};
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Listener) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let make = {
            let log = Arc::clone(&log);
            move |name: &'static str| -> Listener {
                let log = Arc::clone(&log);
                Box::new(move |_: &AppState| log.lock().unwrap().push(name))
            }
        };
        (log, make)
    }

    #[test]
    fn listeners_fire_in_registration_order_for_their_slices() {
        let (log, make) = recorder();
        let mut store = Store::new(AppState::seeded());
        store.subscribe(Slice::User, make("user"));
        store.subscribe(SliceSet::ALL, make("all"));
        store.subscribe(Slice::Courses, make("courses"));

        assert!(store.dispatch(UserIntent::AddXp(10)));
        assert_eq!(*log.lock().unwrap(), ["user", "all"]);

        log.lock().unwrap().clear();
        assert!(store.dispatch(CourseIntent::EnrollCourse(EnrolledCourse::titled("A"))));
        assert_eq!(*log.lock().unwrap(), ["all", "courses"]);
    }

    #[test]
    fn no_op_dispatch_notifies_nobody() {
        let (log, make) = recorder();
        let mut store = Store::new(AppState::seeded());
        store.subscribe(SliceSet::ALL, make("all"));

        let before = store.state().clone();
        assert!(!store.dispatch(AuthIntent::SetLoading(false)));
        assert!(log.lock().unwrap().is_empty());
        assert!(Slice::ALL.iter().all(|s| !store.state().differs(&before, *s)));
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let (log, make) = recorder();
        let mut store = Store::new(AppState::seeded());
        let id = store.subscribe(Slice::Auth, make("auth"));

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(AuthIntent::SetAuthenticated(true));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn listener_sees_committed_state() {
        let seen = Arc::new(Mutex::new(None));
        let mut store = Store::new(AppState::seeded());
        {
            let seen = Arc::clone(&seen);
            store.subscribe(Slice::Auth, move |state: &AppState| {
                *seen.lock().unwrap() = Some(state.auth().is_authenticated);
            });
        }
        store.dispatch(AuthIntent::SetAuthenticated(true));
        assert_eq!(*seen.lock().unwrap(), Some(true));
    }

    #[test]
    fn malformed_json_is_ignored() {
        let mut store = Store::new(AppState::seeded());
        let before = store.state().clone();
        assert!(!store.dispatch_json(r#"{"type":"launchRocket"}"#));
        assert!(!store.dispatch_json("not json"));
        assert!(Slice::ALL.iter().all(|s| !store.state().differs(&before, *s)));

        assert!(store.dispatch_json(r#"{"type":"addXP","payload":40}"#));
        assert_eq!(store.state().user().profile.total_xp, 40);
    }
}
