//! The state tree: four disjoint slices, each owned by one pure reducer.
//!
//! Every reducer returns the *same* `Arc` when an intent leaves its slice
//! unchanged, so change detection is a pointer comparison per slice root.

use std::fmt;
use std::sync::Arc;

use crate::model::AuthSession;

pub mod auth;
pub mod courses;
mod intent;
pub mod schedule;
pub mod user;

pub use courses::CourseState;
pub use intent::{AuthIntent, CourseIntent, Intent, IntentDecodeError, ScheduleIntent, UserIntent};
pub use schedule::ScheduleState;
pub use user::UserState;

//
// ─── SLICES ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slice {
    Courses,
    User,
    Auth,
    Schedule,
}

impl Slice {
    pub const ALL: [Slice; 4] = [Slice::Courses, Slice::User, Slice::Auth, Slice::Schedule];

    /// Whether this slice is written to durable storage.
    #[must_use]
    pub fn is_persisted(self) -> bool {
        matches!(self, Slice::Courses)
    }

    fn bit(self) -> u8 {
        match self {
            Slice::Courses => 1,
            Slice::User => 1 << 1,
            Slice::Auth => 1 << 2,
            Slice::Schedule => 1 << 3,
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slice::Courses => "courses",
            Slice::User => "user",
            Slice::Auth => "auth",
            Slice::Schedule => "schedule",
        };
        f.write_str(name)
    }
}

/// A set of slices a subscriber listens to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SliceSet(u8);

impl SliceSet {
    pub const NONE: SliceSet = SliceSet(0);
    pub const ALL: SliceSet = SliceSet(0b1111);

    #[must_use]
    pub fn only(slice: Slice) -> Self {
        Self(slice.bit())
    }

    #[must_use]
    pub fn with(self, slice: Slice) -> Self {
        Self(self.0 | slice.bit())
    }

    #[must_use]
    pub fn contains(self, slice: Slice) -> bool {
        self.0 & slice.bit() != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Slice> for SliceSet {
    fn from(slice: Slice) -> Self {
        Self::only(slice)
    }
}

impl FromIterator<Slice> for SliceSet {
    fn from_iter<I: IntoIterator<Item = Slice>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, SliceSet::with)
    }
}

impl fmt::Debug for SliceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(Slice::ALL.iter().filter(|s| self.contains(**s)))
            .finish()
    }
}

//
// ─── APP STATE ─────────────────────────────────────────────────────────────────
//

/// An immutable snapshot of the whole tree. Cloning is cheap: it clones four `Arc`s.
#[derive(Debug, Clone)]
pub struct AppState {
    courses: Arc<CourseState>,
    user: Arc<UserState>,
    auth: Arc<AuthSession>,
    schedule: Arc<ScheduleState>,
}

impl AppState {
    /// Fresh-install state: preset courses, seeded profile, signed out.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            courses: Arc::new(CourseState::seeded()),
            user: Arc::new(UserState::seeded()),
            auth: Arc::default(),
            schedule: Arc::default(),
        }
    }

    /// Seeded state with the persisted course slice swapped in.
    #[must_use]
    pub fn restored(courses: CourseState) -> Self {
        Self {
            courses: Arc::new(courses),
            ..Self::seeded()
        }
    }

    #[must_use]
    pub fn courses(&self) -> &Arc<CourseState> {
        &self.courses
    }

    #[must_use]
    pub fn user(&self) -> &Arc<UserState> {
        &self.user
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<AuthSession> {
        &self.auth
    }

    #[must_use]
    pub fn schedule(&self) -> &Arc<ScheduleState> {
        &self.schedule
    }

    /// Whether `slice` has a different root than in `other`.
    #[must_use]
    pub fn differs(&self, other: &AppState, slice: Slice) -> bool {
        match slice {
            Slice::Courses => !Arc::ptr_eq(&self.courses, &other.courses),
            Slice::User => !Arc::ptr_eq(&self.user, &other.user),
            Slice::Auth => !Arc::ptr_eq(&self.auth, &other.auth),
            Slice::Schedule => !Arc::ptr_eq(&self.schedule, &other.schedule),
        }
    }

    /// Apply `intent` to the one slice that owns it.
    ///
    /// Untouched slices are carried over by reference. Returns the changed
    /// slice, or `None` if the intent was a no-op.
    #[must_use]
    pub fn reduce(&self, intent: &Intent) -> (AppState, Option<Slice>) {
        let mut next = self.clone();
        match intent {
            Intent::Course(intent) => next.courses = courses::reduce(&self.courses, intent),
            Intent::User(intent) => next.user = user::reduce(&self.user, intent),
            Intent::Auth(intent) => next.auth = auth::reduce(&self.auth, intent),
            Intent::Schedule(intent) => next.schedule = schedule::reduce(&self.schedule, intent),
        }
        let slice = intent.slice();
        let changed = next.differs(self, slice).then_some(slice);
        (next, changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EnrolledCourse;

    #[test]
    fn slice_set_membership() {
        let set = SliceSet::only(Slice::Courses).with(Slice::Auth);
        assert!(set.contains(Slice::Courses));
        assert!(set.contains(Slice::Auth));
        assert!(!set.contains(Slice::User));
        assert!(SliceSet::NONE.is_empty());
        assert!(Slice::ALL.iter().all(|s| SliceSet::ALL.contains(*s)));
    }

    #[test]
    fn reduce_leaves_other_slices_reference_equal() {
        let state = AppState::seeded();
        let (next, changed) =
            state.reduce(&CourseIntent::EnrollCourse(EnrolledCourse::titled("A")).into());

        assert_eq!(changed, Some(Slice::Courses));
        assert!(next.differs(&state, Slice::Courses));
        assert!(Arc::ptr_eq(state.user(), next.user()));
        assert!(Arc::ptr_eq(state.auth(), next.auth()));
        assert!(Arc::ptr_eq(state.schedule(), next.schedule()));
    }

    #[test]
    fn no_op_intent_reports_no_change() {
        let state = AppState::seeded();
        let (next, changed) = state.reduce(&UserIntent::AddXp(-1).into());
        assert_eq!(changed, None);
        assert!(Slice::ALL.iter().all(|s| !next.differs(&state, *s)));
    }

    #[test]
    fn restored_state_keeps_seeded_user() {
        let state = AppState::restored(CourseState::default());
        assert!(state.courses().enrolled.is_empty());
        assert_eq!(**state.user(), UserState::seeded());
        assert!(!state.auth().is_authenticated);
    }

    #[test]
    fn only_courses_persist() {
        assert!(Slice::Courses.is_persisted());
        assert!(!Slice::Auth.is_persisted());
        assert!(!Slice::User.is_persisted());
    }
}
