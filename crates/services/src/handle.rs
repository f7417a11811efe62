//! View-facing binding over a shared [`Store`].
//!
//! Slice getters, selector getters and one action per intent. No business
//! logic lives here; every action is a `dispatch` of the matching intent.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, NaiveTime};
use learn_core::model::{
    AchievementId, AppearanceSettingsPatch, AuthSession, EnrolledCourse, GroupId,
    NewScheduledSession, NotificationSettingsPatch, PrivacySettingsPatch, ProfilePatch,
    ScheduledSession, SecuritySettingsPatch, SessionId, SidebarBadgeCounts, StudyGroup, Theme,
};
use learn_core::selectors::{self, GroupAggregate};
use learn_core::state::{
    AppState, AuthIntent, CourseIntent, CourseState, Intent, ScheduleIntent, ScheduleState,
    SliceSet, UserIntent, UserState,
};
use learn_core::{Clock, CourseCatalog};

use crate::store::{Store, SubscriptionId};

/// Cloneable handle shared by every view. Clones address the same store.
///
/// Actions and getters lock the store briefly. Listeners run while the lock
/// is held, so a listener must not call back into the handle.
#[derive(Clone)]
pub struct LearningHandle {
    store: Arc<Mutex<Store>>,
    catalog: Arc<dyn CourseCatalog>,
    clock: Clock,
}

impl LearningHandle {
    #[must_use]
    pub fn new(store: Store, catalog: Arc<dyn CourseCatalog>, clock: Clock) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            catalog,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // a panicking listener must not wedge every other view
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flush pending persistence and detach the writer.
    ///
    /// Other clones keep working afterwards, but nothing more is saved.
    pub async fn shutdown(&self) {
        let writer = self.lock().take_writer();
        if let Some(writer) = writer {
            writer.shutdown().await;
        }
    }

    //
    // ─── SLICES ────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn snapshot(&self) -> AppState {
        self.lock().state().clone()
    }

    #[must_use]
    pub fn courses(&self) -> Arc<CourseState> {
        Arc::clone(self.lock().state().courses())
    }

    #[must_use]
    pub fn user(&self) -> Arc<UserState> {
        Arc::clone(self.lock().state().user())
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthSession> {
        Arc::clone(self.lock().state().auth())
    }

    #[must_use]
    pub fn schedule(&self) -> Arc<ScheduleState> {
        Arc::clone(self.lock().state().schedule())
    }

    //
    // ─── SELECTORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn total_xp(&self) -> u64 {
        selectors::total_xp(&self.user())
    }

    #[must_use]
    pub fn current_level(&self) -> u32 {
        selectors::current_level(&self.user())
    }

    #[must_use]
    pub fn level_progress(&self) -> f64 {
        selectors::level_progress(&self.user())
    }

    #[must_use]
    pub fn completion_rate(&self) -> f64 {
        selectors::completion_rate(&self.user())
    }

    #[must_use]
    pub fn earned_points(&self) -> u64 {
        selectors::earned_points(&self.user())
    }

    #[must_use]
    pub fn joined_groups(&self) -> usize {
        selectors::joined_groups_count(&self.user())
    }

    #[must_use]
    pub fn average_attendance(&self) -> f64 {
        selectors::average_attendance(&self.user())
    }

    #[must_use]
    pub fn group_aggregate(&self) -> GroupAggregate {
        selectors::group_aggregate(&self.user())
    }

    #[must_use]
    pub fn enrolled_count(&self) -> usize {
        selectors::enrolled_count(&self.courses())
    }

    #[must_use]
    pub fn is_enrolled(&self, title: &str) -> bool {
        self.courses().is_enrolled(title)
    }

    /// Catalog titles the learner is not enrolled in, in catalog order.
    #[must_use]
    pub fn available_courses(&self) -> Vec<String> {
        let courses = self.courses();
        self.catalog
            .titles()
            .into_iter()
            .filter(|title| !courses.is_enrolled(title))
            .map(str::to_owned)
            .collect()
    }

    #[must_use]
    pub fn sidebar_badges(&self) -> SidebarBadgeCounts {
        selectors::sidebar_badges(&self.courses()).clone()
    }

    #[must_use]
    pub fn course_progress(&self, title: &str) -> f64 {
        selectors::course_progress(&self.courses(), self.catalog.as_ref(), title)
    }

    #[must_use]
    pub fn upcoming_sessions(&self) -> Vec<ScheduledSession> {
        let now = self.clock.now_naive();
        selectors::upcoming_sessions(&self.schedule(), now)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn overdue_sessions(&self) -> Vec<ScheduledSession> {
        let now = self.clock.now_naive();
        selectors::overdue_sessions(&self.schedule(), now)
            .into_iter()
            .cloned()
            .collect()
    }

    //
    // ─── SUBSCRIPTIONS ─────────────────────────────────────────────────────────
    //

    pub fn subscribe(
        &self,
        slices: impl Into<SliceSet>,
        listener: impl FnMut(&AppState) + Send + 'static,
    ) -> SubscriptionId {
        self.lock().subscribe(slices, listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().unsubscribe(id)
    }

    /// Call `listener` whenever the value of `selector` changes.
    ///
    /// The value at registration time is the baseline and is not reported.
    pub fn watch<T>(
        &self,
        selector: impl Fn(&AppState) -> T + Send + 'static,
        mut listener: impl FnMut(&T) + Send + 'static,
    ) -> SubscriptionId
    where
        T: PartialEq + Send + 'static,
    {
        let mut store = self.lock();
        let mut last = selector(store.state());
        store.subscribe(SliceSet::ALL, move |state: &AppState| {
            let value = selector(state);
            if value != last {
                listener(&value);
                last = value;
            }
        })
    }

    //
    // ─── ACTIONS ───────────────────────────────────────────────────────────────
    //

    pub fn dispatch(&self, intent: impl Into<Intent>) -> bool {
        self.lock().dispatch(intent)
    }

    pub fn dispatch_json(&self, raw: &str) -> bool {
        self.lock().dispatch_json(raw)
    }

    pub fn enroll_course(&self, course: EnrolledCourse) -> bool {
        self.dispatch(CourseIntent::EnrollCourse(course))
    }

    /// Enroll from the catalog entry for `title`. Unknown titles are a no-op.
    pub fn enroll_from_catalog(&self, title: &str) -> bool {
        match self.catalog.lookup(title) {
            Some(entry) => self.enroll_course(entry.to_enrollment()),
            None => {
                tracing::debug!(title, "no catalog entry to enroll from");
                false
            }
        }
    }

    pub fn unenroll_course(&self, title: impl Into<String>) -> bool {
        self.dispatch(CourseIntent::UnenrollCourse(title.into()))
    }

    pub fn toggle_lesson_completion(&self, course_title: impl Into<String>, lesson_index: u32) -> bool {
        self.dispatch(CourseIntent::ToggleLessonCompletion {
            course_title: course_title.into(),
            lesson_index,
        })
    }

    pub fn toggle_resource_favorite(
        &self,
        course_title: impl Into<String>,
        resource_name: impl Into<String>,
    ) -> bool {
        self.dispatch(CourseIntent::ToggleResourceFavorite {
            course_title: course_title.into(),
            resource_name: resource_name.into(),
        })
    }

    pub fn set_sidebar_badge_counts(&self, counts: SidebarBadgeCounts) -> bool {
        self.dispatch(CourseIntent::SetSidebarBadgeCounts(counts))
    }

    pub fn reset_course_progress(&self) -> bool {
        self.dispatch(CourseIntent::ResetCourseProgress)
    }

    pub fn update_profile(&self, patch: ProfilePatch) -> bool {
        self.dispatch(UserIntent::UpdateProfile(patch))
    }

    pub fn update_notification_settings(&self, patch: NotificationSettingsPatch) -> bool {
        self.dispatch(UserIntent::UpdateNotificationSettings(patch))
    }

    pub fn update_privacy_settings(&self, patch: PrivacySettingsPatch) -> bool {
        self.dispatch(UserIntent::UpdatePrivacySettings(patch))
    }

    pub fn update_security_settings(&self, patch: SecuritySettingsPatch) -> bool {
        self.dispatch(UserIntent::UpdateSecuritySettings(patch))
    }

    pub fn toggle_two_factor(&self) -> bool {
        self.dispatch(UserIntent::ToggleTwoFactor)
    }

    pub fn update_appearance_settings(&self, patch: AppearanceSettingsPatch) -> bool {
        self.dispatch(UserIntent::UpdateAppearanceSettings(patch))
    }

    pub fn set_theme(&self, theme: Theme) -> bool {
        self.dispatch(UserIntent::SetTheme(theme))
    }

    pub fn earn_achievement(&self, id: impl Into<AchievementId>) -> bool {
        self.dispatch(UserIntent::EarnAchievement(id.into()))
    }

    pub fn update_achievement_progress(&self, id: impl Into<AchievementId>, current_steps: u32) -> bool {
        self.dispatch(UserIntent::UpdateAchievementProgress {
            id: id.into(),
            current_steps,
        })
    }

    pub fn join_study_group(&self, id: impl Into<GroupId>) -> bool {
        self.dispatch(UserIntent::JoinStudyGroup(id.into()))
    }

    pub fn leave_study_group(&self, id: impl Into<GroupId>) -> bool {
        self.dispatch(UserIntent::LeaveStudyGroup(id.into()))
    }

    pub fn create_study_group(&self, group: StudyGroup) -> bool {
        self.dispatch(UserIntent::CreateStudyGroup(group))
    }

    pub fn add_xp(&self, amount: i64) -> bool {
        self.dispatch(UserIntent::AddXp(amount))
    }

    pub fn reset_user_state(&self) -> bool {
        self.dispatch(UserIntent::ResetUserState)
    }

    pub fn set_authenticated(&self, authenticated: bool) -> bool {
        self.dispatch(AuthIntent::SetAuthenticated(authenticated))
    }

    pub fn set_loading(&self, loading: bool) -> bool {
        self.dispatch(AuthIntent::SetLoading(loading))
    }

    pub fn set_error(&self, error: Option<String>) -> bool {
        self.dispatch(AuthIntent::SetError(error))
    }

    /// Schedule a study session. Returns the id it was stored under, or `None`
    /// if the request was rejected (for example, a blank title).
    pub fn add_scheduled_session(
        &self,
        title: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: u32,
        course: Option<String>,
        notes: impl Into<String>,
    ) -> Option<SessionId> {
        let mut store = self.lock();
        let id = SessionId::new(store.state().schedule().next_id);
        let added = store.dispatch(ScheduleIntent::AddScheduledSession(NewScheduledSession {
            title: title.into(),
            date,
            time,
            duration_minutes,
            course,
            notes: notes.into(),
        }));
        added.then_some(id)
    }

    pub fn complete_scheduled_session(&self, id: SessionId) -> bool {
        self.dispatch(ScheduleIntent::CompleteScheduledSession(id))
    }

    pub fn remove_scheduled_session(&self, id: SessionId) -> bool {
        self.dispatch(ScheduleIntent::RemoveScheduledSession(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::StaticCatalog;
    use learn_core::seed;
    use learn_core::time::fixed_clock;
    use learn_core::state::Slice;

    fn handle() -> LearningHandle {
        LearningHandle::new(
            Store::new(AppState::seeded()),
            Arc::new(StaticCatalog::builtin()),
            fixed_clock(),
        )
    }

    #[test]
    fn actions_route_to_their_slices() {
        let handle = handle();
        let before = handle.snapshot();

        assert!(handle.add_xp(1_500));
        assert_eq!(handle.total_xp(), 1_500);
        assert_eq!(handle.current_level(), 2);

        let after = handle.snapshot();
        assert!(after.differs(&before, Slice::User));
        assert!(!after.differs(&before, Slice::Courses));
    }

    #[test]
    fn enroll_from_catalog_uses_catalog_metadata() {
        let handle = handle();
        assert!(handle.enroll_from_catalog("Web Development Essentials"));
        assert!(handle.is_enrolled("Web Development Essentials"));
        assert!(!handle.enroll_from_catalog("Web Development Essentials"));
        assert!(!handle.enroll_from_catalog("Basket Weaving"));
        assert_eq!(handle.enrolled_count(), 3);
    }

    #[test]
    fn available_courses_excludes_enrolled_titles() {
        let handle = handle();
        let available = handle.available_courses();
        assert_eq!(
            available,
            ["Machine Learning Foundations", "Web Development Essentials"]
        );

        handle.enroll_from_catalog("Web Development Essentials");
        assert_eq!(handle.available_courses(), ["Machine Learning Foundations"]);
    }

    #[test]
    fn course_progress_reads_catalog_lesson_count() {
        let handle = handle();
        handle.toggle_lesson_completion(seed::INTRO_PROGRAMMING, 0);
        handle.toggle_lesson_completion(seed::INTRO_PROGRAMMING, 1);
        assert!((handle.course_progress(seed::INTRO_PROGRAMMING) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn watch_fires_only_when_selected_value_changes() {
        let handle = handle();
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            handle.watch(
                |state: &AppState| selectors::current_level(state.user()),
                move |level: &u32| seen.lock().unwrap().push(*level),
            );
        }

        handle.add_xp(400);
        handle.set_authenticated(true);
        handle.add_xp(700);
        handle.add_xp(100);
        assert_eq!(*seen.lock().unwrap(), [2]);
    }

    #[test]
    fn scheduled_sessions_get_distinct_ids() {
        let handle = handle();
        let date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

        let a = handle.add_scheduled_session("Graphs", date, time, 45, None, "").unwrap();
        let b = handle.add_scheduled_session("Trees", date, time, 30, None, "").unwrap();
        assert_ne!(a, b);
        assert!(handle.add_scheduled_session("  ", date, time, 30, None, "").is_none());
        assert_eq!(handle.upcoming_sessions().len(), 2);

        assert!(handle.complete_scheduled_session(a));
        assert_eq!(handle.upcoming_sessions().len(), 1);
        assert_eq!(handle.schedule().session(b).unwrap().title, "Trees");
    }
}
