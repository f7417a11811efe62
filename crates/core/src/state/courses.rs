use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::model::{EnrolledCourse, LessonKey, SidebarBadgeCounts};
use crate::seed;

use super::intent::CourseIntent;

/// Enrollment and progress slice. This is the slice that persists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseState {
    /// Unique by title, in enrollment order.
    pub enrolled: Vec<EnrolledCourse>,
    /// Absent entries read as `false`.
    pub lesson_completion: BTreeMap<LessonKey, bool>,
    /// Course title to favorited resource names. Empty sets are dropped.
    pub resource_favorites: BTreeMap<String, BTreeSet<String>>,
    pub sidebar_badges: SidebarBadgeCounts,
}

impl CourseState {
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            enrolled: seed::enrolled_courses(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_enrolled(&self, title: &str) -> bool {
        self.enrolled.iter().any(|course| course.title == title)
    }

    #[must_use]
    pub fn is_lesson_complete(&self, title: &str, lesson_index: u32) -> bool {
        self.lesson_completion
            .get(&LessonKey::new(title, lesson_index))
            .copied()
            .unwrap_or(false)
    }

    #[must_use]
    pub fn is_favorite(&self, title: &str, resource: &str) -> bool {
        self.resource_favorites
            .get(title)
            .is_some_and(|set| set.contains(resource))
    }

    /// Keep the first course for each title, dropping later duplicates.
    pub fn dedup_enrolled(&mut self) {
        let mut seen = BTreeSet::new();
        self.enrolled
            .retain(|course| seen.insert(course.title.clone()));
    }
}

/// Course slice reducer. Returns `state` itself (same `Arc`) when nothing changes.
#[must_use]
pub fn reduce(state: &Arc<CourseState>, intent: &CourseIntent) -> Arc<CourseState> {
    let next = match intent {
        CourseIntent::EnrollCourse(course) => enroll(state, course),
        CourseIntent::UnenrollCourse(title) => unenroll(state, title),
        CourseIntent::ToggleLessonCompletion {
            course_title,
            lesson_index,
        } => toggle_lesson(state, course_title, *lesson_index),
        CourseIntent::ToggleResourceFavorite {
            course_title,
            resource_name,
        } => toggle_favorite(state, course_title, resource_name),
        CourseIntent::SetSidebarBadgeCounts(counts) => set_badges(state, counts),
        CourseIntent::ResetCourseProgress => {
            let seeded = CourseState::seeded();
            (**state != seeded).then_some(seeded)
        }
    };
    next.map_or_else(|| Arc::clone(state), Arc::new)
}

fn enroll(state: &CourseState, course: &EnrolledCourse) -> Option<CourseState> {
    let course = course.normalized()?;
    if state.is_enrolled(&course.title) {
        return None;
    }
    let mut next = state.clone();
    next.enrolled.push(course);
    Some(next)
}

fn unenroll(state: &CourseState, title: &str) -> Option<CourseState> {
    let title = title.trim();
    let has_lessons = state
        .lesson_completion
        .keys()
        .any(|key| key.course_title == title);
    if !state.is_enrolled(title) && !has_lessons && !state.resource_favorites.contains_key(title)
    {
        return None;
    }
    let mut next = state.clone();
    next.enrolled.retain(|course| course.title != title);
    next.lesson_completion
        .retain(|key, _| key.course_title != title);
    next.resource_favorites.remove(title);
    Some(next)
}

fn toggle_lesson(state: &CourseState, title: &str, lesson_index: u32) -> Option<CourseState> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    let key = LessonKey::new(title, lesson_index);
    let mut next = state.clone();
    let entry = next.lesson_completion.entry(key).or_insert(false);
    *entry = !*entry;
    Some(next)
}

fn toggle_favorite(state: &CourseState, title: &str, resource: &str) -> Option<CourseState> {
    let (title, resource) = (title.trim(), resource.trim());
    if title.is_empty() || resource.is_empty() {
        return None;
    }
    let mut next = state.clone();
    let set = next.resource_favorites.entry(title.to_owned()).or_default();
    if !set.remove(resource) {
        set.insert(resource.to_owned());
    }
    if set.is_empty() {
        next.resource_favorites.remove(title);
    }
    Some(next)
}

fn set_badges(state: &CourseState, counts: &SidebarBadgeCounts) -> Option<CourseState> {
    if state.sidebar_badges == *counts {
        return None;
    }
    Some(CourseState {
        sidebar_badges: counts.clone(),
        ..state.clone()
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Arc<CourseState> {
        Arc::new(CourseState::default())
    }

    fn toggle(title: &str, index: u32) -> CourseIntent {
        CourseIntent::ToggleLessonCompletion {
            course_title: title.into(),
            lesson_index: index,
        }
    }

    #[test]
    fn enrolling_twice_keeps_one_entry_and_same_reference() {
        let state = empty();
        let intent = CourseIntent::EnrollCourse(EnrolledCourse::titled("A"));

        let once = reduce(&state, &intent);
        assert_eq!(once.enrolled.len(), 1);

        let twice = reduce(&once, &intent);
        assert!(Arc::ptr_eq(&once, &twice));
    }

    #[test]
    fn enrollment_dedups_on_trimmed_title() {
        let state = reduce(&empty(), &CourseIntent::EnrollCourse(EnrolledCourse::titled("A")));
        let again = reduce(
            &state,
            &CourseIntent::EnrollCourse(EnrolledCourse::titled("  A  ")),
        );
        assert!(Arc::ptr_eq(&state, &again));
    }

    #[test]
    fn blank_title_enrollment_is_ignored() {
        let state = empty();
        let next = reduce(&state, &CourseIntent::EnrollCourse(EnrolledCourse::titled("")));
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn lesson_toggle_is_an_involution() {
        let state = empty();
        let on = reduce(&state, &toggle("A", 0));
        assert!(on.is_lesson_complete("A", 0));

        let off = reduce(&on, &toggle("A", 0));
        assert!(!off.is_lesson_complete("A", 0));
        assert!(!off.is_lesson_complete("A", 1));
    }

    #[test]
    fn favorite_toggle_adds_then_removes() {
        let intent = CourseIntent::ToggleResourceFavorite {
            course_title: "A".into(),
            resource_name: "Cheat Sheet".into(),
        };
        let on = reduce(&empty(), &intent);
        assert!(on.is_favorite("A", "Cheat Sheet"));

        let off = reduce(&on, &intent);
        assert!(!off.is_favorite("A", "Cheat Sheet"));
        assert!(off.resource_favorites.is_empty());
    }

    #[test]
    fn unenroll_cascades_to_lessons_and_favorites() {
        let mut state = reduce(&empty(), &CourseIntent::EnrollCourse(EnrolledCourse::titled("A")));
        state = reduce(&state, &toggle("A", 3));
        state = reduce(
            &state,
            &CourseIntent::ToggleResourceFavorite {
                course_title: "A".into(),
                resource_name: "Notes".into(),
            },
        );

        let next = reduce(&state, &CourseIntent::UnenrollCourse("A".into()));
        assert!(next.enrolled.is_empty());
        assert!(next.lesson_completion.is_empty());
        assert!(next.resource_favorites.is_empty());

        let again = reduce(&next, &CourseIntent::UnenrollCourse("A".into()));
        assert!(Arc::ptr_eq(&next, &again));
    }

    #[test]
    fn identical_badge_counts_do_not_change_state() {
        let counts = SidebarBadgeCounts::new().with("messages", 3);
        let once = reduce(&empty(), &CourseIntent::SetSidebarBadgeCounts(counts.clone()));
        assert_eq!(once.sidebar_badges.get("messages"), 3);

        let twice = reduce(&once, &CourseIntent::SetSidebarBadgeCounts(counts));
        assert!(Arc::ptr_eq(&once, &twice));
    }

    #[test]
    fn reset_restores_the_preset_courses() {
        let state = reduce(&empty(), &toggle("A", 0));
        let reset = reduce(&state, &CourseIntent::ResetCourseProgress);
        assert_eq!(*reset, CourseState::seeded());

        let again = reduce(&reset, &CourseIntent::ResetCourseProgress);
        assert!(Arc::ptr_eq(&reset, &again));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut first = EnrolledCourse::titled("A");
        first.instructor = "first".into();
        let mut state = CourseState {
            enrolled: vec![first, EnrolledCourse::titled("A"), EnrolledCourse::titled("B")],
            ..CourseState::default()
        };
        state.dedup_enrolled();
        assert_eq!(state.enrolled.len(), 2);
        assert_eq!(state.enrolled[0].instructor, "first");
    }
}
