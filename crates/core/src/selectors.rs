//! Derived views over state. Nothing here is stored; every value is recomputed
//! from the canonical slices it reads.
//!
//! Selectors take the slice (or slices) they depend on rather than the whole
//! tree, which lets [`Memoized`] key its cache on one slice root.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::catalog::CourseCatalog;
use crate::model::{ScheduledSession, SidebarBadgeCounts, XP_PER_LEVEL};
use crate::state::{CourseState, ScheduleState, UserState};

//
// ─── PROFILE & ACHIEVEMENTS ────────────────────────────────────────────────────
//

#[must_use]
pub fn total_xp(user: &UserState) -> u64 {
    user.profile.total_xp
}

#[must_use]
pub fn current_level(user: &UserState) -> u32 {
    user.profile.current_level
}

/// Progress through the current level, in `[0, 1)`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn level_progress(user: &UserState) -> f64 {
    (user.profile.total_xp % XP_PER_LEVEL) as f64 / XP_PER_LEVEL as f64
}

#[must_use]
pub fn earned_achievements(user: &UserState) -> usize {
    user.achievements.iter().filter(|a| a.is_earned).count()
}

/// Earned over total achievements; 0 when there are none.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn completion_rate(user: &UserState) -> f64 {
    let total = user.achievements.len();
    if total == 0 {
        return 0.0;
    }
    earned_achievements(user) as f64 / total as f64
}

#[must_use]
pub fn earned_points(user: &UserState) -> u64 {
    user.achievements
        .iter()
        .filter(|a| a.is_earned)
        .map(|a| u64::from(a.points))
        .sum()
}

//
// ─── STUDY GROUPS ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq)]
pub struct GroupAggregate {
    pub groups: usize,
    pub joined: usize,
    pub total_meetings: u64,
    /// Mean of per-group meeting counts.
    pub avg_meetings: f64,
    /// Mean of per-group attendance percentages.
    pub avg_attendance: f64,
}

#[must_use]
pub fn joined_groups_count(user: &UserState) -> usize {
    user.study_groups.iter().filter(|g| g.is_joined).count()
}

/// Aggregates across every known group; means are 0 for an empty set.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn group_aggregate(user: &UserState) -> GroupAggregate {
    let groups = user.study_groups.len();
    let total_meetings: u64 = user
        .study_groups
        .iter()
        .map(|g| u64::from(g.stats.total_meetings))
        .sum();
    let attendance_sum: f64 = user.study_groups.iter().map(|g| g.stats.avg_attendance).sum();

    let (avg_meetings, avg_attendance) = if groups == 0 {
        (0.0, 0.0)
    } else {
        (
            total_meetings as f64 / groups as f64,
            attendance_sum / groups as f64,
        )
    };

    GroupAggregate {
        groups,
        joined: joined_groups_count(user),
        total_meetings,
        avg_meetings,
        avg_attendance,
    }
}

#[must_use]
pub fn average_attendance(user: &UserState) -> f64 {
    group_aggregate(user).avg_attendance
}

//
// ─── COURSES ───────────────────────────────────────────────────────────────────
//

#[must_use]
pub fn enrolled_count(courses: &CourseState) -> usize {
    courses.enrolled.len()
}

/// Read verbatim; badge counts are supplied from outside, not derived.
#[must_use]
pub fn sidebar_badges(courses: &CourseState) -> &SidebarBadgeCounts {
    &courses.sidebar_badges
}

#[must_use]
pub fn completed_lessons(courses: &CourseState, title: &str) -> usize {
    courses
        .lesson_completion
        .iter()
        .filter(|(key, done)| **done && key.course_title == title)
        .count()
}

#[must_use]
pub fn favorite_resources<'a>(courses: &'a CourseState, title: &str) -> Vec<&'a str> {
    courses
        .resource_favorites
        .get(title)
        .map(|set| set.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Completed share of a course's catalog lessons, in `[0, 1]`.
///
/// Completion entries beyond the catalog's lesson count are ignored. Unknown
/// courses and courses with no lessons report 0.
#[must_use]
pub fn course_progress(courses: &CourseState, catalog: &dyn CourseCatalog, title: &str) -> f64 {
    let Some(entry) = catalog.lookup(title) else {
        return 0.0;
    };
    let lesson_count = entry.lesson_count();
    if lesson_count == 0 {
        return 0.0;
    }
    let done = courses
        .lesson_completion
        .iter()
        .filter(|(key, done)| {
            **done && key.course_title == title && key.lesson_index < lesson_count
        })
        .count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = done as f64 / f64::from(lesson_count);
    ratio
}

//
// ─── SCHEDULE ──────────────────────────────────────────────────────────────────
//

/// Open sessions starting at or after `now`, soonest first.
#[must_use]
pub fn upcoming_sessions(schedule: &ScheduleState, now: NaiveDateTime) -> Vec<&ScheduledSession> {
    let mut sessions: Vec<_> = schedule
        .sessions
        .iter()
        .filter(|s| !s.completed && s.starts_at() >= now)
        .collect();
    sessions.sort_by_key(|s| (s.starts_at(), s.id));
    sessions
}

/// Open sessions that already ended before `now`, oldest first.
///
/// A session whose end is past the calendar limit is never overdue.
#[must_use]
pub fn overdue_sessions(schedule: &ScheduleState, now: NaiveDateTime) -> Vec<&ScheduledSession> {
    let mut sessions: Vec<_> = schedule
        .sessions
        .iter()
        .filter(|s| !s.completed && s.ends_at().is_some_and(|end| end < now))
        .collect();
    sessions.sort_by_key(|s| (s.starts_at(), s.id));
    sessions
}

#[must_use]
pub fn next_session(schedule: &ScheduleState, now: NaiveDateTime) -> Option<&ScheduledSession> {
    upcoming_sessions(schedule, now).into_iter().next()
}

//
// ─── MEMOIZATION ───────────────────────────────────────────────────────────────
//

/// Caches one selector result, keyed by the identity of the slice root it read.
///
/// Holding the `Arc` keeps the pointer from being reused while cached.
pub struct Memoized<S, T> {
    select: fn(&S) -> T,
    cached: Option<(Arc<S>, T)>,
    computations: usize,
}

impl<S, T: Clone> Memoized<S, T> {
    #[must_use]
    pub fn new(select: fn(&S) -> T) -> Self {
        Self {
            select,
            cached: None,
            computations: 0,
        }
    }

    /// Returns the cached value when `root` is the same slice it was computed for.
    pub fn get(&mut self, root: &Arc<S>) -> T {
        if let Some((seen, value)) = &self.cached {
            if Arc::ptr_eq(seen, root) {
                return value.clone();
            }
        }
        let value = (self.select)(root);
        self.computations += 1;
        self.cached = Some((Arc::clone(root), value.clone()));
        value
    }

    /// How many times the selector actually ran.
    #[must_use]
    pub fn computations(&self) -> usize {
        self.computations
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
