use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── COURSE LEVEL ──────────────────────────────────────────────────────────────
//

/// Difficulty tier shown on course cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CourseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CourseLevel::Beginner => "Beginner",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── ENROLLED COURSE ───────────────────────────────────────────────────────────
//

/// A course the learner is enrolled in.
///
/// `title` is the unique key: enrollment is deduplicated by it, and lesson
/// completion and resource favorites refer back to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    pub title: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub students: u32,
    #[serde(default)]
    pub rating: f32,
    /// Percent complete, 0..=100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub level: CourseLevel,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub next_lesson: String,
}

impl EnrolledCourse {
    /// Minimal course with only a title; every other field takes its default.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            instructor: String::new(),
            duration: String::new(),
            students: 0,
            rating: 0.0,
            progress: 0,
            thumbnail: String::new(),
            level: CourseLevel::default(),
            category: String::new(),
            video_url: String::new(),
            next_lesson: String::new(),
        }
    }

    /// Normalize an incoming course before it enters state.
    ///
    /// Returns `None` when the title is blank. Progress is clamped to 100 and a
    /// non-finite or negative rating collapses to 0.
    #[must_use]
    pub fn normalized(&self) -> Option<Self> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        let rating = if self.rating.is_finite() {
            self.rating.clamp(0.0, 5.0)
        } else {
            0.0
        };
        Some(Self {
            title: title.to_owned(),
            progress: self.progress.min(100),
            rating,
            ..self.clone()
        })
    }
}

//
// ─── LESSON KEY ────────────────────────────────────────────────────────────────
//

/// Composite key for a single lesson: `(course title, lesson index)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonKey {
    pub course_title: String,
    pub lesson_index: u32,
}

impl LessonKey {
    #[must_use]
    pub fn new(course_title: impl Into<String>, lesson_index: u32) -> Self {
        Self {
            course_title: course_title.into(),
            lesson_index,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
