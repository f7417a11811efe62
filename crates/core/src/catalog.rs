//! Read-only course catalog consumed by selectors and the app binary.
//!
//! The catalog is reference data owned outside the store; state only refers
//! to it by course title.

use std::collections::BTreeMap;

use crate::model::{CourseLevel, EnrolledCourse};

/// A catalog entry: metadata plus the ordered lesson and resource lists.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogCourse {
    pub title: String,
    pub instructor: String,
    pub duration: String,
    pub level: CourseLevel,
    pub category: String,
    pub rating: f32,
    pub students: u32,
    pub thumbnail: String,
    pub video_url: String,
    pub lessons: Vec<String>,
    pub resources: Vec<String>,
}

impl CatalogCourse {
    #[must_use]
    pub fn lesson_count(&self) -> u32 {
        u32::try_from(self.lessons.len()).unwrap_or(u32::MAX)
    }

    /// Build the enrollment record for this course, starting at lesson one.
    #[must_use]
    pub fn to_enrollment(&self) -> EnrolledCourse {
        EnrolledCourse {
            title: self.title.clone(),
            instructor: self.instructor.clone(),
            duration: self.duration.clone(),
            students: self.students,
            rating: self.rating,
            progress: 0,
            thumbnail: self.thumbnail.clone(),
            level: self.level,
            category: self.category.clone(),
            video_url: self.video_url.clone(),
            next_lesson: self.lessons.first().cloned().unwrap_or_default(),
        }
    }
}

/// Lookup by title. Implemented by whatever owns the course catalog.
pub trait CourseCatalog: Send + Sync {
    fn lookup(&self, title: &str) -> Option<&CatalogCourse>;

    fn titles(&self) -> Vec<&str>;
}

/// In-process catalog, keyed by title.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    courses: BTreeMap<String, CatalogCourse>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(courses: impl IntoIterator<Item = CatalogCourse>) -> Self {
        Self {
            courses: courses
                .into_iter()
                .map(|course| (course.title.clone(), course))
                .collect(),
        }
    }

    /// The catalog shipped with the app.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_courses())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

impl CourseCatalog for StaticCatalog {
    fn lookup(&self, title: &str) -> Option<&CatalogCourse> {
        self.courses.get(title)
    }

    fn titles(&self) -> Vec<&str> {
        self.courses.keys().map(String::as_str).collect()
    }
}

fn lessons(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

fn builtin_courses() -> Vec<CatalogCourse> {
    vec![
        CatalogCourse {
            title: crate::seed::INTRO_PROGRAMMING.to_owned(),
            instructor: "Dr. Sarah Chen".into(),
            duration: "8 weeks".into(),
            level: CourseLevel::Beginner,
            category: "Computer Science".into(),
            rating: 4.8,
            students: 12_450,
            thumbnail: "thumbnails/intro-programming.jpg".into(),
            video_url: "videos/intro-programming/01.mp4".into(),
            lessons: lessons(&[
                "Welcome & Setup",
                "Variables and Types",
                "Control Flow",
                "Functions",
                "Collections",
                "Error Handling",
                "Modules",
                "Final Project",
            ]),
            resources: lessons(&["Course Syllabus", "Cheat Sheet", "Practice Problems"]),
        },
        CatalogCourse {
            title: crate::seed::DATA_STRUCTURES.to_owned(),
            instructor: "Prof. Michael Torres".into(),
            duration: "10 weeks".into(),
            level: CourseLevel::Intermediate,
            category: "Computer Science".into(),
            rating: 4.7,
            students: 8_320,
            thumbnail: "thumbnails/dsa.jpg".into(),
            video_url: "videos/dsa/01.mp4".into(),
            lessons: lessons(&[
                "Complexity Analysis",
                "Arrays and Strings",
                "Linked Lists",
                "Stacks and Queues",
                "Trees",
                "Graphs",
                "Sorting",
                "Dynamic Programming",
                "Review",
                "Mock Interview",
            ]),
            resources: lessons(&["Big-O Reference", "Visualizer Links", "Problem Set"]),
        },
        CatalogCourse {
            title: "Web Development Essentials".into(),
            instructor: "Emma Rodriguez".into(),
            duration: "6 weeks".into(),
            level: CourseLevel::Beginner,
            category: "Web Development".into(),
            rating: 4.6,
            students: 15_780,
            thumbnail: "thumbnails/web-essentials.jpg".into(),
            video_url: "videos/web-essentials/01.mp4".into(),
            lessons: lessons(&[
                "How the Web Works",
                "HTML Structure",
                "Styling with CSS",
                "Layouts",
                "JavaScript Basics",
                "Deploying a Site",
            ]),
            resources: lessons(&["HTML Reference", "CSS Tricks", "Starter Template"]),
        },
        CatalogCourse {
            title: "Machine Learning Foundations".into(),
            instructor: "Dr. James Park".into(),
            duration: "12 weeks".into(),
            level: CourseLevel::Advanced,
            category: "Data Science".into(),
            rating: 4.9,
            students: 6_210,
            thumbnail: "thumbnails/ml.jpg".into(),
            video_url: "videos/ml/01.mp4".into(),
            lessons: lessons(&[
                "Linear Algebra Refresher",
                "Regression",
                "Classification",
                "Model Evaluation",
                "Neural Networks",
                "Capstone",
            ]),
            resources: lessons(&["Math Notes", "Dataset Pack", "Notebook Templates"]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn builtin_catalog_covers_seeded_courses() {
        let catalog = StaticCatalog::builtin();
        for course in seed::enrolled_courses() {
            assert!(catalog.lookup(&course.title).is_some(), "{}", course.title);
        }
    }

    #[test]
    fn enrollment_starts_at_first_lesson() {
        let catalog = StaticCatalog::builtin();
        let entry = catalog.lookup("Web Development Essentials").unwrap();
        let enrolled = entry.to_enrollment();
        assert_eq!(enrolled.progress, 0);
        assert_eq!(enrolled.next_lesson, "How the Web Works");
    }

    #[test]
    fn unknown_title_is_absent() {
        assert!(StaticCatalog::builtin().lookup("Underwater Basket Weaving").is_none());
    }
}
