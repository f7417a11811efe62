//! Defaults every slice starts from when no snapshot is restored, and that
//! the reset intents restore.

use chrono::NaiveDate;

use crate::model::{
    Achievement, CourseLevel, EnrolledCourse, GroupId, GroupMember, GroupStats, MemberRole,
    StudyGroup, UserProfile,
};

pub const INTRO_PROGRAMMING: &str = "Introduction to Programming";
pub const DATA_STRUCTURES: &str = "Data Structures & Algorithms";

/// The two preset enrollments a fresh install starts with.
#[must_use]
pub fn enrolled_courses() -> Vec<EnrolledCourse> {
    vec![
        EnrolledCourse {
            title: INTRO_PROGRAMMING.into(),
            instructor: "Dr. Sarah Chen".into(),
            duration: "8 weeks".into(),
            students: 12_450,
            rating: 4.8,
            progress: 35,
            thumbnail: "thumbnails/intro-programming.jpg".into(),
            level: CourseLevel::Beginner,
            category: "Computer Science".into(),
            video_url: "videos/intro-programming/01.mp4".into(),
            next_lesson: "Control Flow".into(),
        },
        EnrolledCourse {
            title: DATA_STRUCTURES.into(),
            instructor: "Prof. Michael Torres".into(),
            duration: "10 weeks".into(),
            students: 8_320,
            rating: 4.7,
            progress: 10,
            thumbnail: "thumbnails/dsa.jpg".into(),
            level: CourseLevel::Intermediate,
            category: "Computer Science".into(),
            video_url: "videos/dsa/01.mp4".into(),
            next_lesson: "Arrays and Strings".into(),
        },
    ]
}

#[must_use]
pub fn profile() -> UserProfile {
    UserProfile {
        name: "New Learner".into(),
        email: "learner@example.com".into(),
        avatar: None,
        bio: String::new(),
        location: None,
        timezone: "UTC".into(),
        locale: "en-US".into(),
        join_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default(),
        last_active: None,
        total_xp: 0,
        current_level: 1,
        global_rank: None,
    }
}

#[must_use]
pub fn achievements() -> Vec<Achievement> {
    vec![
        Achievement::new("first-steps", "First Steps", "Complete your first lesson", 1, 50),
        Achievement::new("week-warrior", "Week Warrior", "Study 7 days in a row", 7, 150),
        Achievement::new(
            "knowledge-seeker",
            "Knowledge Seeker",
            "Complete 25 lessons",
            25,
            300,
        ),
        Achievement::new("team-player", "Team Player", "Join 3 study groups", 3, 100),
        Achievement::new("perfect-score", "Perfect Score", "Ace 5 quizzes", 5, 250),
    ]
}

fn member(email: &str, name: &str, role: MemberRole) -> GroupMember {
    GroupMember {
        email: email.into(),
        name: name.into(),
        role,
    }
}

#[must_use]
pub fn study_groups() -> Vec<StudyGroup> {
    vec![
        StudyGroup {
            id: GroupId::new("algorithms-circle"),
            name: "Algorithms Circle".into(),
            description: "Weekly problem solving for interview prep".into(),
            subject: DATA_STRUCTURES.into(),
            members: vec![
                member("maya@example.com", "Maya Patel", MemberRole::Owner),
                member("lee@example.com", "Lee Wong", MemberRole::Moderator),
                member("sam@example.com", "Sam Okafor", MemberRole::Member),
            ],
            is_joined: false,
            stats: GroupStats {
                total_meetings: 24,
                avg_attendance: 85.0,
            },
        },
        StudyGroup {
            id: GroupId::new("first-code"),
            name: "First Code Club".into(),
            description: "Beginners pairing through their first programs".into(),
            subject: INTRO_PROGRAMMING.into(),
            members: vec![
                member("ana@example.com", "Ana Silva", MemberRole::Owner),
                member("jo@example.com", "Jo Kim", MemberRole::Member),
            ],
            is_joined: false,
            stats: GroupStats {
                total_meetings: 12,
                avg_attendance: 72.0,
            },
        },
        StudyGroup {
            id: GroupId::new("ml-reading"),
            name: "ML Reading Group".into(),
            description: "One paper a week, discussed on Fridays".into(),
            subject: "Machine Learning Foundations".into(),
            members: vec![member("ravi@example.com", "Ravi Nair", MemberRole::Owner)],
            is_joined: false,
            stats: GroupStats {
                total_meetings: 8,
                avg_attendance: 91.0,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seeded_titles_are_unique() {
        let titles: HashSet<_> = enrolled_courses().into_iter().map(|c| c.title).collect();
        assert_eq!(titles.len(), 2);
    }

    #[test]
    fn seeded_profile_is_level_one_without_xp() {
        let profile = profile();
        assert_eq!(profile.total_xp, 0);
        assert_eq!(profile.current_level, 1);
    }

    #[test]
    fn no_seeded_achievement_starts_earned() {
        assert!(achievements().iter().all(|a| !a.is_earned));
    }
}
