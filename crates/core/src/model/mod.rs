mod achievement;
mod auth;
mod badges;
mod course;
mod group;
mod ids;
mod preferences;
mod profile;
mod schedule;

pub use ids::{AchievementId, GroupId, ParseIdError, SessionId};

pub use achievement::Achievement;
pub use auth::AuthSession;
pub use badges::SidebarBadgeCounts;
pub use course::{CourseLevel, EnrolledCourse, LessonKey};
pub use group::{GroupMember, GroupStats, MemberRole, StudyGroup};
pub use preferences::{
    AppearanceSettings, AppearanceSettingsPatch, FontSize, NotificationSettings,
    NotificationSettingsPatch, PrivacySettings, PrivacySettingsPatch, ProfileVisibility,
    SESSION_TIMEOUT_RANGE, SecuritySettings, SecuritySettingsPatch, Theme,
};
pub use profile::{ProfilePatch, UserProfile, XP_PER_LEVEL, level_for_xp};
pub use schedule::{MAX_SESSION_MINUTES, NewScheduledSession, ScheduledSession};
