use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    AchievementId, AppearanceSettingsPatch, EnrolledCourse, GroupId, NewScheduledSession,
    NotificationSettingsPatch, PrivacySettingsPatch, ProfilePatch, SecuritySettingsPatch,
    SessionId, SidebarBadgeCounts, StudyGroup, Theme,
};

use super::Slice;

/// Errors produced when decoding an intent from its wire form.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IntentDecodeError {
    #[error("malformed intent: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown intent type {0:?}")]
    UnknownType(String),

    #[error("invalid payload for {intent}: {source}")]
    InvalidPayload {
        intent: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A request to mutate state.
///
/// Each variant wraps the intents of exactly one slice, so routing is decided
/// by the outer variant alone. On the wire every intent is
/// `{"type": "<name>", "payload": ...}` with the camelCase names below.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Intent {
    Course(CourseIntent),
    User(UserIntent),
    Auth(AuthIntent),
    Schedule(ScheduleIntent),
}

impl Intent {
    /// The slice that owns this intent.
    #[must_use]
    pub fn slice(&self) -> Slice {
        match self {
            Intent::Course(_) => Slice::Courses,
            Intent::User(_) => Slice::User,
            Intent::Auth(_) => Slice::Auth,
            Intent::Schedule(_) => Slice::Schedule,
        }
    }

    /// Decode a wire intent.
    ///
    /// # Errors
    ///
    /// Returns `IntentDecodeError::Malformed` for input without a string
    /// `type`, `UnknownType` for names outside the vocabulary, and
    /// `InvalidPayload` when the payload does not fit the named intent.
    pub fn from_json(raw: &str) -> Result<Self, IntentDecodeError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let TypeTag { tag } = TypeTag::deserialize(&value)?;
        let slice =
            slice_for_type(&tag).ok_or_else(|| IntentDecodeError::UnknownType(tag.clone()))?;

        let decoded = match slice {
            Slice::Courses => CourseIntent::deserialize(value).map(Intent::Course),
            Slice::User => UserIntent::deserialize(value).map(Intent::User),
            Slice::Auth => AuthIntent::deserialize(value).map(Intent::Auth),
            Slice::Schedule => ScheduleIntent::deserialize(value).map(Intent::Schedule),
        };
        decoded.map_err(|source| IntentDecodeError::InvalidPayload {
            intent: tag,
            source,
        })
    }

    /// Encode to the wire form accepted by [`Intent::from_json`].
    ///
    /// # Errors
    ///
    /// Returns `IntentDecodeError::Malformed` if serialization fails.
    pub fn to_json(&self) -> Result<String, IntentDecodeError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Deserialize)]
struct TypeTag {
    #[serde(rename = "type")]
    tag: String,
}

const COURSE_TYPES: &[&str] = &[
    "enrollCourse",
    "unenrollCourse",
    "toggleLessonCompletion",
    "toggleResourceFavorite",
    "setSidebarBadgeCounts",
    "resetCourseProgress",
];

const USER_TYPES: &[&str] = &[
    "updateProfile",
    "updateNotificationSettings",
    "updatePrivacySettings",
    "updateSecuritySettings",
    "toggleTwoFactor",
    "updateAppearanceSettings",
    "setTheme",
    "earnAchievement",
    "updateAchievementProgress",
    "joinStudyGroup",
    "leaveStudyGroup",
    "createStudyGroup",
    "addXP",
    "resetUserState",
];

const AUTH_TYPES: &[&str] = &["setAuthenticated", "setLoading", "setError"];

const SCHEDULE_TYPES: &[&str] = &[
    "addScheduledSession",
    "completeScheduledSession",
    "removeScheduledSession",
];

/// Owning slice for a wire intent name.
fn slice_for_type(tag: &str) -> Option<Slice> {
    [
        (Slice::Courses, COURSE_TYPES),
        (Slice::User, USER_TYPES),
        (Slice::Auth, AUTH_TYPES),
        (Slice::Schedule, SCHEDULE_TYPES),
    ]
    .into_iter()
    .find(|(_, names)| names.contains(&tag))
    .map(|(slice, _)| slice)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum CourseIntent {
    EnrollCourse(EnrolledCourse),
    UnenrollCourse(String),
    ToggleLessonCompletion {
        course_title: String,
        lesson_index: u32,
    },
    ToggleResourceFavorite {
        course_title: String,
        resource_name: String,
    },
    SetSidebarBadgeCounts(SidebarBadgeCounts),
    ResetCourseProgress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum UserIntent {
    UpdateProfile(ProfilePatch),
    UpdateNotificationSettings(NotificationSettingsPatch),
    UpdatePrivacySettings(PrivacySettingsPatch),
    UpdateSecuritySettings(SecuritySettingsPatch),
    ToggleTwoFactor,
    UpdateAppearanceSettings(AppearanceSettingsPatch),
    SetTheme(Theme),
    EarnAchievement(AchievementId),
    UpdateAchievementProgress {
        id: AchievementId,
        current_steps: u32,
    },
    JoinStudyGroup(GroupId),
    LeaveStudyGroup(GroupId),
    CreateStudyGroup(StudyGroup),
    #[serde(rename = "addXP")]
    AddXp(i64),
    ResetUserState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum AuthIntent {
    SetAuthenticated(bool),
    SetLoading(bool),
    SetError(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ScheduleIntent {
    AddScheduledSession(NewScheduledSession),
    CompleteScheduledSession(SessionId),
    RemoveScheduledSession(SessionId),
}

impl From<CourseIntent> for Intent {
    fn from(intent: CourseIntent) -> Self {
        Intent::Course(intent)
    }
}

impl From<UserIntent> for Intent {
    fn from(intent: UserIntent) -> Self {
        Intent::User(intent)
    }
}

impl From<AuthIntent> for Intent {
    fn from(intent: AuthIntent) -> Self {
        Intent::Auth(intent)
    }
}

impl From<ScheduleIntent> for Intent {
    fn from(intent: ScheduleIntent) -> Self {
        Intent::Schedule(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_struct_payloads_with_camel_case_fields() {
        let raw = r#"{"type":"toggleLessonCompletion","payload":{"courseTitle":"A","lessonIndex":2}}"#;
        let intent = Intent::from_json(raw).unwrap();
        assert_eq!(
            intent,
            Intent::Course(CourseIntent::ToggleLessonCompletion {
                course_title: "A".into(),
                lesson_index: 2,
            })
        );
        assert_eq!(intent.slice(), Slice::Courses);
    }

    #[test]
    fn decodes_unit_intents_without_payload() {
        let intent = Intent::from_json(r#"{"type":"toggleTwoFactor"}"#).unwrap();
        assert_eq!(intent, Intent::User(UserIntent::ToggleTwoFactor));
    }

    #[test]
    fn add_xp_keeps_its_wire_name() {
        let intent = Intent::from_json(r#"{"type":"addXP","payload":120}"#).unwrap();
        assert_eq!(intent, Intent::User(UserIntent::AddXp(120)));
        assert_eq!(
            intent.to_json().unwrap(),
            r#"{"type":"addXP","payload":120}"#
        );
    }

    #[test]
    fn routes_auth_and_schedule_intents() {
        let auth = Intent::from_json(r#"{"type":"setError","payload":null}"#).unwrap();
        assert_eq!(auth.slice(), Slice::Auth);

        let raw = r#"{"type":"completeScheduledSession","payload":4}"#;
        let schedule = Intent::from_json(raw).unwrap();
        assert_eq!(schedule.slice(), Slice::Schedule);
    }

    #[test]
    fn rejects_unknown_tags_and_bad_payloads() {
        assert!(matches!(
            Intent::from_json(r#"{"type":"launchRocket"}"#),
            Err(IntentDecodeError::UnknownType(tag)) if tag == "launchRocket"
        ));
        assert!(matches!(
            Intent::from_json(r#"{"type":"addXP","payload":"lots"}"#),
            Err(IntentDecodeError::InvalidPayload { intent, .. }) if intent == "addXP"
        ));
        assert!(matches!(
            Intent::from_json("not json"),
            Err(IntentDecodeError::Malformed(_))
        ));
        assert!(matches!(
            Intent::from_json(r#"{"payload":1}"#),
            Err(IntentDecodeError::Malformed(_))
        ));
    }

    #[test]
    fn payload_error_names_the_offending_field() {
        let raw = r#"{"type":"toggleLessonCompletion","payload":{"courseTitle":"A"}}"#;
        let err = Intent::from_json(raw).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("toggleLessonCompletion"), "{message}");
        assert!(message.contains("lessonIndex"), "{message}");
    }

    #[test]
    fn every_known_type_routes_to_its_slice() {
        let tables = [
            (Slice::Courses, COURSE_TYPES),
            (Slice::User, USER_TYPES),
            (Slice::Auth, AUTH_TYPES),
            (Slice::Schedule, SCHEDULE_TYPES),
        ];
        for (slice, names) in tables {
            for name in names {
                assert_eq!(slice_for_type(name), Some(slice));
                let raw = format!(r#"{{"type":"{name}"}}"#);
                assert!(!matches!(
                    Intent::from_json(&raw),
                    Err(IntentDecodeError::UnknownType(_))
                ));
            }
        }
    }

    #[test]
    fn encoded_names_are_known_types() {
        let intents: [Intent; 4] = [
            CourseIntent::ResetCourseProgress.into(),
            UserIntent::ResetUserState.into(),
            AuthIntent::SetLoading(true).into(),
            ScheduleIntent::RemoveScheduledSession(SessionId::new(1)).into(),
        ];
        for intent in intents {
            let json = intent.to_json().unwrap();
            assert_eq!(Intent::from_json(&json).unwrap(), intent);
        }
    }
}
