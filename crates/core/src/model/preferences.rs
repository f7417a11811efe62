use serde::{Deserialize, Serialize};

//
// ─── ENUMS ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileVisibility {
    #[default]
    Public,
    StudyGroups,
    Private,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub course_updates: bool,
    pub study_reminders: bool,
    pub achievement_alerts: bool,
    pub group_activity: bool,
    pub weekly_digest: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: true,
            course_updates: true,
            study_reminders: true,
            achievement_alerts: true,
            group_activity: false,
            weekly_digest: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub profile_visibility: ProfileVisibility,
    pub show_progress: bool,
    pub show_achievements: bool,
    pub allow_messages: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            profile_visibility: ProfileVisibility::Public,
            show_progress: true,
            show_achievements: true,
            allow_messages: true,
        }
    }
}

/// Bounds for the idle session timeout, in minutes.
pub const SESSION_TIMEOUT_RANGE: std::ops::RangeInclusive<u32> = 5..=1_440;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    pub two_factor_enabled: bool,
    pub login_alerts: bool,
    pub session_timeout_minutes: u32,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            two_factor_enabled: false,
            login_alerts: true,
            session_timeout_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    pub theme: Theme,
    pub font_size: FontSize,
    pub reduced_motion: bool,
    pub compact_mode: bool,
}

//
// ─── PATCHES ───────────────────────────────────────────────────────────────────
//

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettingsPatch {
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub course_updates: Option<bool>,
    pub study_reminders: Option<bool>,
    pub achievement_alerts: Option<bool>,
    pub group_activity: Option<bool>,
    pub weekly_digest: Option<bool>,
}

impl NotificationSettingsPatch {
    /// Returns the patched settings, or `None` if nothing changes.
    #[must_use]
    pub fn apply(&self, current: &NotificationSettings) -> Option<NotificationSettings> {
        let mut next = current.clone();
        set(&mut next.email_notifications, self.email_notifications);
        set(&mut next.push_notifications, self.push_notifications);
        set(&mut next.course_updates, self.course_updates);
        set(&mut next.study_reminders, self.study_reminders);
        set(&mut next.achievement_alerts, self.achievement_alerts);
        set(&mut next.group_activity, self.group_activity);
        set(&mut next.weekly_digest, self.weekly_digest);
        (next != *current).then_some(next)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacySettingsPatch {
    pub profile_visibility: Option<ProfileVisibility>,
    pub show_progress: Option<bool>,
    pub show_achievements: Option<bool>,
    pub allow_messages: Option<bool>,
}

impl PrivacySettingsPatch {
    /// Returns the patched settings, or `None` if nothing changes.
    #[must_use]
    pub fn apply(&self, current: &PrivacySettings) -> Option<PrivacySettings> {
        let mut next = current.clone();
        set(&mut next.profile_visibility, self.profile_visibility);
        set(&mut next.show_progress, self.show_progress);
        set(&mut next.show_achievements, self.show_achievements);
        set(&mut next.allow_messages, self.allow_messages);
        (next != *current).then_some(next)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecuritySettingsPatch {
    pub two_factor_enabled: Option<bool>,
    pub login_alerts: Option<bool>,
    pub session_timeout_minutes: Option<u32>,
}

impl SecuritySettingsPatch {
    /// Returns the patched settings, or `None` if nothing changes.
    ///
    /// The session timeout is clamped into [`SESSION_TIMEOUT_RANGE`].
    #[must_use]
    pub fn apply(&self, current: &SecuritySettings) -> Option<SecuritySettings> {
        let mut next = current.clone();
        set(&mut next.two_factor_enabled, self.two_factor_enabled);
        set(&mut next.login_alerts, self.login_alerts);
        set(
            &mut next.session_timeout_minutes,
            self.session_timeout_minutes.map(|minutes| {
                minutes.clamp(*SESSION_TIMEOUT_RANGE.start(), *SESSION_TIMEOUT_RANGE.end())
            }),
        );
        (next != *current).then_some(next)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppearanceSettingsPatch {
    pub theme: Option<Theme>,
    pub font_size: Option<FontSize>,
    pub reduced_motion: Option<bool>,
    pub compact_mode: Option<bool>,
}

impl AppearanceSettingsPatch {
    /// Returns the patched settings, or `None` if nothing changes.
    #[must_use]
    pub fn apply(&self, current: &AppearanceSettings) -> Option<AppearanceSettings> {
        let mut next = current.clone();
        set(&mut next.theme, self.theme);
        set(&mut next.font_size, self.font_size);
        set(&mut next.reduced_motion, self.reduced_motion);
        set(&mut next.compact_mode, self.compact_mode);
        (next != *current).then_some(next)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
