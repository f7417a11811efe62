use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// XP needed to advance one level.
pub const XP_PER_LEVEL: u64 = 1_000;

/// Level reached with the given XP total. Levels start at 1.
#[must_use]
pub fn level_for_xp(total_xp: u64) -> u32 {
    u32::try_from(total_xp / XP_PER_LEVEL)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

/// Learner identity plus gamification counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: String,
    pub location: Option<String>,
    pub timezone: String,
    pub locale: String,
    pub join_date: NaiveDate,
    pub last_active: Option<DateTime<Utc>>,
    pub total_xp: u64,
    pub current_level: u32,
    pub global_rank: Option<u32>,
}

impl UserProfile {
    /// Returns a copy with `amount` XP added and the level recomputed.
    #[must_use]
    pub fn with_xp_added(&self, amount: u64) -> Self {
        let total_xp = self.total_xp.saturating_add(amount);
        Self {
            total_xp,
            current_level: level_for_xp(total_xp),
            ..self.clone()
        }
    }
}

/// Partial profile update. `None` leaves a field untouched.
///
/// XP, level and rank are not patchable here; XP only moves through
/// `addXP` and earned achievements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub timezone: Option<String>,
    pub locale: Option<String>,
    pub last_active: Option<DateTime<Utc>>,
}

impl ProfilePatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the patch to `profile`.
    ///
    /// Blank names and emails are ignored, since a profile always carries both.
    /// Blank avatar/location clear the field. Returns `None` when nothing
    /// would change.
    #[must_use]
    pub fn apply(&self, profile: &UserProfile) -> Option<UserProfile> {
        let mut next = profile.clone();

        if let Some(name) = normalize_optional(self.name.clone()) {
            next.name = name;
        }
        if let Some(email) = normalize_optional(self.email.clone()) {
            next.email = email;
        }
        if let Some(avatar) = self.avatar.clone() {
            next.avatar = normalize_optional(Some(avatar));
        }
        if let Some(bio) = &self.bio {
            next.bio = bio.trim().to_owned();
        }
        if let Some(location) = self.location.clone() {
            next.location = normalize_optional(Some(location));
        }
        if let Some(timezone) = normalize_optional(self.timezone.clone()) {
            next.timezone = timezone;
        }
        if let Some(locale) = normalize_optional(self.locale.clone()) {
            next.locale = locale;
        }
        if let Some(at) = self.last_active {
            // lastActive only moves forward
            if next.last_active.is_none_or(|prev| at > prev) {
                next.last_active = Some(at);
            }
        }

        (next != *profile).then_some(next)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
