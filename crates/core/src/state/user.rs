use std::sync::Arc;

use crate::model::{
    Achievement, AchievementId, AppearanceSettings, GroupId, GroupMember, MemberRole,
    NotificationSettings, PrivacySettings, SecuritySettings, StudyGroup, UserProfile,
};
use crate::seed;

use super::intent::UserIntent;

/// Profile, preferences, achievements and study-group membership.
#[derive(Debug, Clone, PartialEq)]
pub struct UserState {
    pub profile: UserProfile,
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
    pub security: SecuritySettings,
    pub appearance: AppearanceSettings,
    pub achievements: Vec<Achievement>,
    pub study_groups: Vec<StudyGroup>,
}

impl UserState {
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            profile: seed::profile(),
            notifications: NotificationSettings::default(),
            privacy: PrivacySettings::default(),
            security: SecuritySettings::default(),
            appearance: AppearanceSettings::default(),
            achievements: seed::achievements(),
            study_groups: seed::study_groups(),
        }
    }

    #[must_use]
    pub fn achievement(&self, id: &AchievementId) -> Option<&Achievement> {
        self.achievements.iter().find(|a| &a.id == id)
    }

    #[must_use]
    pub fn group(&self, id: &GroupId) -> Option<&StudyGroup> {
        self.study_groups.iter().find(|g| &g.id == id)
    }

    fn self_member(&self, role: MemberRole) -> GroupMember {
        GroupMember {
            email: self.profile.email.clone(),
            name: self.profile.name.clone(),
            role,
        }
    }
}

impl Default for UserState {
    fn default() -> Self {
        Self::seeded()
    }
}

/// User slice reducer. Returns `state` itself (same `Arc`) when nothing changes.
#[must_use]
pub fn reduce(state: &Arc<UserState>, intent: &UserIntent) -> Arc<UserState> {
    let next = match intent {
        UserIntent::UpdateProfile(patch) => update_profile(state, patch),
        UserIntent::UpdateNotificationSettings(patch) => {
            patch.apply(&state.notifications).map(|notifications| UserState {
                notifications,
                ..(**state).clone()
            })
        }
        UserIntent::UpdatePrivacySettings(patch) => {
            patch.apply(&state.privacy).map(|privacy| UserState {
                privacy,
                ..(**state).clone()
            })
        }
        UserIntent::UpdateSecuritySettings(patch) => {
            patch.apply(&state.security).map(|security| UserState {
                security,
                ..(**state).clone()
            })
        }
        UserIntent::ToggleTwoFactor => {
            let mut next = (**state).clone();
            next.security.two_factor_enabled = !next.security.two_factor_enabled;
            Some(next)
        }
        UserIntent::UpdateAppearanceSettings(patch) => {
            patch.apply(&state.appearance).map(|appearance| UserState {
                appearance,
                ..(**state).clone()
            })
        }
        UserIntent::SetTheme(theme) => (state.appearance.theme != *theme).then(|| {
            let mut next = (**state).clone();
            next.appearance.theme = *theme;
            next
        }),
        UserIntent::EarnAchievement(id) => update_achievement(state, id, Achievement::earned),
        UserIntent::UpdateAchievementProgress { id, current_steps } => {
            update_achievement(state, id, |a| a.with_progress(*current_steps))
        }
        UserIntent::JoinStudyGroup(id) => {
            let member = state.self_member(MemberRole::Member);
            update_group(state, id, |g| g.joined_by(member))
        }
        UserIntent::LeaveStudyGroup(id) => {
            let email = state.profile.email.clone();
            update_group(state, id, |g| g.left_by(&email))
        }
        UserIntent::CreateStudyGroup(group) => create_group(state, group),
        UserIntent::AddXp(amount) => add_xp(state, *amount),
        UserIntent::ResetUserState => {
            let seeded = UserState::seeded();
            (**state != seeded).then_some(seeded)
        }
    };
    next.map_or_else(|| Arc::clone(state), Arc::new)
}

fn update_profile(state: &UserState, patch: &crate::model::ProfilePatch) -> Option<UserState> {
    let profile = patch.apply(&state.profile)?;
    let previous_email = state.profile.email.as_str();
    let mut next = UserState {
        profile,
        ..state.clone()
    };

    // memberships are keyed by email; keep ours pointing at the current identity
    let (email, name) = (next.profile.email.clone(), next.profile.name.clone());
    for group in &mut next.study_groups {
        for member in &mut group.members {
            if member.email == previous_email {
                member.email.clone_from(&email);
                member.name.clone_from(&name);
            }
        }
    }
    Some(next)
}

fn update_achievement(
    state: &UserState,
    id: &AchievementId,
    transition: impl FnOnce(&Achievement) -> Option<Achievement>,
) -> Option<UserState> {
    let index = state.achievements.iter().position(|a| &a.id == id)?;
    let current = &state.achievements[index];
    let updated = transition(current)?;

    let mut next = state.clone();
    if updated.is_earned && !current.is_earned {
        next.profile = next.profile.with_xp_added(u64::from(updated.points));
    }
    next.achievements[index] = updated;
    Some(next)
}

fn update_group(
    state: &UserState,
    id: &GroupId,
    transition: impl FnOnce(&StudyGroup) -> Option<StudyGroup>,
) -> Option<UserState> {
    let index = state.study_groups.iter().position(|g| &g.id == id)?;
    let updated = transition(&state.study_groups[index])?;
    let mut next = state.clone();
    next.study_groups[index] = updated;
    Some(next)
}

fn create_group(state: &UserState, group: &StudyGroup) -> Option<UserState> {
    let mut group = group.normalized()?;
    if state.group(&group.id).is_some() {
        return None;
    }
    let owner = state.self_member(MemberRole::Owner);
    group.members.retain(|m| m.email != owner.email);
    group.members.insert(0, owner);
    group.is_joined = true;

    let mut next = state.clone();
    next.study_groups.push(group);
    Some(next)
}

fn add_xp(state: &UserState, amount: i64) -> Option<UserState> {
    let amount = u64::try_from(amount).ok().filter(|a| *a > 0)?;
    Some(UserState {
        profile: state.profile.with_xp_added(amount),
        ..state.clone()
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
