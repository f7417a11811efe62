use serde::{Deserialize, Serialize};

use crate::model::ids::GroupId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberRole {
    Owner,
    Moderator,
    #[default]
    Member,
}

/// A member of a study group, keyed by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub email: String,
    pub name: String,
    pub role: MemberRole,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub total_meetings: u32,
    /// Mean attendance percentage, 0..=100.
    pub avg_attendance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGroup {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub members: Vec<GroupMember>,
    #[serde(default)]
    pub is_joined: bool,
    #[serde(default)]
    pub stats: GroupStats,
}

impl StudyGroup {
    #[must_use]
    pub fn has_member(&self, email: &str) -> bool {
        self.members.iter().any(|m| m.email == email)
    }

    /// Join as `member`. Returns `None` if already joined with that membership.
    #[must_use]
    pub fn joined_by(&self, member: GroupMember) -> Option<Self> {
        if self.is_joined && self.has_member(&member.email) {
            return None;
        }
        let mut next = self.clone();
        next.is_joined = true;
        if !next.has_member(&member.email) {
            next.members.push(member);
        }
        Some(next)
    }

    /// Leave, dropping the membership record for `email`.
    ///
    /// Returns `None` if not joined and no such membership exists.
    #[must_use]
    pub fn left_by(&self, email: &str) -> Option<Self> {
        if !self.is_joined && !self.has_member(email) {
            return None;
        }
        let mut next = self.clone();
        next.is_joined = false;
        next.members.retain(|m| m.email != email);
        Some(next)
    }

    /// Copy of an externally supplied group with sanitized stats.
    #[must_use]
    pub fn normalized(&self) -> Option<Self> {
        let name = self.name.trim();
        if self.id.as_str().trim().is_empty() || name.is_empty() {
            return None;
        }
        let avg_attendance = if self.stats.avg_attendance.is_finite() {
            self.stats.avg_attendance.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Some(Self {
            name: name.to_owned(),
            stats: GroupStats {
                total_meetings: self.stats.total_meetings,
                avg_attendance,
            },
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> StudyGroup {
        StudyGroup {
            id: GroupId::new("g1"),
            name: "Algorithms Circle".into(),
            description: String::new(),
            subject: "CS".into(),
            members: vec![GroupMember {
                email: "owner@example.com".into(),
                name: "Owner".into(),
                role: MemberRole::Owner,
            }],
            is_joined: false,
            stats: GroupStats::default(),
        }
    }

    fn me() -> GroupMember {
        GroupMember {
            email: "me@example.com".into(),
            name: "Me".into(),
            role: MemberRole::Member,
        }
    }

    #[test]
    fn join_then_leave_restores_membership() {
        let original = group();
        let joined = original.joined_by(me()).unwrap();
        assert!(joined.is_joined);
        assert_eq!(joined.members.len(), 2);
        assert!(joined.joined_by(me()).is_none());

        let left = joined.left_by("me@example.com").unwrap();
        assert_eq!(left, original);
        assert!(left.left_by("me@example.com").is_none());
    }

    #[test]
    fn normalized_rejects_blank_names_and_clamps_attendance() {
        let mut g = group();
        g.stats.avg_attendance = 140.0;
        assert_eq!(g.normalized().unwrap().stats.avg_attendance, 100.0);

        g.name = "  ".into();
        assert!(g.normalized().is_none());
    }
}
