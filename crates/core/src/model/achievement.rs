use serde::{Deserialize, Serialize};

use crate::model::ids::AchievementId;

/// A badge the learner works toward.
///
/// `is_earned` never reverts to false and `current_steps` never decreases.
/// Both are enforced by [`Achievement::earned`] and [`Achievement::with_progress`],
/// the only transitions the user slice applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: AchievementId,
    pub title: String,
    pub description: String,
    pub is_earned: bool,
    pub current_steps: u32,
    pub total_steps: u32,
    pub points: u32,
}

impl Achievement {
    #[must_use]
    pub fn new(
        id: impl Into<AchievementId>,
        title: impl Into<String>,
        description: impl Into<String>,
        total_steps: u32,
        points: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            is_earned: false,
            current_steps: 0,
            total_steps: total_steps.max(1),
            points,
        }
    }

    /// Fraction complete in `[0, 1]`.
    #[must_use]
    pub fn progress_ratio(&self) -> f64 {
        if self.is_earned {
            return 1.0;
        }
        if self.total_steps == 0 {
            return 0.0;
        }
        (f64::from(self.current_steps) / f64::from(self.total_steps)).min(1.0)
    }

    /// Marks the achievement earned and fills its steps.
    ///
    /// Returns `None` if it was already earned.
    #[must_use]
    pub fn earned(&self) -> Option<Self> {
        if self.is_earned {
            return None;
        }
        Some(Self {
            is_earned: true,
            current_steps: self.current_steps.max(self.total_steps),
            ..self.clone()
        })
    }

    /// Raises `current_steps` toward `steps`, capped at `total_steps`.
    ///
    /// Lower values are ignored. Reaching `total_steps` earns the achievement.
    /// Returns `None` if nothing changes.
    #[must_use]
    pub fn with_progress(&self, steps: u32) -> Option<Self> {
        let current_steps = self.current_steps.max(steps.min(self.total_steps));
        let is_earned = self.is_earned || current_steps >= self.total_steps;
        if current_steps == self.current_steps && is_earned == self.is_earned {
            return None;
        }
        Some(Self {
            current_steps,
            is_earned,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Achievement {
        Achievement::new("streak", "Streak", "Study 7 days in a row", 7, 150)
    }

    #[test]
    fn progress_is_monotonic() {
        let a = sample().with_progress(4).unwrap();
        assert_eq!(a.current_steps, 4);
        assert!(a.with_progress(2).is_none());
        assert!(a.with_progress(4).is_none());
    }

    #[test]
    fn progress_is_capped_and_earns_at_total() {
        let a = sample().with_progress(99).unwrap();
        assert_eq!(a.current_steps, 7);
        assert!(a.is_earned);
    }

    #[test]
    fn earning_twice_is_a_no_op() {
        let a = sample().earned().unwrap();
        assert!(a.is_earned);
        assert_eq!(a.current_steps, 7);
        assert!(a.earned().is_none());
    }

    #[test]
    fn earned_achievement_ignores_lower_progress() {
        let a = sample().earned().unwrap();
        assert!(a.with_progress(0).is_none());
        assert_eq!(a.progress_ratio(), 1.0);
    }
}
