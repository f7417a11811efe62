use std::sync::Arc;

use crate::model::{ScheduledSession, SessionId};

use super::intent::ScheduleIntent;

/// Planned study sessions. Ids come from `next_id`, which only grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleState {
    pub sessions: Vec<ScheduledSession>,
    pub next_id: u64,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self {
            sessions: Vec::new(),
            next_id: 1,
        }
    }
}

impl ScheduleState {
    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<&ScheduledSession> {
        self.sessions.iter().find(|s| s.id == id)
    }
}

/// Schedule slice reducer. Returns `state` itself (same `Arc`) when nothing changes.
#[must_use]
pub fn reduce(state: &Arc<ScheduleState>, intent: &ScheduleIntent) -> Arc<ScheduleState> {
    let next = match intent {
        ScheduleIntent::AddScheduledSession(draft) => {
            let id = SessionId::new(state.next_id);
            draft.clone().into_session(id).map(|session| {
                let mut next = (**state).clone();
                next.sessions.push(session);
                next.next_id = state.next_id.saturating_add(1);
                next
            })
        }
        ScheduleIntent::CompleteScheduledSession(id) => state
            .sessions
            .iter()
            .position(|s| s.id == *id && !s.completed)
            .map(|index| {
                let mut next = (**state).clone();
                next.sessions[index].completed = true;
                next
            }),
        ScheduleIntent::RemoveScheduledSession(id) => {
            state.session(*id).is_some().then(|| {
                let mut next = (**state).clone();
                next.sessions.retain(|s| s.id != *id);
                next
            })
        }
    };
    next.map_or_else(|| Arc::clone(state), Arc::new)
}
