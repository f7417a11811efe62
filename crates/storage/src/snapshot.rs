//! Versioned codec for the persisted slice of state.
//!
//! The blob is JSON under a single storage key:
//!
//! ```json
//! { "version": 1, "courses": { "enrolled": [...], "lessonCompletion": [...],
//!   "resourceFavorites": {...}, "sidebarBadgeCounts": {...} } }
//! ```
//!
//! Reads fail soft: anything that does not decode cleanly as the current
//! version is treated as if nothing had been stored.

use std::collections::{BTreeMap, BTreeSet};

use learn_core::model::{EnrolledCourse, LessonKey, SidebarBadgeCounts};
use learn_core::state::CourseState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::{KeyValueStore, StorageError};

/// Version written by this build. Blobs with any other version are ignored.
pub const SCHEMA_VERSION: u32 = 1;

/// Storage key used unless the caller configures another.
pub const DEFAULT_STATE_KEY: &str = "learning-progress-state";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("snapshot is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("snapshot carries no schema version")]
    Unversioned,

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

#[derive(Deserialize)]
struct VersionTag {
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRecord {
    version: u32,
    courses: CourseRecord,
}

/// Persisted shape of the course slice.
///
/// Lesson completion is stored as a list because its composite key cannot be
/// a JSON object key.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseRecord {
    #[serde(default)]
    enrolled: Vec<EnrolledCourse>,
    #[serde(default)]
    lesson_completion: Vec<LessonRecord>,
    #[serde(default)]
    resource_favorites: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    sidebar_badge_counts: SidebarBadgeCounts,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LessonRecord {
    course_title: String,
    lesson_index: u32,
    completed: bool,
}

impl CourseRecord {
    fn from_state(state: &CourseState) -> Self {
        Self {
            enrolled: state.enrolled.clone(),
            lesson_completion: state
                .lesson_completion
                .iter()
                .map(|(key, completed)| LessonRecord {
                    course_title: key.course_title.clone(),
                    lesson_index: key.lesson_index,
                    completed: *completed,
                })
                .collect(),
            resource_favorites: state.resource_favorites.clone(),
            sidebar_badge_counts: state.sidebar_badges.clone(),
        }
    }

    /// Convert back into state, re-establishing the slice's invariants:
    /// unique titles and no empty favorite sets.
    fn into_state(self) -> CourseState {
        let mut state = CourseState {
            enrolled: self
                .enrolled
                .iter()
                .filter_map(EnrolledCourse::normalized)
                .collect(),
            lesson_completion: self
                .lesson_completion
                .into_iter()
                .map(|r| (LessonKey::new(r.course_title, r.lesson_index), r.completed))
                .collect(),
            resource_favorites: self
                .resource_favorites
                .into_iter()
                .filter(|(_, set)| !set.is_empty())
                .collect(),
            sidebar_badges: self.sidebar_badge_counts,
        };
        state.dedup_enrolled();
        state
    }
}

//
// ─── CODEC ─────────────────────────────────────────────────────────────────────
//

/// Serialize the persisted slice.
///
/// # Errors
///
/// Returns `CodecError::Corrupt` if serialization fails.
pub fn encode(state: &CourseState) -> Result<Vec<u8>, CodecError> {
    let record = SnapshotRecord {
        version: SCHEMA_VERSION,
        courses: CourseRecord::from_state(state),
    };
    Ok(serde_json::to_vec(&record)?)
}

/// Deserialize a blob written by [`encode`].
///
/// # Errors
///
/// Returns `CodecError` for invalid JSON, a missing or zero version, or a
/// version other than [`SCHEMA_VERSION`].
pub fn decode(bytes: &[u8]) -> Result<CourseState, CodecError> {
    let tag: VersionTag = serde_json::from_slice(bytes)?;
    match tag.version {
        0 => return Err(CodecError::Unversioned),
        SCHEMA_VERSION => {}
        other => return Err(CodecError::UnsupportedVersion(other)),
    }
    let record: SnapshotRecord = serde_json::from_slice(bytes)?;
    Ok(record.courses.into_state())
}

/// Read the snapshot under `key`.
///
/// Never fails: a missing key, an unreadable backend, or a blob that does not
/// decode all yield `None`, with the cause logged.
pub async fn load(store: &dyn KeyValueStore, key: &str) -> Option<CourseState> {
    let bytes = match store.get(key).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            tracing::debug!(key, "no stored snapshot");
            return None;
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "snapshot read failed; starting from defaults");
            return None;
        }
    };
    match decode(&bytes) {
        Ok(state) => Some(state),
        Err(err) => {
            tracing::warn!(key, error = %err, "discarding unreadable snapshot");
            None
        }
    }
}

/// Encode and write the snapshot under `key`.
///
/// # Errors
///
/// Returns `SnapshotError` if encoding fails or the backend rejects the write.
pub async fn save(
    store: &dyn KeyValueStore,
    key: &str,
    state: &CourseState,
) -> Result<(), SnapshotError> {
    let bytes = encode(state)?;
    store.set(key, &bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> CourseState {
        let mut state = CourseState::seeded();
        state
            .lesson_completion
            .insert(LessonKey::new("Introduction to Programming", 0), true);
        state
            .lesson_completion
            .insert(LessonKey::new("Introduction to Programming", 1), false);
        state.resource_favorites.insert(
            "Introduction to Programming".into(),
            BTreeSet::from(["Cheat Sheet".to_owned()]),
        );
        state.sidebar_badges = SidebarBadgeCounts::new().with("messages", 4);
        state
    }

    #[test]
    fn encode_then_decode_preserves_state() {
        let state = populated();
        let bytes = encode(&state).unwrap();
        assert_eq!(decode(&bytes).unwrap(), state);
    }

    #[test]
    fn missing_or_zero_version_is_unversioned() {
        assert!(matches!(
            decode(br#"{"courses":{}}"#),
            Err(CodecError::Unversioned)
        ));
        assert!(matches!(
            decode(br#"{"version":0,"courses":{}}"#),
            Err(CodecError::Unversioned)
        ));
    }

    #[test]
    fn future_version_is_rejected() {
        assert!(matches!(
            decode(br#"{"version":7,"courses":{}}"#),
            Err(CodecError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn garbage_is_corrupt() {
        assert!(matches!(decode(b"\x00\xffnot json"), Err(CodecError::Corrupt(_))));
        assert!(matches!(decode(b"[1,2,3]"), Err(CodecError::Corrupt(_))));
    }

    #[test]
    fn missing_fields_decode_as_empty() {
        let state = decode(br#"{"version":1,"courses":{}}"#).unwrap();
        assert_eq!(state, CourseState::default());
    }

    #[test]
    fn decode_restores_title_uniqueness() {
        let raw = br#"{"version":1,"courses":{"enrolled":[{"title":"A"},{"title":"A "},{"title":""}]}}"#;
        let state = decode(raw).unwrap();
        assert_eq!(state.enrolled.len(), 1);
    }
}
