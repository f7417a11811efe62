use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {raw:?}")]
pub struct ParseIdError {
    kind: &'static str,
    raw: String,
}

/// String ids are slugs: non-empty, no interior whitespace, stored trimmed.
macro_rules! slug_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                        raw: s.to_owned(),
                    });
                }
                Ok(Self(trimmed.to_owned()))
            }
        }
    };
}

slug_id! {
    /// Achievement slug, e.g. `"first-steps"`.
    AchievementId
}

slug_id! {
    GroupId
}

/// Scheduled-session id, handed out by the schedule slice's counter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_start_matches('#')
            .parse::<u64>()
            .map(SessionId)
            .map_err(|_| ParseIdError {
                kind: "SessionId",
                raw: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_achievement_id_display() {
        let id = AchievementId::new("first-steps");
        assert_eq!(id.to_string(), "first-steps");
    }

    #[test]
    fn test_achievement_id_from_str_trims() {
        let id: AchievementId = "  week-warrior ".parse().unwrap();
        assert_eq!(id, AchievementId::new("week-warrior"));
    }

    #[test]
    fn test_group_id_from_str_rejects_blank_and_spaces() {
        assert!("".parse::<GroupId>().is_err());
        let err = "two words".parse::<GroupId>().unwrap_err();
        assert_eq!(err.to_string(), "invalid GroupId: \"two words\"");
    }

    #[test]
    fn test_session_id_from_str() {
        let id: SessionId = "12".parse().unwrap();
        assert_eq!(id, SessionId::new(12));
        assert_eq!(id.to_string().parse::<SessionId>().unwrap(), id);
        assert!("twelve".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&GroupId::new("rustaceans")).unwrap();
        assert_eq!(json, "\"rustaceans\"");
        let json = serde_json::to_string(&SessionId::new(3)).unwrap();
        assert_eq!(json, "3");
    }
}
