use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named sidebar counters (e.g. `"messages" -> 3`).
///
/// Written wholesale from outside the store and read back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SidebarBadgeCounts(BTreeMap<String, u32>);

impl SidebarBadgeCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> u32 {
        self.0.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, count: u32) -> Self {
        self.0.insert(name.into(), count);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().map(|count| u64::from(*count)).sum()
    }
}

impl FromIterator<(String, u32)> for SidebarBadgeCounts {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
