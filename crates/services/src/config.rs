use std::time::Duration;

use storage::DEFAULT_STATE_KEY;

pub const STATE_KEY_ENV: &str = "LEARN_STATE_KEY";
pub const SAVE_DEBOUNCE_ENV: &str = "LEARN_SAVE_DEBOUNCE_MS";

/// Default quiet period before a scheduled snapshot is written.
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Tunables for a [`crate::Store`] backed by durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key the persisted slice is stored under.
    pub storage_key: String,
    /// How long the writer waits for further commits before saving.
    /// Zero writes as soon as the writer task runs.
    pub save_debounce: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STATE_KEY.to_owned(),
            save_debounce: DEFAULT_SAVE_DEBOUNCE,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    #[must_use]
    pub fn with_save_debounce(mut self, debounce: Duration) -> Self {
        self.save_debounce = debounce;
        self
    }

    /// Defaults overridden by `LEARN_STATE_KEY` and `LEARN_SAVE_DEBOUNCE_MS`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`StoreConfig::from_env`], reading variables through `lookup`.
    ///
    /// Unusable values are logged and the default is kept.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(key) = lookup(STATE_KEY_ENV) {
            let key = key.trim();
            if key.is_empty() {
                tracing::warn!(var = STATE_KEY_ENV, "blank storage key; using default");
            } else {
                config.storage_key = key.to_owned();
            }
        }

        if let Some(raw) = lookup(SAVE_DEBOUNCE_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(millis) => config.save_debounce = Duration::from_millis(millis),
                Err(err) => {
                    tracing::warn!(var = SAVE_DEBOUNCE_ENV, value = %raw, error = %err, "invalid debounce; using default");
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn unset_variables_keep_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[]));
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.storage_key, "learning-progress-state");
        assert_eq!(config.save_debounce, Duration::from_millis(250));
    }

    #[test]
    fn variables_override_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[
            (STATE_KEY_ENV, " alt-key "),
            (SAVE_DEBOUNCE_ENV, "0"),
        ]));
        assert_eq!(config.storage_key, "alt-key");
        assert!(config.save_debounce.is_zero());
    }

    #[test]
    fn unusable_values_fall_back_to_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[
            (STATE_KEY_ENV, "  "),
            (SAVE_DEBOUNCE_ENV, "soon"),
        ]));
        assert_eq!(config, StoreConfig::default());
    }
}
