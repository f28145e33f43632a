//! Game settings
//!
//! Injected into `Game::new`. Persisted separately from high scores.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;
use crate::tuning::Tuning;

/// Snowman name pools. One enemy is generated per name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameConfig {
    pub male: Vec<String>,
    pub female: Vec<String>,
}

impl Default for NameConfig {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
        Self {
            male: owned(&["Frosty", "Jack", "Snowball"]),
            female: owned(&["Snowflake", "Crystal", "Ivy"]),
        }
    }
}

impl NameConfig {
    /// Total number of names (and therefore enemies)
    pub fn len(&self) -> usize {
        self.male.len() + self.female.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enemy name pools
    pub names: NameConfig,
    /// Balance values
    pub tuning: Tuning,
    /// Lives at the start of each run
    pub starting_lives: u32,
    /// Level RNG seed (host clock when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            names: NameConfig::default(),
            tuning: Tuning::default(),
            starting_lives: 3,
            seed: None,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "winter_platformer_settings";

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt settings: {e}");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unavailable ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Load settings, writing the defaults out on first run so they can be
    /// edited in place
    pub fn load_or_init(store: &mut dyn KeyValueStore) -> Self {
        let first_run = matches!(store.get(Self::STORAGE_KEY), Ok(None));
        let settings = Self::load(store);
        if first_run {
            settings.save(store);
        }
        settings
    }

    /// Save settings (failures are logged)
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let result = serde_json::to_string(self)
            .map_err(Into::into)
            .and_then(|json| store.set(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::error!("Failed to save settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_default_name_pool() {
        let names = NameConfig::default();
        assert_eq!(names.len(), 6);
        assert!(names.male.contains(&"Frosty".to_string()));
        assert!(names.female.contains(&"Ivy".to_string()));
    }

    #[test]
    fn test_missing_settings_use_defaults() {
        let store = MemoryStore::new();
        let settings = Settings::load(&store);
        assert_eq!(settings.starting_lives, 3);
        assert_eq!(settings.names, NameConfig::default());
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let mut store = MemoryStore::new();
        let settings = Settings::load_or_init(&mut store);
        assert_eq!(settings.starting_lives, 3);

        let json = store.get(Settings::STORAGE_KEY).unwrap().unwrap();
        let saved: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(saved.names, NameConfig::default());
        assert_eq!(saved.tuning, Tuning::default());
    }

    #[test]
    fn test_existing_settings_are_not_overwritten() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{ broken").unwrap();
        let settings = Settings::load_or_init(&mut store);
        assert_eq!(settings.starting_lives, 3);
        assert_eq!(
            store.get(Settings::STORAGE_KEY).unwrap().as_deref(),
            Some("{ broken")
        );
    }

    #[test]
    fn test_partial_settings_merge_with_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(
                Settings::STORAGE_KEY,
                r#"{ "names": { "male": ["Olaf"] }, "seed": 7 }"#,
            )
            .unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.names.male, vec!["Olaf".to_string()]);
        // Absent pool falls back to the built-in one
        assert_eq!(settings.names.female, NameConfig::default().female);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.tuning, Tuning::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.starting_lives = 5;
        settings.save(&mut store);
        assert_eq!(Settings::load(&store).starting_lives, 5);
    }

    #[test]
    fn test_corrupt_settings_use_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "][").unwrap();
        assert_eq!(Settings::load(&store).starting_lives, 3);
    }
}
