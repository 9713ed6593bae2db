//! File-based settings.
//!
//! ```toml
//! [ga]
//! generation_count = 100
//! population_size = 50
//! crossover_rate = 0.8
//! mutation_rate = 0.02
//! elitism_size = 2
//! invariant = "permutation"
//!
//! [slots]
//! first_hour = 6
//! last_hour = 23
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::format::ScheduleFormatter;
use crate::ga::GaConfig;

/// Broadcast-day layout: one slot per hour, inclusive range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotSettings {
    pub first_hour: u32,
    pub last_hour: u32,
}

impl Default for SlotSettings {
    fn default() -> Self {
        Self {
            first_hour: 6,
            last_hour: 23,
        }
    }
}

impl SlotSettings {
    /// Number of hourly slots.
    pub fn slot_count(&self) -> usize {
        if self.first_hour > self.last_hour {
            return 0;
        }
        (self.last_hour - self.first_hour + 1) as usize
    }

    /// Formatter labelling each slot `HH:00`.
    pub fn formatter(&self) -> Result<ScheduleFormatter> {
        ScheduleFormatter::hourly(self.first_hour, self.last_hour)
    }
}

/// All settings of one optimizer invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ga: GaConfig,
    pub slots: SlotSettings,
}

impl Settings {
    /// Reads and validates a TOML settings file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serializes to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ScheduleError::Configuration(format!("Failed to serialize settings: {e}")))
    }

    /// Writes the settings to `path` as TOML.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Checks the GA parameters and the slot layout.
    pub fn validate(&self) -> Result<()> {
        self.ga.validate()?;
        if self.slots.first_hour > self.slots.last_hour || self.slots.last_hour > 23 {
            return Err(ScheduleError::Configuration(format!(
                "Broadcast hours {}..={} must lie within 0..=23",
                self.slots.first_hour, self.slots.last_hour
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleInvariant;

    #[test]
    fn test_empty_file_gives_defaults() {
        let s = Settings::from_toml_str("").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.slots.slot_count(), 18);
    }

    #[test]
    fn test_partial_overrides() {
        let s = Settings::from_toml_str(
            r#"
            [ga]
            mutation_rate = 0.05
            selection_pool_size = 10
            invariant = "allow_duplicates"

            [slots]
            first_hour = 18
            "#,
        )
        .unwrap();
        assert_eq!(s.ga.mutation_rate, 0.05);
        assert_eq!(s.ga.selection_pool_size, Some(10));
        assert_eq!(s.ga.invariant, ScheduleInvariant::AllowDuplicates);
        assert_eq!(s.ga.crossover_rate, 0.8);
        assert_eq!(s.slots.slot_count(), 6);
        assert_eq!(s.slots.formatter().unwrap().labels()[0], "18:00");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_toml_str("[ga]\ncrossover_rate = 1.5\n").unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration(_)));

        let err = Settings::from_toml_str("[slots]\nfirst_hour = 20\nlast_hour = 8\n").unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration(_)));

        let err = Settings::from_toml_str("[ga]\npopulation_size = \"many\"\n").unwrap_err();
        assert!(matches!(err, ScheduleError::Settings(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let original = Settings {
            ga: GaConfig::default().with_seed(42).with_elitism_size(3),
            slots: SlotSettings {
                first_hour: 8,
                last_hour: 20,
            },
        };
        let text = original.to_toml_string().unwrap();
        assert_eq!(Settings::from_toml_str(&text).unwrap(), original);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("u-broadcast-settings-{}.toml", std::process::id()));
        let original = Settings {
            ga: GaConfig::default()
                .with_selection_pool_size(Some(8))
                .with_invariant(ScheduleInvariant::AllowDuplicates),
            ..Settings::default()
        };
        original.save(&path).unwrap();
        let loaded = Settings::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.unwrap(), original);
    }
}
