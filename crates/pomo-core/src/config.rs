//! Cycle configuration
//!
//! A [`CycleConfig`] holds the four numbers that drive a pomodoro cycle:
//! work, short rest and long rest durations in seconds, and how many work
//! stages make up one long cycle. Values come from a [`Preset`], optionally
//! overridden by a JSON config file and then by command line flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be a positive number of seconds")]
    ZeroDuration { field: &'static str },

    #[error("cycles must be at least 1")]
    ZeroCycles,

    #[error("Unknown preset: {0} (expected pomodoro, deep or quick)")]
    UnknownPreset(String),

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Validated cycle configuration
///
/// Every field is positive. The only way to build one is through
/// [`CycleConfig::new`] (or a [`Preset`]), so a countdown can never start at
/// zero or cycle forever without a long rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleConfig {
    work: u32,
    short_rest: u32,
    long_rest: u32,
    cycles: u32,
}

impl CycleConfig {
    /// Create a configuration, rejecting zero durations and counts
    pub fn new(
        work: u32,
        short_rest: u32,
        long_rest: u32,
        cycles: u32,
    ) -> Result<Self, ConfigError> {
        if work == 0 {
            return Err(ConfigError::ZeroDuration { field: "work" });
        }
        if short_rest == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "short_rest",
            });
        }
        if long_rest == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "long_rest",
            });
        }
        if cycles == 0 {
            return Err(ConfigError::ZeroCycles);
        }

        Ok(Self {
            work,
            short_rest,
            long_rest,
            cycles,
        })
    }

    /// Work stage duration in seconds
    pub fn work(&self) -> u32 {
        self.work
    }

    /// Short rest duration in seconds
    pub fn short_rest(&self) -> u32 {
        self.short_rest
    }

    /// Long rest duration in seconds
    pub fn long_rest(&self) -> u32 {
        self.long_rest
    }

    /// Number of work stages per long rest
    pub fn cycles(&self) -> u32 {
        self.cycles
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

/// Built-in cycle presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Pomodoro: 25 min work, 5 min short rest, 15 min long rest every 4
    #[default]
    Pomodoro,
    /// Deep: 90 min work, 20 min short rest, 30 min long rest every 2
    Deep,
    /// Quick: 15 min work, 3 min short rest, 10 min long rest every 4
    Quick,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Pomodoro => "pomodoro",
            Preset::Deep => "deep",
            Preset::Quick => "quick",
        }
    }

    /// Get a description of this preset
    pub fn description(&self) -> &'static str {
        match self {
            Preset::Pomodoro => "Sustainable rhythm, good for maintenance work",
            Preset::Deep => "Maximum depth, for complex problems",
            Preset::Quick => "Fast iteration, for small tasks",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Preset::Pomodoro, Preset::Deep, Preset::Quick]
    }

    /// The cycle configuration for this preset
    pub fn config(&self) -> CycleConfig {
        let (work, short_rest, long_rest, cycles) = match self {
            Preset::Pomodoro => (25, 5, 15, 4),
            Preset::Deep => (90, 20, 30, 2),
            Preset::Quick => (15, 3, 10, 4),
        };

        CycleConfig {
            work: work * 60,
            short_rest: short_rest * 60,
            long_rest: long_rest * 60,
            cycles,
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pomodoro" => Ok(Preset::Pomodoro),
            "deep" => Ok(Preset::Deep),
            "quick" => Ok(Preset::Quick),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A partial configuration, as read from a config file or given on the
/// command line. Unset fields fall through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub preset: Option<Preset>,
    pub work: Option<u32>,
    pub short_rest: Option<u32>,
    pub long_rest: Option<u32>,
    pub cycles: Option<u32>,
}

impl ConfigOverrides {
    /// Load overrides from a JSON file. A missing file yields no overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layer `other` on top of `self`; fields set in `other` win
    pub fn merge(self, other: ConfigOverrides) -> Self {
        Self {
            preset: other.preset.or(self.preset),
            work: other.work.or(self.work),
            short_rest: other.short_rest.or(self.short_rest),
            long_rest: other.long_rest.or(self.long_rest),
            cycles: other.cycles.or(self.cycles),
        }
    }

    /// Resolve against the selected preset and validate
    pub fn resolve(&self) -> Result<CycleConfig, ConfigError> {
        let base = self.preset.unwrap_or_default().config();

        CycleConfig::new(
            self.work.unwrap_or(base.work),
            self.short_rest.unwrap_or(base.short_rest),
            self.long_rest.unwrap_or(base.long_rest),
            self.cycles.unwrap_or(base.cycles),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_new_accepts_positive_values() {
        let config = CycleConfig::new(2, 1, 3, 2).unwrap();
        assert_eq!(config.work(), 2);
        assert_eq!(config.short_rest(), 1);
        assert_eq!(config.long_rest(), 3);
        assert_eq!(config.cycles(), 2);
    }

    #[test]
    fn test_new_rejects_zero_fields() {
        let err = CycleConfig::new(0, 1, 1, 1).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDuration { field: "work" }));

        let err = CycleConfig::new(1, 0, 1, 1).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDuration { field } if field == "short_rest"));

        let err = CycleConfig::new(1, 1, 0, 1).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDuration { field } if field == "long_rest"));

        let err = CycleConfig::new(1, 1, 1, 0).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroCycles));
    }

    #[test]
    fn test_preset_defaults() {
        let pomodoro = Preset::Pomodoro.config();
        assert_eq!(pomodoro.work(), 1500);
        assert_eq!(pomodoro.short_rest(), 300);
        assert_eq!(pomodoro.long_rest(), 900);
        assert_eq!(pomodoro.cycles(), 4);

        assert_eq!(Preset::Deep.config().work(), 5400);
        assert_eq!(Preset::Quick.config().short_rest(), 180);
        assert_eq!(Preset::default(), Preset::Pomodoro);
        assert_eq!(CycleConfig::default(), pomodoro);
    }

    #[test]
    fn test_preset_from_str() {
        for preset in Preset::all() {
            assert_eq!(preset.as_str().parse::<Preset>().unwrap(), *preset);
        }
        assert_eq!("DEEP".parse::<Preset>().unwrap(), Preset::Deep);

        let err = "marathon".parse::<Preset>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPreset(name) if name == "marathon"));
    }

    #[test]
    fn test_merge_prefers_upper_layer() {
        let file = ConfigOverrides {
            preset: Some(Preset::Deep),
            work: Some(100),
            cycles: Some(3),
            ..Default::default()
        };
        let cli = ConfigOverrides {
            work: Some(50),
            ..Default::default()
        };

        let merged = file.merge(cli);
        assert_eq!(
            merged,
            ConfigOverrides {
                preset: Some(Preset::Deep),
                work: Some(50),
                short_rest: None,
                long_rest: None,
                cycles: Some(3),
            }
        );

        let config = merged.resolve().unwrap();
        assert_eq!(config.work(), 50);
        assert_eq!(config.short_rest(), 1200);
        assert_eq!(config.long_rest(), 1800);
        assert_eq!(config.cycles(), 3);
    }

    #[test]
    fn test_resolve_validates() {
        let overrides = ConfigOverrides {
            long_rest: Some(0),
            ..Default::default()
        };
        let err = overrides.resolve().unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDuration { field } if field == "long_rest"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let overrides = ConfigOverrides::load(&path).unwrap();
        assert_eq!(overrides, ConfigOverrides::default());
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let json = r#"{ "preset": "quick", "long_rest": 1200 }"#;
        fs::write(&path, json).unwrap();

        let overrides = ConfigOverrides::load(&path).unwrap();
        assert_eq!(overrides.preset, Some(Preset::Quick));
        assert_eq!(overrides.long_rest, Some(1200));

        let config = overrides.resolve().unwrap();
        assert_eq!(config.work(), 900);
        assert_eq!(config.long_rest(), 1200);
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        fs::write(&path, r#"{ "work": "soon" }"#).unwrap();
        let err = ConfigOverrides::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        fs::write(&path, r#"{ "wrok": 10 }"#).unwrap();
        let err = ConfigOverrides::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
