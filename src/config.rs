use crate::action::Polarity;
use crate::error::ConfigError;
use crate::gesture::{Axis, GestureConfig, MotionSampler, SelectionPolicy};
use crate::keys::KeyScheme;
use crate::source::DEFAULT_LANDMARK_INDEX;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gesture: GestureSettings,
    #[serde(default)]
    pub sampler: SamplerSettings,
    #[serde(default)]
    pub keys: KeySettings,
}

// ============================================================================
// Gesture
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureSettings {
    /// Normalized travel along the axis needed for a swipe (0-1]
    #[serde(default = "default_min_displacement")]
    pub min_displacement: f64,
    /// Seconds within which the travel must happen
    #[serde(default = "default_max_duration")]
    pub max_duration: f64,
    /// Seconds after a swipe before the next may start
    #[serde(default = "default_cooldown")]
    pub cooldown: f64,
    #[serde(default)]
    pub axis: Axis,
    /// Reject swipes whose cross-axis travel exceeds this multiple of the
    /// on-axis travel. Unset accepts any angle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_off_axis_ratio: Option<f64>,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            min_displacement: default_min_displacement(),
            max_duration: default_max_duration(),
            cooldown: default_cooldown(),
            axis: Axis::default(),
            max_off_axis_ratio: None,
        }
    }
}

fn default_min_displacement() -> f64 {
    0.15
}

fn default_max_duration() -> f64 {
    0.6
}

fn default_cooldown() -> f64 {
    0.8
}

// ============================================================================
// Sampler
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerSettings {
    #[serde(default)]
    pub policy: SelectionPolicy,
    /// Detections below this confidence are ignored
    #[serde(default)]
    pub min_confidence: f64,
    /// Reference point when the tracker reports a full hand skeleton
    #[serde(default = "default_landmark_index")]
    pub landmark_index: usize,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            policy: SelectionPolicy::default(),
            min_confidence: 0.0,
            landmark_index: default_landmark_index(),
        }
    }
}

fn default_landmark_index() -> usize {
    DEFAULT_LANDMARK_INDEX
}

// ============================================================================
// Keys
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeySettings {
    #[serde(default)]
    pub scheme: KeyScheme,
    /// Swap which swipe direction means "next"
    #[serde(default)]
    pub invert: bool,
    /// Log key presses instead of sending them
    #[serde(default)]
    pub dry_run: bool,
}

impl KeySettings {
    pub fn polarity(&self) -> Polarity {
        Polarity::from_invert(self.invert)
    }
}

impl Config {
    /// Load from `path`, or from `config.toml` in the working directory if it
    /// exists. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };

        if !required && !path.exists() {
            return Ok(Config::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Validated detector thresholds.
    pub fn gesture_config(&self) -> Result<GestureConfig, ConfigError> {
        let g = &self.gesture;
        GestureConfig::new(g.min_displacement, g.max_duration, g.cooldown, g.axis)?
            .with_max_off_axis_ratio(g.max_off_axis_ratio)
    }

    pub fn motion_sampler(&self) -> Result<MotionSampler, ConfigError> {
        MotionSampler::new(self.sampler.policy, self.sampler.min_confidence)
    }

    /// Check every section; returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gesture_config()?;
        self.motion_sampler()?;
        Ok(())
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("serializing config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_detector_defaults() {
        let config = Config::default();
        assert_eq!(config.gesture_config().unwrap(), GestureConfig::default());
        assert_eq!(config.sampler.landmark_index, 8);
        assert_eq!(config.keys.scheme, KeyScheme::Arrows);
        assert_eq!(config.keys.polarity(), Polarity::Natural);
    }

    #[test]
    fn test_partial_file() {
        let config: Config = toml::from_str(
            r#"
            [gesture]
            cooldown = 1.2
            axis = "horizontal"

            [keys]
            scheme = "jk"
            invert = true
            "#,
        )
        .unwrap();
        assert_eq!(config.gesture.cooldown, 1.2);
        assert_eq!(config.gesture.min_displacement, 0.15);
        assert_eq!(config.gesture.axis, Axis::Horizontal);
        assert_eq!(config.keys.scheme, KeyScheme::Jk);
        assert_eq!(config.keys.polarity(), Polarity::Inverted);
        assert_eq!(config.sampler, SamplerSettings::default());
    }

    #[test]
    fn test_sampler_policy_names() {
        let config: Config = toml::from_str(
            r#"
            [sampler]
            policy = "nearest"
            min_confidence = 0.6
            "#,
        )
        .unwrap();
        assert_eq!(config.sampler.policy, SelectionPolicy::Nearest);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.gesture.cooldown = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "cooldown",
                ..
            })
        ));

        let mut config = Config::default();
        config.sampler.min_confidence = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "min_confidence",
                ..
            })
        ));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gesture]\nmin_displacement = 0.2").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.gesture.min_displacement, 0.2);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_rejects_unparsable_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gesture]\ncooldown = \"soon\"").unwrap();
        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.gesture.max_off_axis_ratio = Some(0.8);
        let text = config.to_toml().unwrap();
        assert!(text.contains("[gesture]"));
        assert!(text.contains("[keys]"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
