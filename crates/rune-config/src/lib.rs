//! Rune transition configuration
//!
//! Loads transition settings from `rune.toml` and lets environment variables
//! override individual values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors produced while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`RuneConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is outside its allowed range.
    #[error("invalid value for {field}: {value} ({reason})")]
    Invalid {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RuneConfig {
    /// Transition engine settings
    pub transitions: TransitionConfig,
}

/// Settings consumed by the transition manager and its default animators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransitionConfig {
    /// Master switch. When false no animation bindings are created.
    pub enabled: bool,
    /// Animator used by transition rules that do not set one
    pub animator: DefaultAnimator,
    /// Default spring animator settings
    pub spring: SpringConfig,
    /// Default timing animator settings
    pub timing: TimingConfig,
}

/// Which built-in animator a rule without an explicit animator uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DefaultAnimator {
    /// Spring driven by the `[transitions.spring]` section
    #[default]
    Spring,
    /// Fixed duration driven by the `[transitions.timing]` section
    Timing,
}

impl DefaultAnimator {
    fn parse(val: &str) -> Option<Self> {
        match val.to_ascii_lowercase().as_str() {
            "spring" => Some(Self::Spring),
            "timing" => Some(Self::Timing),
            _ => None,
        }
    }
}

/// Damped spring parameters (unit mass).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpringConfig {
    /// Spring stiffness `k`. Natural frequency is `sqrt(k)`.
    pub stiffness: f32,
    /// Damping ratio ζ. Below 1.0 overshoots, 1.0 is critically damped.
    pub damping_ratio: f32,
    /// Remaining fraction of travel under which the spring is at rest.
    pub rest_threshold: f32,
}

/// Duration based animator settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Default duration in milliseconds
    pub duration_ms: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            animator: DefaultAnimator::default(),
            spring: SpringConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 170.0,
            damping_ratio: 1.0,
            rest_threshold: 0.005,
        }
    }
}

impl TransitionConfig {
    /// Check every numeric setting is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spring.validate()?;
        self.timing.validate()
    }
}

impl SpringConfig {
    /// Stiffness, damping ratio and rest threshold must be finite and
    /// positive; otherwise the spring never settles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("transitions.spring.stiffness", self.stiffness)?;
        positive("transitions.spring.damping_ratio", self.damping_ratio)?;
        positive("transitions.spring.rest_threshold", self.rest_threshold)
    }
}

impl TimingConfig {
    /// Duration must be finite and not negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("transitions.timing.duration_ms", self.duration_ms)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            reason: "must be finite and positive",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            reason: "must be finite and not negative",
        })
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { duration_ms: 300.0 }
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl RuneConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text, rejecting out-of-range values
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.transitions.validate()?;
        Ok(config)
    }

    /// Load configuration from `rune.toml` in the current directory,
    /// or return the default configuration if it can't be loaded
    pub fn load_or_default() -> Self {
        Self::load_from_file("rune.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Unparseable or out-of-range values are ignored.
    pub fn merge_with_env(&mut self) {
        self.merge_with(|name| std::env::var(name).ok());
    }

    /// Merge overrides from an arbitrary variable source.
    pub fn merge_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let transitions = &mut self.transitions;

        let number = |name: &str| lookup(name).and_then(|v| v.parse::<f32>().ok());

        if let Some(val) = lookup("RUNE_TRANSITIONS") {
            transitions.enabled = parse_flag(&val);
        }
        if let Some(animator) = lookup("RUNE_TRANSITION_ANIMATOR")
            .as_deref()
            .and_then(DefaultAnimator::parse)
        {
            transitions.animator = animator;
        }
        if let Some(stiffness) = number("RUNE_SPRING_STIFFNESS")
            .filter(|&v| positive("RUNE_SPRING_STIFFNESS", v).is_ok())
        {
            transitions.spring.stiffness = stiffness;
        }
        if let Some(ratio) = number("RUNE_SPRING_DAMPING_RATIO")
            .filter(|&v| positive("RUNE_SPRING_DAMPING_RATIO", v).is_ok())
        {
            transitions.spring.damping_ratio = ratio;
        }
        if let Some(threshold) = number("RUNE_SPRING_REST_THRESHOLD")
            .filter(|&v| positive("RUNE_SPRING_REST_THRESHOLD", v).is_ok())
        {
            transitions.spring.rest_threshold = threshold;
        }
        if let Some(duration) = number("RUNE_TRANSITION_DURATION_MS")
            .filter(|&v| non_negative("RUNE_TRANSITION_DURATION_MS", v).is_ok())
        {
            transitions.timing.duration_ms = duration;
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
