//! Engine Configuration
//!
//! Tunables for fitting, contrast, resizing and scoring. Every field has a
//! default, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::color::{PRIMARY_TEXT_CONTRAST, SECONDARY_TEXT_CONTRAST};
use crate::formats::AdFormat;
use crate::typography::{FitParams, DEFAULT_FILL_RATIO, DEFAULT_STEP};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypographyConfig {
    pub step: f64,
    pub headline_min_size: f64,
    pub body_min_size: f64,
    pub cta_min_size: f64,
    pub fill_ratio: f64,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            headline_min_size: 32.0,
            body_min_size: 14.0,
            cta_min_size: 16.0,
            fill_ratio: DEFAULT_FILL_RATIO,
        }
    }
}

impl TypographyConfig {
    pub fn fit_params(&self) -> FitParams {
        FitParams {
            step: self.step,
            fill_ratio: self.fill_ratio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContrastConfig {
    pub primary_min: f64,
    pub secondary_min: f64,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            primary_min: PRIMARY_TEXT_CONTRAST,
            secondary_min: SECONDARY_TEXT_CONTRAST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResizeConfig {
    /// Aspect ratios closer than this are resized proportionally, without a crop.
    pub aspect_epsilon: f64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self { aspect_epsilon: 1e-3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityConfig {
    pub pass_threshold: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self { pass_threshold: 85 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub engine_min_version: String,
    pub typography: TypographyConfig,
    pub contrast: ContrastConfig,
    pub resize: ResizeConfig,
    pub quality: QualityConfig,
    pub default_formats: Vec<AdFormat>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_min_version: "1.0.0".to_string(),
            typography: TypographyConfig::default(),
            contrast: ContrastConfig::default(),
            resize: ResizeConfig::default(),
            quality: QualityConfig::default(),
            default_formats: AdFormat::DEFAULT_SET.to_vec(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&raw)?;
        tracing::debug!(path = %path.display(), "engine config loaded");
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.typography;
        if t.step <= 0.0 {
            return Err(ConfigError::Invalid(format!("typography.step must be positive, got {}", t.step)));
        }
        if !(t.fill_ratio > 0.0 && t.fill_ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "typography.fillRatio must be in (0, 1], got {}",
                t.fill_ratio
            )));
        }
        for (name, size) in [
            ("headlineMinSize", t.headline_min_size),
            ("bodyMinSize", t.body_min_size),
            ("ctaMinSize", t.cta_min_size),
        ] {
            if size <= 0.0 {
                return Err(ConfigError::Invalid(format!("typography.{name} must be positive, got {size}")));
            }
        }
        if t.body_min_size > t.headline_min_size {
            return Err(ConfigError::Invalid(format!(
                "typography.bodyMinSize {} exceeds headlineMinSize {}",
                t.body_min_size, t.headline_min_size
            )));
        }
        for (name, ratio) in [
            ("primaryMin", self.contrast.primary_min),
            ("secondaryMin", self.contrast.secondary_min),
        ] {
            if !(1.0..=21.0).contains(&ratio) {
                return Err(ConfigError::Invalid(format!("contrast.{name} must be in [1, 21], got {ratio}")));
            }
        }
        if self.resize.aspect_epsilon < 0.0 {
            return Err(ConfigError::Invalid("resize.aspectEpsilon must not be negative".into()));
        }
        if self.quality.pass_threshold > 100 {
            return Err(ConfigError::Invalid(format!(
                "quality.passThreshold must be at most 100, got {}",
                self.quality.pass_threshold
            )));
        }
        semver::Version::parse(&self.engine_min_version).map_err(|e| {
            ConfigError::Invalid(format!("engineMinVersion {:?}: {e}", self.engine_min_version))
        })?;
        Ok(())
    }
}
