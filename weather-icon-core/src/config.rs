use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    classifier::Classifier,
    features::{
        self, CLOUD_PRESETS, CloudCategory, PRECIPITATION_PRESETS, PrecipCategory, WIND_PRESETS,
        WindCategory,
    },
    icon::IconMode,
    scale::{Bucket, Scale},
};

/// Either the name of a built-in scale or a custom list of buckets.
///
/// Example TOML:
/// ```toml
/// clouds = "metar"
///
/// [[wind]]
/// upper = 10.0
/// phrase = "still"
/// category = "calm"
///
/// [[wind]]
/// phrase = "blowing"
/// category = "strong"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleSetting<C> {
    Preset(String),
    Custom(Vec<Bucket<C>>),
}

impl<C> Default for ScaleSetting<C> {
    fn default() -> Self {
        ScaleSetting::Preset("standard".to_string())
    }
}

impl<C: Clone> ScaleSetting<C> {
    fn resolve(
        &self,
        feature: &str,
        preset: fn(&str) -> Option<Scale<C>>,
        known: &[&str],
    ) -> Result<Scale<C>> {
        match self {
            ScaleSetting::Preset(name) => preset(name).ok_or_else(|| {
                anyhow!(
                    "Unknown {feature} scale '{name}'. Supported scales: {}.",
                    known.join(", ")
                )
            }),
            ScaleSetting::Custom(buckets) => {
                Scale::new(format!("custom {feature}"), buckets.clone())
                    .with_context(|| format!("Invalid custom {feature} scale"))
            }
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// "compatible" keeps the historical icon quirks, "corrected" fixes them.
    pub icon_mode: IconMode,

    pub precipitation: ScaleSetting<PrecipCategory>,
    pub clouds: ScaleSetting<CloudCategory>,
    pub wind: ScaleSetting<WindCategory>,
}

impl Config {
    /// Build the classifier this configuration describes.
    pub fn classifier(&self) -> Result<Classifier> {
        let precipitation = self.precipitation.resolve(
            "precipitation",
            features::precipitation_preset,
            PRECIPITATION_PRESETS,
        )?;
        let clouds = self.clouds.resolve("clouds", features::cloud_preset, CLOUD_PRESETS)?;
        let wind = self.wind.resolve("wind", features::wind_preset, WIND_PRESETS)?;

        Ok(Classifier::new(precipitation, clouds, wind, self.icon_mode))
    }

    pub fn set_precipitation_preset(&mut self, name: &str) {
        self.precipitation = ScaleSetting::Preset(name.to_string());
    }

    pub fn set_cloud_preset(&mut self, name: &str) {
        self.clouds = ScaleSetting::Preset(name.to_string());
    }

    pub fn set_wind_preset(&mut self, name: &str) {
        self.wind = ScaleSetting::Preset(name.to_string());
    }

    /// Load config from the platform config dir, or return defaults if it
    /// doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-icon", "weather-icon")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
