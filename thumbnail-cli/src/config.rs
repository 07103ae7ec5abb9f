// ABOUTME: Configuration file loading, validation, and hierarchical merging for gcode-thumbs
// ABOUTME: Supports TOML config files with XDG Base Directory specification compliance

use crate::constants::defaults;
use anyhow::{Context, Result, anyhow};
use gcode_thumbnails::sizes::{ThumbnailEntry, parse_thumbnail_list};
use gcode_thumbnails::{CodecConfig, PngCompression, ThumbnailFormat};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    /// e.g. "16x16, 220x124/QOI"
    #[serde(default, deserialize_with = "validate_sizes")]
    pub sizes: Option<String>,
    #[serde(default, deserialize_with = "validate_format")]
    pub format: Option<String>,
    #[serde(default)]
    pub jpeg_quality: Option<u8>,
    #[serde(default, deserialize_with = "validate_png_compression")]
    pub png_compression: Option<String>,
    #[serde(default)]
    pub preserve_aspect_ratio: Option<bool>,
}

/// Config with every field filled in from defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub entries: Vec<ThumbnailEntry>,
    pub format: ThumbnailFormat,
    pub codec: CodecConfig,
    pub preserve_aspect_ratio: bool,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        let paths = Self::get_config_paths();
        Self::load_from_paths(&paths.iter().map(|p| p.as_str()).collect::<Vec<_>>())
    }

    /// Load configuration from specific file paths, lowest precedence first
    pub fn load_from_paths(paths: &[&str]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            if !Path::new(path).exists() {
                continue;
            }
            let file_config = Self::load_from_file(path)?;
            log::debug!("Loaded config from {}", path);
            config = config.merge(file_config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Standard config file paths, lowest precedence first
    pub fn get_config_paths() -> Vec<String> {
        let mut paths = Vec::new();

        // User config directory fallback
        if let Some(home_dir) = dirs::home_dir() {
            let path = home_dir
                .join(".config")
                .join("gcode-thumbs")
                .join("config.toml");
            paths.push(path.to_string_lossy().to_string());
        }

        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            let path = PathBuf::from(config_home)
                .join("gcode-thumbs")
                .join("config.toml");
            paths.push(path.to_string_lossy().to_string());
        }

        // Project-specific config wins
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(
                current_dir
                    .join("gcode-thumbs.toml")
                    .to_string_lossy()
                    .to_string(),
            );
        }

        paths.dedup();
        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            sizes: other.sizes.or(self.sizes),
            format: other.format.or(self.format),
            jpeg_quality: other.jpeg_quality.or(self.jpeg_quality),
            png_compression: other.png_compression.or(self.png_compression),
            preserve_aspect_ratio: other.preserve_aspect_ratio.or(self.preserve_aspect_ratio),
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(quality) = self.jpeg_quality {
            if !(1..=100).contains(&quality) {
                return Err(anyhow!(
                    "Invalid jpeg_quality {}. Must be between 1 and 100",
                    quality
                ));
            }
        }

        Ok(())
    }

    /// Fill unset fields with defaults
    pub fn resolve(&self) -> Result<Settings> {
        let sizes = self.sizes.as_deref().unwrap_or(defaults::SIZES);
        let entries = parse_thumbnail_list(sizes).context("Invalid thumbnail sizes")?;

        let format = match &self.format {
            Some(name) => name.parse()?,
            None => ThumbnailFormat::default(),
        };

        let png_compression = match self.png_compression.as_deref() {
            Some("fast") => PngCompression::Fast,
            Some("best") => PngCompression::Best,
            Some("default") | None => PngCompression::Default,
            Some(other) => {
                return Err(anyhow!(
                    "Invalid png_compression '{}'. Must be one of: fast, default, best",
                    other
                ));
            }
        };

        Ok(Settings {
            entries,
            format,
            codec: CodecConfig::builder()
                .jpeg_quality(self.jpeg_quality.unwrap_or(defaults::JPEG_QUALITY))
                .png_compression(png_compression)
                .build(),
            preserve_aspect_ratio: self.preserve_aspect_ratio.unwrap_or(true),
        })
    }
}

// Custom deserializer for thumbnail size list validation
fn validate_sizes<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;

    if let Some(ref sizes) = value {
        parse_thumbnail_list(sizes)
            .map_err(|e| D::Error::custom(format!("Invalid sizes '{}': {}", sizes, e)))?;
    }
    Ok(value)
}

// Custom deserializer for format validation
fn validate_format<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;

    if let Some(ref format) = value {
        if format.parse::<ThumbnailFormat>().is_err() {
            return Err(D::Error::custom(format!(
                "Invalid format '{}'. Must be one of: PNG, JPG, QOI",
                format
            )));
        }
    }
    Ok(value)
}

fn validate_png_compression<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;

    match value.as_deref() {
        None | Some("fast") | Some("default") | Some("best") => Ok(value),
        Some(other) => Err(D::Error::custom(format!(
            "Invalid png_compression '{}'. Must be one of: fast, default, best",
            other
        ))),
    }
}
