//! Scene configuration.
//!
//! A scene file is TOML:
//!
//! ```toml
//! archive = "assets"
//!
//! [canvas]
//! width = 640
//! height = 480
//! background = 0xFF000000
//!
//! [limits]
//! max_pixels = 1048576
//!
//! [[elements]]
//! name = "backgrounds/hall.xmg"
//!
//! [[elements]]
//! name = "props/lamp.xmg"
//! x = 412
//! y = 96
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use xmg_codec::Limits;
use xmg_common::Point;

/// Errors from loading or validating a scene configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Complete scene configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory that member names are resolved against.
    #[serde(default = "default_archive")]
    pub archive: PathBuf,
    /// Canvas the elements are drawn onto.
    #[serde(default)]
    pub canvas: CanvasConfig,
    /// Decode limits applied to every element.
    #[serde(default)]
    pub limits: Limits,
    /// Elements in drawing order, first at the back.
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
}

fn default_archive() -> PathBuf {
    PathBuf::from(".")
}

/// Canvas configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: u32,
    #[serde(default = "default_canvas_height")]
    pub height: u32,
    /// Fill color in packed `A|B|G|R` form.
    #[serde(default = "default_background")]
    pub background: u32,
}

fn default_canvas_width() -> u32 {
    640
}

fn default_canvas_height() -> u32 {
    480
}

fn default_background() -> u32 {
    0xFF00_0000 // opaque black
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            background: default_background(),
        }
    }
}

/// One element placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementConfig {
    /// Archive member name.
    pub name: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

impl ElementConfig {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive: default_archive(),
            canvas: CanvasConfig::default(),
            limits: Limits::default(),
            elements: Vec::new(),
        }
    }
}

impl Config {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse and validate a TOML scene description.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML, [`ConfigError::Invalid`] if
    /// validation fails.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a scene file.
    ///
    /// A relative `archive` path is resolved against the file's directory.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Self::from_toml(&text)?;
        if config.archive.is_relative() {
            if let Some(dir) = path.parent() {
                config.archive = dir.join(&config.archive);
            }
        }
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.archive.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "Archive path cannot be empty".to_string(),
            ));
        }

        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Canvas size {}x{} must be non-zero",
                self.canvas.width, self.canvas.height
            )));
        }

        self.limits
            .check_dimensions(self.canvas.width, self.canvas.height)
            .map_err(|e| ConfigError::Invalid(format!("Canvas too large: {}", e)))?;

        if let Some(index) = self.elements.iter().position(|e| e.name.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "Element {} has an empty name",
                index
            )));
        }

        Ok(())
    }
}

/// Builder for creating a `Config`.
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the archive directory.
    #[must_use]
    pub fn archive(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.archive = root.into();
        self
    }

    /// Sets the canvas size.
    #[must_use]
    pub fn canvas(mut self, width: u32, height: u32) -> Self {
        self.config.canvas.width = width;
        self.config.canvas.height = height;
        self
    }

    /// Sets the canvas fill color.
    #[must_use]
    pub fn background(mut self, color: u32) -> Self {
        self.config.canvas.background = color;
        self
    }

    #[must_use]
    pub fn limits(mut self, limits: Limits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Appends an element on top of those already added.
    #[must_use]
    pub fn element(mut self, name: impl Into<String>, x: i32, y: i32) -> Self {
        self.config.elements.push(ElementConfig {
            name: name.into(),
            x,
            y,
        });
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
