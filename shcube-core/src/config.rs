//! Scene configuration loaded from TOML
//!
//! Every field is optional; anything left out falls back to the constants the
//! cube demo has always used.
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub animation: AnimationConfig,
    pub projection: ProjectionConfig,
    pub terminal: TerminalConfig,
}

/// Constants driving the per-frame model and view matrices
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// First damping applied to elapsed seconds
    pub time_scale: f64,
    /// Second damping, applied on top of `time_scale`, feeding the wobble
    pub wobble_scale: f64,
    /// Spin about Y, driven by unscaled elapsed time
    pub spin_degrees_per_second: f64,
    pub model_scale: f32,
    /// The view matrix translates the world by `-camera_distance` along Z
    pub camera_distance: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            time_scale: 0.01,
            wobble_scale: 0.03,
            spin_degrees_per_second: 45.0,
            model_scale: 2.0,
            camera_distance: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Settings only the terminal host reads
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub target_fps: u32,
    /// Width of a character cell relative to its height
    pub pixel_aspect: f32,
    pub log_file: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            pixel_aspect: 0.5,
            log_file: "shcube.log".to_string(),
        }
    }
}

impl SceneConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded scene configuration from {}", path.display());
        Ok(config)
    }
}
