//! Demo configuration, stored as RON

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rasterizer::{Filter, Wrap, HEIGHT, WIDTH};

/// Default config path when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "demo.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Which effect the demo shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SceneKind {
    Gradient,
    Sprite,
    Blend,
    DepthTextured,
    #[default]
    CameraTextured,
}

impl SceneKind {
    /// Number of textures the scene binds
    pub fn texture_count(self) -> usize {
        match self {
            SceneKind::Gradient => 0,
            SceneKind::Blend => 3,
            SceneKind::Sprite | SceneKind::DepthTextured | SceneKind::CameraTextured => 1,
        }
    }
}

/// One texture slot. Without a path (or when loading fails) a checkerboard
/// is generated instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub path: Option<String>,
    pub filter: Filter,
    pub wrap_s: Wrap,
    pub wrap_t: Wrap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub clear_color: [f32; 3],
    pub scene: SceneKind,
    pub textures: Vec<TextureConfig>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "softpipe".to_string(),
            width: WIDTH,
            height: HEIGHT,
            clear_color: [0.0, 0.0, 0.0],
            scene: SceneKind::default(),
            textures: Vec::new(),
        }
    }
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DemoConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Load a config from a RON string
pub fn load_config_from_str(s: &str) -> Result<DemoConfig, ConfigError> {
    let mut config: DemoConfig = ron::from_str(s)?;
    config.width = config.width.max(1);
    config.height = config.height.max(1);
    Ok(config)
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &DemoConfig, path: P) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load `path`, falling back to [`DemoConfig::default`] with a warning when
/// the file is missing or unreadable
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> DemoConfig {
    let path = path.as_ref();
    match load_config(path) {
        Ok(config) => {
            log::info!("loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("using default config, could not load {}: {}", path.display(), e);
            DemoConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = load_config_from_str("(scene: Blend, width: 0)").unwrap();
        assert_eq!(config.scene, SceneKind::Blend);
        assert_eq!(config.width, 1);
        assert_eq!(config.height, HEIGHT);
        assert!(config.textures.is_empty());
    }

    #[test]
    fn test_texture_entries() {
        let config = load_config_from_str(
            r#"(textures: [(path: Some("brick.png"), filter: Linear, wrap_s: Repeat)])"#,
        )
        .unwrap();
        let tex = &config.textures[0];
        assert_eq!(tex.path.as_deref(), Some("brick.png"));
        assert_eq!(tex.filter, Filter::Linear);
        assert_eq!(tex.wrap_s, Wrap::Repeat);
        assert_eq!(tex.wrap_t, Wrap::Clamp);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join("softpipe_config_test.ron");
        let mut config = DemoConfig::default();
        config.scene = SceneKind::Sprite;
        config.clear_color = [0.25, 0.5, 0.75];
        save_config(&config, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_bad_config_is_a_parse_error() {
        assert!(matches!(load_config_from_str("(scene: Nope)"), Err(ConfigError::Parse(_))));
        assert!(matches!(load_config("/nonexistent/demo.ron"), Err(ConfigError::Io(_))));
    }
}
