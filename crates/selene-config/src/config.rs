//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Planet/body settings.
    pub planet: PlanetConfig,
    /// Level-of-detail settings.
    pub lod: LodConfig,
    /// Tile fetch pipeline settings.
    pub fetch: FetchConfig,
    /// Headless demo settings.
    pub demo: DemoConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Planet/body configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Directory holding the tile assets.
    pub data_dir: PathBuf,
    /// Body radius override in meters (`None` keeps the body's default).
    pub radius_m: Option<f64>,
    /// Viewer starting altitude above the surface in meters.
    pub start_altitude_m: f64,
}

/// Level-of-detail configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Maximum tile subdivisions per frame.
    pub subdivide_limit: u32,
    /// Deepest tile level the tree may reach.
    pub max_level: u8,
}

/// Tile fetch pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    /// Fetch worker threads (0 = size for the host).
    pub threads: usize,
    /// Deepest level with height data available.
    pub vertex_max_level: u8,
    /// Deepest level with imagery available.
    pub texture_max_level: u8,
}

/// Headless demo configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of frames to simulate.
    pub frames: u32,
    /// Altitude above the surface the descent ends at, in meters.
    pub end_altitude_m: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Enable wireframe rendering.
    pub wireframe: bool,
    /// Tint tiles by subdivision level.
    pub level_colors: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            radius_m: None,
            start_altitude_m: 3_000_000.0,
        }
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            subdivide_limit: 4,
            max_level: 9,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            vertex_max_level: 8,
            texture_max_level: 4,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 240,
            end_altitude_m: 35_000.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            wireframe: false,
            level_colors: false,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = read_config(&config_path)?;
            let config: Config = parse_config(&config_path, &contents)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = read_config(&config_path)?;
        let new_config: Config = parse_config(&config_path, &contents)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_config(path: &Path, contents: &str) -> Result<Config, ConfigError> {
    ron::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(!ron_str.is_empty());
        assert!(ron_str.contains("subdivide_limit: 4"));
        assert!(ron_str.contains("vertex_max_level: 8"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        // Config missing the `fetch` section entirely
        let ron_str = "(planet: (), lod: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.fetch, FetchConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.lod.max_level = 6;
        config.planet.data_dir = PathBuf::from("/srv/moon-tiles");
        config.planet.radius_m = Some(1_000_000.0);

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.lod.subdivide_limit = 16;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_some());
        assert_eq!(result.unwrap().lod.subdivide_limit, 16);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_error_names_the_offending_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.ron");
        std::fs::write(&config_path, "{{not valid}}").unwrap();

        match Config::load_or_create(dir.path()) {
            Err(ConfigError::Parse { path, .. }) => assert_eq!(path, config_path),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_error_names_the_offending_file() {
        // A directory where the config file should be forces a read failure.
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.ron");
        std::fs::create_dir(&config_path).unwrap();

        match Config::load_or_create(dir.path()) {
            Err(ConfigError::Read { path, .. }) => assert_eq!(path, config_path),
            other => panic!("expected Read error, got {other:?}"),
        }
    }
}
