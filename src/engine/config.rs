//! Session configuration and named presets.
//! Loaded from TOML at runtime for the CLI host and the arena.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::hex::check_dimensions;
use crate::engine::error::GameError;
use crate::engine::models::Coord;

/// Parameters of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_dimension", alias = "w")]
    pub width: i32,
    #[serde(default = "default_dimension", alias = "h")]
    pub height: i32,
    #[serde(default = "default_initial_wall_count")]
    pub initial_wall_count: usize,
    /// Starting cell; the centre cell when absent.
    #[serde(default)]
    pub cat_start: Option<Coord>,
}

fn default_dimension() -> i32 {
    11
}

fn default_initial_wall_count() -> usize {
    8
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: default_dimension(),
            height: default_dimension(),
            initial_wall_count: default_initial_wall_count(),
            cat_start: None,
        }
    }
}

impl GameConfig {
    pub fn new(width: i32, height: i32, initial_wall_count: usize) -> Self {
        Self {
            width,
            height,
            initial_wall_count,
            cat_start: None,
        }
    }

    pub fn with_cat_start(mut self, i: i32, j: i32) -> Self {
        self.cat_start = Some((i, j));
        self
    }

    /// The cell the cat starts on: `cat_start`, or `(width / 2, height / 2)`.
    pub fn effective_cat_start(&self) -> Coord {
        self.cat_start.unwrap_or((self.width / 2, self.height / 2))
    }

    pub fn validate(&self) -> Result<(), GameError> {
        check_dimensions(self.width, self.height)?;
        let (i, j) = self.effective_cat_start();
        if i < 0 || i >= self.width || j < 0 || j >= self.height {
            return Err(GameError::InvalidCoordinate {
                i,
                j,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Built-in presets, available without any config file.
static BUILTIN_PRESETS: Lazy<HashMap<&'static str, GameConfig>> = Lazy::new(|| {
    HashMap::from([
        ("easy", GameConfig::new(11, 11, 16)),
        ("classic", GameConfig::default()),
        ("hard", GameConfig::new(11, 11, 4)),
        ("tiny", GameConfig::new(5, 5, 2)),
    ])
});

/// Top-level TOML file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Base seed for the random wall layout.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub game: Option<GameConfig>,
    #[serde(default)]
    pub presets: HashMap<String, GameConfig>,
}

impl ConfigFile {
    /// Look up a preset, preferring ones defined in the file over built-ins.
    pub fn preset(&self, name: &str) -> Option<GameConfig> {
        self.presets
            .get(name)
            .or_else(|| BUILTIN_PRESETS.get(name))
            .cloned()
    }

    /// The file's `[game]` table, or the classic defaults.
    pub fn game_or_default(&self) -> GameConfig {
        self.game.clone().unwrap_or_default()
    }

    /// Names of all presets reachable through [`ConfigFile::preset`], sorted.
    pub fn preset_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .presets
            .keys()
            .cloned()
            .chain(BUILTIN_PRESETS.keys().map(|k| k.to_string()))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Look up a built-in preset by name.
pub fn builtin_preset(name: &str) -> Option<GameConfig> {
    BUILTIN_PRESETS.get(name).cloned()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load a config file from the given path.
pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Try to load a config from well-known paths, returning an empty one if none found.
pub fn load_default_config() -> ConfigFile {
    let candidates = [
        "catch_the_cat.toml",
        "../catch_the_cat.toml",
        "/etc/catch-the-cat/catch_the_cat.toml",
    ];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_config(p) {
                Ok(config) => {
                    tracing::info!(path = %p.display(), presets = config.presets.len(), "loaded game config");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load game config");
                }
            }
        }
    }
    tracing::info!("no catch_the_cat.toml found, using built-in defaults");
    ConfigFile::default()
}
