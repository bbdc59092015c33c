use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "DECKTEXT_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where `build` writes packages when no `--output` is given.
    pub output_dir: PathBuf,
    /// Where `dump` writes when no `--output-dir` is given.
    pub dump_dir: PathBuf,
    pub verify_after_build: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated_decks"),
            dump_dir: PathBuf::from("anki_review_output"),
            verify_after_build: true,
        }
    }
}

impl Config {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the config path based on priority:
    /// 1. Explicit path (`--config`)
    /// 2. DECKTEXT_CONFIG environment variable
    /// 3. `<config dir>/decktext/config.toml`
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(env_path));
        }

        dirs::config_dir().map(|dir| dir.join("decktext").join("config.toml"))
    }
}
