use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

const CONFIG_ENV: &str = "STRESSCADE_CONFIG";
const APP_DIR: &str = "stresscade";

/// Main configuration, read from `config.toml`. Every field has a default so
/// a missing file or a partial one both work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub games: GamesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Interval between tick events in milliseconds
    pub tick_rate_ms: u64,
    /// Where sessions, progress and logs are kept
    pub data_dir: Option<PathBuf>,
    /// `EnvFilter` directive used when `STRESSCADE_LOG` is unset
    pub log_level: String,
    /// Ring the terminal bell on pops and completions
    pub bell: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            data_dir: None,
            log_level: "stresscade=info".to_string(),
            bell: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamesConfig {
    pub bubble_pop_secs: u32,
    pub anger_smash_secs: u32,
    pub breathing_cycles: u32,
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            bubble_pop_secs: 60,
            anger_smash_secs: 90,
            breathing_cycles: 8,
        }
    }
}

impl Config {
    /// Load from `STRESSCADE_CONFIG`, falling back to the user config dir.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml")));

        match path {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1000).contains(&self.app.tick_rate_ms) {
            return Err(ConfigError::Invalid(format!(
                "app.tick_rate_ms must be between 1 and 1000, got {}",
                self.app.tick_rate_ms
            )));
        }
        if self.games.bubble_pop_secs == 0 || self.games.anger_smash_secs == 0 {
            return Err(ConfigError::Invalid(
                "game lengths must be at least one second".to_string(),
            ));
        }
        if self.games.breathing_cycles == 0 {
            return Err(ConfigError::Invalid(
                "games.breathing_cycles must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.app.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(".stresscade"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[app]\nbell = false\ndata_dir = \"/tmp/calm\"\n\n[games]\nanger_smash_secs = 45\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.app.bell);
        assert_eq!(config.app.tick_rate_ms, 16);
        assert_eq!(config.games.anger_smash_secs, 45);
        assert_eq!(config.games.bubble_pop_secs, 60);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/calm"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[app]\ntick_rate_ms = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[app\n").unwrap();
        match Config::load_from(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
