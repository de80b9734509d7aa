use serde::Deserialize;
use std::{env, fmt, fs, io, path::Path, time::Duration};

// Runtime configuration (not gameplay tuning). An optional TOML file supplies
// base values and environment variables override them.

pub const CONFIG_PATH_VAR: &str = "MOVEMENT_CLIENT_CONFIG";

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/v1";
const DEFAULT_API_TIMEOUT_MS: u64 = 5000;
const DEFAULT_COOLDOWN_TICK_MS: u64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub api_timeout_ms: Option<u64>,
    pub cooldown_tick_ms: Option<u64>,
    pub player_id: Option<String>,
    pub ship_id: Option<String>,
    pub access_token: Option<String>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_timeout: Duration,
    pub cooldown_tick: Duration,
    pub player_id: Option<String>,
    pub ship_id: Option<String>,
    pub access_token: Option<String>,
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => FileConfig::read(Path::new(&path))?,
            Err(_) => FileConfig::default(),
        };
        Ok(Self::resolve(file, |key| env::var(key).ok()))
    }

    /// Merges file values with overrides from `lookup`, falling back to defaults.
    pub fn resolve(file: FileConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str, fallback: Option<String>| {
            lookup(key)
                .or(fallback)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        // Zero durations are unusable (a zero tick period panics tokio's interval).
        let millis = |key: &str, fallback: Option<u64>, default: u64| {
            let value = lookup(key)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .filter(|value| *value > 0)
                .or(fallback.filter(|value| *value > 0))
                .unwrap_or(default);
            Duration::from_millis(value)
        };

        Self {
            api_url: text("MOVEMENT_API_URL", file.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_timeout: millis(
                "MOVEMENT_API_TIMEOUT_MS",
                file.api_timeout_ms,
                DEFAULT_API_TIMEOUT_MS,
            ),
            cooldown_tick: millis(
                "COOLDOWN_TICK_MS",
                file.cooldown_tick_ms,
                DEFAULT_COOLDOWN_TICK_MS,
            ),
            player_id: text("MOVEMENT_PLAYER_ID", file.player_id),
            ship_id: text("MOVEMENT_SHIP_ID", file.ship_id),
            access_token: text("MOVEMENT_ACCESS_TOKEN", file.access_token),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: String, source: io::Error },
    Parse { path: String, source: toml::de::Error },
    Missing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => write!(f, "cannot read {path}: {source}"),
            ConfigError::Parse { path, source } => write!(f, "invalid config {path}: {source}"),
            ConfigError::Missing(key) => write!(f, "missing required setting {key}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Missing(_) => None,
        }
    }
}
