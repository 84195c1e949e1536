use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sources::{HttpSettings, SourceEndpoints};
use stats_app::{AppConfig, ProfileDefaults};

const APP_DIR_NAME: &str = "codestats";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_PORT: u16 = 3846;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub port: u16,
    pub cache_ttl_minutes: u64,
    pub request_timeout_secs: u64,
    pub profile: ProfileDefaults,
    pub endpoints: SourceEndpoints,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cache_ttl_minutes: 60,
            request_timeout_secs: HttpSettings::default().timeout_secs,
            profile: ProfileDefaults::default(),
            endpoints: SourceEndpoints::default(),
        }
    }
}

impl CliConfig {
    /// Usernames from the environment take precedence over the file.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let slots = [
            ("CODESTATS_LEETCODE_USERNAME", &mut self.profile.leetcode),
            ("CODESTATS_GITHUB_USERNAME", &mut self.profile.github),
            ("CODESTATS_GFG_USERNAME", &mut self.profile.gfg),
        ];
        for (var, slot) in slots {
            let value = lookup(var).map(|value| value.trim().to_string());
            if let Some(value) = value.filter(|value| !value.is_empty()) {
                *slot = value;
            }
        }
    }

    pub fn app_config(&self, db_path: PathBuf) -> AppConfig {
        let mut config = AppConfig::new(db_path);
        config.cache_ttl_ms = i64::try_from(self.cache_ttl_minutes.max(1))
            .unwrap_or(i64::MAX)
            .saturating_mul(60_000);
        config.http.timeout_secs = self.request_timeout_secs.max(1);
        config.endpoints = self.endpoints.clone();
        config.profile = self.profile.clone();
        config
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CliConfig,
    pub file: PathBuf,
    pub created: bool,
}

pub fn load_or_create(path: Option<&Path>) -> Result<ConfigLoad, String> {
    let file = match path {
        Some(path) => path.to_path_buf(),
        None => config_dir()?.join(CONFIG_FILE_NAME),
    };
    if let Some(dir) = file.parent() {
        fs::create_dir_all(dir)
            .map_err(|err| format!("create config dir {}: {}", dir.display(), err))?;
    }

    if file.exists() {
        let contents = fs::read_to_string(&file)
            .map_err(|err| format!("read config {}: {}", file.display(), err))?;
        let config: CliConfig = toml::from_str(&contents)
            .map_err(|err| format!("parse config {}: {}", file.display(), err))?;
        return Ok(ConfigLoad {
            config,
            file,
            created: false,
        });
    }

    let config = CliConfig::default();
    let contents =
        toml::to_string_pretty(&config).map_err(|err| format!("serialize config: {}", err))?;
    fs::write(&file, contents)
        .map_err(|err| format!("write config {}: {}", file.display(), err))?;

    Ok(ConfigLoad {
        config,
        file,
        created: true,
    })
}

fn config_dir() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| "could not resolve the user config directory".to_string())
}

pub fn data_dir() -> Result<PathBuf, String> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| "could not resolve the user data directory".to_string())
}
