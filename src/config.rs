use crate::model::format::FormatLocale;
use crate::model::ui::View;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory searched for `<view>.json|yaml|yml` datasets before the
    /// built-in ones are used
    #[serde(default)]
    pub data_dir: Option<String>,
    /// One of off, error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub locale: FormatLocale,
    /// Tab selected on startup
    #[serde(default)]
    pub default_view: View,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: default_log_level(),
            locale: FormatLocale::default(),
            default_view: View::default(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".acumen-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Load the config, writing the defaults on first run
    pub fn load_or_init() -> Config {
        if let Some(config) = Self::load() {
            return config;
        }

        let config = Config::default();
        // A read-only home still gets a working app with defaults
        let _ = config.save();
        config
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Data directory with a leading `~` expanded
    pub fn data_path(&self) -> Option<PathBuf> {
        let dir = self.data_dir.as_deref()?.trim();
        if dir.is_empty() {
            return None;
        }
        match dir.strip_prefix("~/") {
            Some(rest) => env::var("HOME").ok().map(|home| PathBuf::from(home).join(rest)),
            None => Some(PathBuf::from(dir)),
        }
    }

    pub fn exports_dir() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("exports"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("acumen-tui.log"))
    }
}
