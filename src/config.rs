use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::utils::fuzzy::MatchConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Kodi
    pub kodi_host: String,
    pub kodi_port: u16,
    pub kodi_user: String,
    pub kodi_password: String,
    pub request_timeout_secs: u64,

    // Server
    pub listen_port: u16,

    // Behaviour
    pub activate_tv_on_play: bool,
    pub match_threshold: f64,

    // Meta
    pub log_level: String,

    // Data
    pub voice_corrections: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kodi_host: "localhost".to_string(),
            kodi_port: 8080,
            kodi_user: "kodi".to_string(),
            kodi_password: "".to_string(),
            request_timeout_secs: 10,
            listen_port: 3000,
            activate_tv_on_play: false,
            match_threshold: 0.4,
            log_level: "INFO".to_string(),
            voice_corrections: HashMap::new(),
        }
    }
}

impl Config {
    /// Load config from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from `path`, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    // Graceful degradation: log warning and use defaults
                    tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                    let backup_path = path.with_extension("json.corrupt");
                    let _ = std::fs::rename(path, &backup_path);
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override fields from `KODI_IP`, `KODI_PORT`, `KODI_USER`,
    /// `KODI_PASSWORD`, `PORT` and `ACTIVATE_TV`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("KODI_IP") {
            self.kodi_host = v;
        }
        if let Some(v) = lookup("KODI_PORT").and_then(|v| v.trim().parse().ok()) {
            self.kodi_port = v;
        }
        if let Some(v) = lookup("KODI_USER") {
            self.kodi_user = v;
        }
        if let Some(v) = lookup("KODI_PASSWORD") {
            self.kodi_password = v;
        }
        if let Some(v) = lookup("PORT").and_then(|v| v.trim().parse().ok()) {
            self.listen_port = v;
        }
        if let Some(v) = lookup("ACTIVATE_TV") {
            self.activate_tv_on_play = v.trim().eq_ignore_ascii_case("true");
        }
    }

    /// Fuzzy matcher settings derived from this config
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            threshold: self.match_threshold,
            ..MatchConfig::default()
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kodivoice")
        .join("config.json")
}
