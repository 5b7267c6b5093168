use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

pub const DEFAULT_API_URL: &str = "https://hack-or-snooze-v3.herokuapp.com";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub api_url: Option<String>,
    pub header: Option<String>,
    pub open_command: Option<String>,
    pub session_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub api_url: String,
    pub header: Option<String>,
    pub open_command: Option<String>,
    pub session_file: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl AppConfig {
    fn into_runtime(self) -> RuntimeConfig {
        RuntimeConfig {
            api_url: self
                .api_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            header: self.header,
            open_command: self.open_command,
            session_file: self.session_file.or_else(|| config_dir().map(|d| d.join("session.json"))),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub fn load(config_override: Option<String>, api_url_override: Option<String>) -> Result<RuntimeConfig> {
    let path = match config_override {
        Some(p) => {
            let p = PathBuf::from(p);
            if !p.is_file() {
                anyhow::bail!("config file not found: {}", p.display());
            }
            Some(p)
        }
        None => config_dir().map(|d| d.join("config.toml")).filter(|p| p.is_file()),
    };

    let parsed = match path {
        Some(path) => {
            let txt = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<AppConfig>(&txt)
                .with_context(|| format!("failed to parse toml: {}", path.display()))?
        }
        // Built-in defaults
        None => AppConfig::default(),
    };

    let mut cfg = parsed.into_runtime();
    if let Some(url) = api_url_override {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("--api-url must be an http(s) url: {}", url);
        }
        cfg.api_url = url.trim_end_matches('/').to_string();
    }
    Ok(cfg)
}

pub fn config_dir() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let mut p = PathBuf::from(xdg);
        p.push("snooze-cli");
        return Some(p);
    }
    if let Ok(home) = env::var("HOME") {
        let mut p = PathBuf::from(home);
        p.push(".config");
        p.push("snooze-cli");
        return Some(p);
    }
    None
}
