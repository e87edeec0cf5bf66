use log::LevelFilter;
use std::path::PathBuf;

pub const LOG_ENV: &str = "UTHMHUBD_LOG";
pub const WORKSPACE_ENV: &str = "UTHMHUBD_WORKSPACE";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_level: LevelFilter,
    /// Workspace opened before the first request, if any.
    pub workspace: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Info,
            workspace: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let log_level = get(LOG_ENV)
            .and_then(|v| v.trim().parse::<LevelFilter>().ok())
            .unwrap_or(defaults.log_level);
        let workspace = get(WORKSPACE_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self {
            log_level,
            workspace,
        }
    }
}
