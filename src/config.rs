//! Bot settings loaded once at startup from a JSON file (`Config.json` by default).
//!
//! A missing or malformed file never aborts startup: the problem is logged and both ids
//! read as absent, so only the commands that need them fail.

use serde::Deserialize;
use serenity::model::id::{ChannelId, RoleId};
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "Config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub homework_channel_id: Option<u64>,
    #[serde(default)]
    pub notification_role_id: Option<u64>,
}

impl BotConfig {
    /// Channel that receives add-homework broadcasts. A zero id counts as unset.
    pub fn homework_channel(&self) -> Option<ChannelId> {
        self.homework_channel_id
            .filter(|id| *id != 0)
            .map(ChannelId::new)
    }

    pub fn notification_role(&self) -> Option<RoleId> {
        self.notification_role_id
            .filter(|id| *id != 0)
            .map(RoleId::new)
    }
}

/// `HOMEWORK_CONFIG` if set, otherwise `Config.json` in the working directory.
pub fn config_path_from_env() -> PathBuf {
    std::env::var("HOMEWORK_CONFIG")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

pub fn parse_config(raw: &str) -> Result<BotConfig, serde_json::Error> {
    serde_json::from_str(raw)
}

pub fn load_config(path: impl AsRef<Path>) -> BotConfig {
    let path = path.as_ref();
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            error!(target = "config", path = %path.display(), error = %e, "settings file could not be read; channel and role are unset");
            return BotConfig::default();
        }
    };
    match parse_config(&raw) {
        Ok(config) => {
            info!(
                target = "config",
                path = %path.display(),
                homework_channel_id = ?config.homework_channel_id,
                notification_role_id = ?config.notification_role_id,
                "settings loaded"
            );
            config
        }
        Err(e) => {
            error!(target = "config", path = %path.display(), error = %e, "invalid JSON in settings file; channel and role are unset");
            BotConfig::default()
        }
    }
}
