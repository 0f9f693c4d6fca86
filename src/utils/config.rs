// Centralized configuration for Codygen

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default directory holding one JSON file per guild
pub const DEFAULT_GUILD_DATA_DIR: &str = "data/guilds";

/// Default application document containing `template.guild`
pub const DEFAULT_TEMPLATE_PATH: &str = "config.json";

pub const DEFAULT_PREFIX: &str = "!";

/// How long buttons and modals stay responsive
pub const DEFAULT_INTERACTION_TIMEOUT_SECS: u64 = 300;

/// Discord embed colors
pub mod colors {
    pub const ERROR: u32 = 0xff0000;
    pub const SUCCESS: u32 = 0x00ff00;
    pub const NEUTRAL: u32 = 0xf1f1f1;
    pub const INFO: u32 = 0x3498db;
}

/// Runtime settings read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub token: String,
    pub prefix: String,
    pub guild_data_dir: PathBuf,
    pub template_path: PathBuf,
    pub interaction_timeout: Duration,
}

impl BotSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; missing optional keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .context("DISCORD_TOKEN must be set")?;

        let interaction_timeout = match lookup("INTERACTION_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("INTERACTION_TIMEOUT_SECS is not a number: {raw}"))?,
            None => DEFAULT_INTERACTION_TIMEOUT_SECS,
        };

        Ok(Self {
            token,
            prefix: lookup("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            guild_data_dir: lookup("GUILD_DATA_DIR")
                .unwrap_or_else(|| DEFAULT_GUILD_DATA_DIR.to_string())
                .into(),
            template_path: lookup("TEMPLATE_PATH")
                .unwrap_or_else(|| DEFAULT_TEMPLATE_PATH.to_string())
                .into(),
            interaction_timeout: Duration::from_secs(interaction_timeout),
        })
    }
}
