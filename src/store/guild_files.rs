// Per-guild JSON configuration files

use poise::serenity_prelude as serenity;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info};

use super::{Result, StoreError};
use crate::models::guild::GuildConfig;
use crate::utils::formatters::pretty_json;

/// What `initialize` did to a guild's file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// No file existed, the template was written verbatim
    Created,
    /// An existing file was backfilled with the listed key paths
    Updated { added: Vec<String> },
}

impl InitOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            InitOutcome::Created => "A configuration has been created for your guild!",
            InitOutcome::Updated { .. } => {
                "A configuration already exists and has been updated with missing keys."
            }
        }
    }
}

/// Stores one JSON document per guild under a data directory
#[derive(Debug, Clone)]
pub struct GuildConfigStore {
    root: PathBuf,
}

impl GuildConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File backing the given guild's configuration
    pub fn path_for(&self, guild_id: serenity::GuildId) -> PathBuf {
        self.root.join(format!("{}.json", guild_id))
    }

    /// Load a guild's configuration, `None` if it was never initialized
    pub async fn load(&self, guild_id: serenity::GuildId) -> Result<Option<GuildConfig>> {
        let path = self.path_for(guild_id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(Some(GuildConfig::new(map))),
            Ok(_) => Err(StoreError::NotAnObject { path }),
            Err(source) => Err(StoreError::Json { path, source }),
        }
    }

    /// Write a guild's configuration, creating the data directory if needed
    pub async fn save(&self, guild_id: serenity::GuildId, config: &GuildConfig) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;

        let path = self.path_for(guild_id);
        let body = pretty_json(config).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|source| StoreError::Io { path: path.clone(), source })?;

        debug!("Wrote guild config to {}", path.display());
        Ok(())
    }

    /// Create the guild's file from the template, or backfill missing keys
    pub async fn initialize(
        &self,
        guild_id: serenity::GuildId,
        template: &GuildConfig,
    ) -> Result<InitOutcome> {
        let outcome = match self.load(guild_id).await? {
            Some(mut existing) => {
                let added = existing.backfill(template);
                self.save(guild_id, &existing).await?;
                InitOutcome::Updated { added }
            }
            None => {
                self.save(guild_id, template).await?;
                InitOutcome::Created
            }
        };

        info!("Initialized config for guild {}: {:?}", guild_id, outcome);
        Ok(outcome)
    }
}
