// Default guild configuration, read from the application config document

use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use super::{Result, StoreError};
use crate::models::guild::GuildConfig;

/// Reads `template.guild` out of the application config document
#[derive(Debug, Clone)]
pub struct TemplateSource {
    path: PathBuf,
}

impl TemplateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the guild template. Read on every call so edits apply without a restart.
    pub async fn load(&self) -> Result<GuildConfig> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;

        let document: Value = serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        match document.pointer("/template/guild") {
            Some(Value::Object(map)) => {
                debug!("Loaded guild template with {} top-level keys", map.len());
                Ok(GuildConfig::new(map.clone()))
            }
            _ => Err(StoreError::MissingTemplate {
                path: self.path.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_load_guild_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            json!({
                "token_env": "DISCORD_TOKEN",
                "template": { "guild": { "prefix": "?", "level": { "xp": 0 } }, "user": {} }
            })
            .to_string(),
        )
        .unwrap();

        let template = TemplateSource::new(&path).load().await.unwrap();
        assert_eq!(
            serde_json::to_value(&template).unwrap(),
            json!({ "prefix": "?", "level": { "xp": 0 } })
        );
    }

    #[tokio::test]
    async fn test_missing_section_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "template": { "user": {} } }"#).unwrap();

        let err = TemplateSource::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::MissingTemplate { .. }));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = TemplateSource::new(dir.path().join("nope.json"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
