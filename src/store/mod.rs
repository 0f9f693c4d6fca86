// Guild configuration persistence
pub mod guild_files;
pub mod template;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing configuration documents
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} does not contain a JSON object")]
    NotAnObject { path: PathBuf },

    #[error("{path} has no `template.guild` section")]
    MissingTemplate { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, StoreError>;
