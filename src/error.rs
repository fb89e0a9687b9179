use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("script line {line}: {source}")]
    ScriptIo {
        line: usize,
        source: std::io::Error,
    },

    #[error("script line {line}: {source}")]
    Script {
        line: usize,
        source: serde_json::Error,
    },

    #[error("state digest {actual} does not match expected {expected}")]
    DigestMismatch { expected: String, actual: String },

    #[error("json encode: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Read { .. } | CliError::Write { .. } | CliError::ScriptIo { .. } => 2,
            CliError::Config { .. } | CliError::Script { .. } => 3,
            CliError::DigestMismatch { .. } => 4,
            CliError::Encode(_) => 1,
        }
    }
}
