// ABOUTME: Application-wide error types for metoikos.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("the environment is not ready for migration: {0} blocking finding(s) reported")]
    NotFeasible(usize),

    #[error("migration aborted at step \"{step}\": {reason}")]
    Aborted { step: String, reason: String },

    #[error("database error: {0}")]
    Db(#[from] crate::db::DbError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
