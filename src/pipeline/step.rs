// ABOUTME: The MigrationStep contract and the fatal step-failure type.
// ABOUTME: Steps are the pluggable unit the executor drives in declared order.

use super::context::RunContext;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Documentation grouping for steps. Execution order is the declared list
/// order; group boundaries are not separately enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepGroup {
    Install,
    DatabaseImport,
    FileCopy,
    PostInstall,
}

/// One named unit of migration work.
///
/// A step is invoked with the shared run context only, returns success or
/// a [`StepError`] carrying a human-readable message, and may log lines
/// tagged with its own id. Apart from the package download, steps are not
/// guaranteed idempotent; re-running after a partial failure is only safe
/// from the beginning or manually from the point of failure.
#[async_trait]
pub trait MigrationStep: Send + Sync {
    /// Stable identifier, used in logs and abort reports.
    fn id(&self) -> &'static str;

    fn group(&self) -> StepGroup;

    async fn execute(&self, ctx: &mut RunContext) -> Result<(), StepError>;
}

/// Fatal failure of one step. Halts the whole run; nothing is rolled back.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("unable to create the directory {0}")]
    CreateDirectory(PathBuf),

    #[error(
        "an empty package file exists at {path}; remove it manually or replace it \
         with the release archive from {url}"
    )]
    StalePackage { path: PathBuf, url: String },

    #[error(
        "a package file exists at {path} but is not the release {version}; \
         verify it and remove or replace it manually"
    )]
    ForeignPackage { path: PathBuf, version: String },

    #[error(
        "the downloaded package is corrupted; fetch it manually from {url} and \
         save it as {path}"
    )]
    CorruptDownload { url: String, path: PathBuf },

    #[error("an issue occurred during the package download from {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("unable to extract the package {archive} into {dest}: {reason}")]
    Extract {
        archive: PathBuf,
        dest: PathBuf,
        reason: String,
    },

    #[error("unable to save the database config file {0}")]
    WriteConfig(PathBuf),

    #[error("the target database \"{0}\" should be empty when the databases are separate")]
    TargetNotEmpty(String),

    #[error("some table names of the successor platform already exist in the shared database")]
    TableCollision,

    #[error("no destination database handle exists yet; the config step must run first")]
    TargetNotConnected,

    #[error("no administrator email has been defined")]
    MissingAdminEmail,

    #[error("database error: {0}")]
    Db(#[from] crate::db::DbError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
