// ABOUTME: The immutable parameter set collected before any check runs.
// ABOUTME: Handles YAML parsing, file discovery, and the init template.

mod source;
mod strategy;
mod topology;

pub use source::{DispatcherMode, SourceParams};
pub use strategy::FileTransferStrategy;
pub use topology::DatabaseTopology;

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "metoikos.yml";
pub const CONFIG_FILENAME_ALT: &str = "metoikos.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".metoikos/config.yml";

/// Input bag for one migration run. Collected once, never mutated after.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterSet {
    /// Destination directory the successor is installed into.
    pub base_dir: PathBuf,

    #[serde(default)]
    pub files: FileTransferStrategy,

    pub source: SourceParams,

    pub database: DatabaseTopology,

    /// Administrator address for the successor's initial settings.
    #[serde(default)]
    pub admin_email: Option<String>,

    pub installation_title: String,

    pub time_zone: String,

    /// Where the release package is staged; defaults to the system temp dir.
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,

    /// Seed SQL blobs executed after the schema install, in order.
    #[serde(default)]
    pub seed_scripts: Vec<PathBuf>,
}

impl ParameterSet {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Staging directory for downloaded artifacts.
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    pub fn template() -> Self {
        ParameterSet {
            base_dir: PathBuf::from("/var/www/successor"),
            files: FileTransferStrategy::default(),
            source: SourceParams {
                version: "2.4.1".to_string(),
                host: "localhost".to_string(),
                port: None,
                username: "legacy".to_string(),
                password: String::new(),
                name: "legacy".to_string(),
                prefix: String::new(),
                files_dir: PathBuf::from("/var/www/legacy/files"),
                dispatcher: Some(DispatcherMode::Background),
            },
            database: DatabaseTopology::Separate {
                host: "localhost".to_string(),
                port: None,
                username: "successor".to_string(),
                password: String::new(),
                name: "successor".to_string(),
            },
            admin_email: None,
            installation_title: "Archive".to_string(),
            time_zone: "UTC".to_string(),
            staging_dir: None,
            seed_scripts: Vec::new(),
        }
    }
}

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, template_yaml())?;

    Ok(())
}

fn template_yaml() -> &'static str {
    r#"base_dir: /var/www/successor
files: copy
source:
  version: "2.4.1"
  host: localhost
  username: legacy
  name: legacy
  files_dir: /var/www/legacy/files
  dispatcher: background
database:
  topology: separate
  host: localhost
  username: successor
  name: successor
installation_title: Archive
time_zone: UTC
"#
}
