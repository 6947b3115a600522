// ABOUTME: Connection and layout parameters describing the legacy installation.
// ABOUTME: Everything the checks read about the source is declared here, not probed ambiently.

use serde::Deserialize;
use std::path::PathBuf;

/// The legacy installation being migrated away from.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceParams {
    /// Release version of the legacy application.
    pub version: String,

    pub host: String,

    #[serde(default)]
    pub port: Option<u16>,

    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Schema name of the legacy database.
    pub name: String,

    /// Table prefix the legacy application uses, empty if none.
    #[serde(default)]
    pub prefix: String,

    /// Directory holding the legacy installation's uploaded files.
    pub files_dir: PathBuf,

    /// How the legacy host dispatches long-running jobs, if configured.
    #[serde(default)]
    pub dispatcher: Option<DispatcherMode>,
}

/// Job-dispatcher mode of the legacy host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatcherMode {
    /// Jobs run outside the request cycle; required for the migration.
    Background,

    /// Jobs run inline with the triggering request.
    Synchronous,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_source() {
        let yaml = "version: \"2.4.1\"\nhost: localhost\nusername: legacy\nname: legacy_db\nfiles_dir: /srv/legacy/files";
        let s: SourceParams = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(s.version, "2.4.1");
        assert_eq!(s.name, "legacy_db");
        assert!(s.port.is_none());
        assert!(s.dispatcher.is_none());
        assert!(s.prefix.is_empty());
    }

    #[test]
    fn parses_dispatcher_mode() {
        let yaml = "version: \"2.4.1\"\nhost: h\nusername: u\nname: n\nfiles_dir: /f\ndispatcher: synchronous";
        let s: SourceParams = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(s.dispatcher, Some(DispatcherMode::Synchronous));
    }
}
