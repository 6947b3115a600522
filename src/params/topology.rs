// ABOUTME: Destination database topology: separate instance or shared with a prefix.
// ABOUTME: A tagged union so topology-specific fields only exist where they apply.

use serde::Deserialize;
use std::fmt;

/// Where the successor's tables live relative to the legacy database.
///
/// Field presence is intentionally loose here: feasibility checking reports
/// every missing value as a finding instead of refusing to parse, so an
/// operator sees the full checklist in one pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "topology", rename_all = "snake_case")]
pub enum DatabaseTopology {
    /// A wholly distinct database, possibly on another server.
    Separate {
        #[serde(default)]
        host: String,
        #[serde(default)]
        port: Option<u16>,
        #[serde(default)]
        username: String,
        #[serde(default)]
        password: String,
        #[serde(default)]
        name: String,
    },

    /// The legacy database instance, with successor tables under a prefix.
    Shared {
        #[serde(default)]
        prefix: String,
    },
}

impl fmt::Display for DatabaseTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseTopology::Separate { .. } => write!(f, "separate"),
            DatabaseTopology::Shared { .. } => write!(f, "shared"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_separate_topology() {
        let yaml = "topology: separate\nhost: db.example.org\nusername: succ\nname: successor";
        let t: DatabaseTopology = serde_yaml::from_str(yaml).unwrap();
        match t {
            DatabaseTopology::Separate { host, name, .. } => {
                assert_eq!(host, "db.example.org");
                assert_eq!(name, "successor");
            }
            other => panic!("unexpected topology: {other}"),
        }
    }

    #[test]
    fn parses_shared_topology_with_missing_prefix() {
        let t: DatabaseTopology = serde_yaml::from_str("topology: shared").unwrap();
        match t {
            DatabaseTopology::Shared { prefix } => assert!(prefix.is_empty()),
            other => panic!("unexpected topology: {other}"),
        }
    }

    #[test]
    fn rejects_unknown_topology() {
        let r: Result<DatabaseTopology, _> = serde_yaml::from_str("topology: replicated");
        assert!(r.is_err());
    }
}
