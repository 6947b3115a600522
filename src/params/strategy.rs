// ABOUTME: File-transfer strategy selection for the migration.
// ABOUTME: Determines how legacy file content reaches the destination tree.

use serde::Deserialize;
use std::fmt;

/// How existing file content is made available to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileTransferStrategy {
    /// Full duplication of every file.
    #[default]
    Copy,

    /// Filesystem hard links; content is shared, only inodes cost space.
    HardLink,

    /// Lightweight placeholders without content, for rehearsal runs.
    Dummy,
}

impl fmt::Display for FileTransferStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileTransferStrategy::Copy => "copy",
            FileTransferStrategy::HardLink => "hard_link",
            FileTransferStrategy::Dummy => "dummy",
        };
        write!(f, "{name}")
    }
}
