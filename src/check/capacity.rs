// ABOUTME: Free-space arithmetic: required vs available bytes per transfer strategy.
// ABOUTME: Pure computation over the captured measurement; no I/O.

use super::finding::Findings;
use crate::measure::ResourceMeasurement;
use crate::params::FileTransferStrategy;

/// Free space required on the staging filesystem before downloading.
pub const MIN_TEMP_DIR_SIZE: u64 = 1_000_000_000;

/// Free space required in the base dir before anything else is considered.
pub const MIN_DESTINATION_SIZE: u64 = 1_000_000_000;

/// Per-inode cost of a hard link, independent of file content size.
pub const HARD_LINK_FILE_COST: u64 = 5_000;

/// Per-file cost of a content-less placeholder.
pub const PLACEHOLDER_FILE_COST: u64 = 10_000;

/// Compare required space against available space for the chosen strategy.
///
/// Produces at most one finding: either the files-only shortfall, or the
/// combined files+database shortfall. The database is budgeted twice, once
/// for the export and once for the import.
///
/// When the filesystem backing the database differs physically from the
/// one backing the base dir, a shortfall on the database's own filesystem
/// cannot be detected here.
pub fn check_free_size(
    strategy: FileTransferStrategy,
    base_install_size: u64,
    measurement: &ResourceMeasurement,
) -> Findings {
    let mut findings = Findings::new();

    if measurement.source_files_size == 0 {
        findings.check("The size of the archive cannot be determined.");
        return findings;
    }
    if measurement.source_database_size == 0 {
        findings.check("The size of the database cannot be determined.");
        return findings;
    }
    if measurement.destination_free_size == 0 {
        findings.check("The free space size cannot be determined.");
        return findings;
    }

    let minimum = minimum_required(strategy, base_install_size, measurement);
    let available = measurement.destination_free_size;

    if available < minimum {
        findings.check(format!(
            "A minimum size of {}MB is required in the base dir, only {}MB is available.",
            mb_ceil(minimum),
            mb_ceil(available)
        ));
        return findings;
    }

    let total = minimum + 2 * measurement.source_database_size;
    if available < total {
        findings.check(format!(
            "A minimum size of {}MB ({}MB for the files and {}MB for the database) \
             is required in the base dir, only {}MB is available.",
            mb_ceil(total),
            mb_ceil(minimum),
            mb_ceil(measurement.source_database_size),
            mb_ceil(available)
        ));
    }

    findings
}

/// Minimum bytes the chosen strategy needs in the base dir.
pub fn minimum_required(
    strategy: FileTransferStrategy,
    base_install_size: u64,
    measurement: &ResourceMeasurement,
) -> u64 {
    match strategy {
        // 20% slack for duplication while the copy is in flight.
        FileTransferStrategy::Copy => {
            let archive = measurement.source_files_size;
            archive + archive / 5 + base_install_size
        }
        FileTransferStrategy::HardLink => {
            HARD_LINK_FILE_COST * measurement.source_file_count + base_install_size
        }
        FileTransferStrategy::Dummy => {
            PLACEHOLDER_FILE_COST * measurement.source_file_count + base_install_size
        }
    }
}

/// Whole megabytes, rounded up.
pub fn mb_ceil(bytes: u64) -> u64 {
    bytes.div_ceil(1_000_000)
}
