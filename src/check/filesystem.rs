// ABOUTME: Destination filesystem probe: writability, hard links, free space.
// ABOUTME: Captures the file-size measurements the capacity planner consumes.

use super::capacity::{MIN_DESTINATION_SIZE, MIN_TEMP_DIR_SIZE, mb_ceil};
use super::finding::Findings;
use crate::measure::{Measure, ResourceMeasurement};
use crate::params::{FileTransferStrategy, ParameterSet};
use std::fs;
use std::path::Path;

const PROBE_DIR: &str = ".upgrade-probe";

/// Probe the destination base dir and capture size measurements.
///
/// The document root can differ between a web request and a command-line
/// one, so the base dir is revalidated here even when a front-end already
/// did. Each failed probe records one finding and ends this sub-area;
/// probe artifacts are removed on every path out.
pub(crate) fn check_filesystem(
    params: &ParameterSet,
    measure: &dyn Measure,
    findings: &mut Findings,
    measurement: &mut ResourceMeasurement,
) {
    let base_dir = &params.base_dir;

    if !base_dir.is_absolute() {
        findings.check(format!(
            "The base dir \"{}\" is not allowed or not writable.",
            base_dir.display()
        ));
        return;
    }

    let created_base = !base_dir.exists();
    if created_base && fs::create_dir_all(base_dir).is_err() {
        findings.check(format!(
            "The base dir \"{}\" is not writable.",
            base_dir.display()
        ));
        return;
    }

    // Everything below cleans up through this guard.
    let cleanup_root = if created_base {
        base_dir.clone()
    } else {
        base_dir.join(PROBE_DIR)
    };

    let probe_dir = base_dir.join(PROBE_DIR);
    if fs::create_dir(&probe_dir).is_err() {
        findings.check(format!(
            "The base dir \"{}\" is not usable.",
            base_dir.display()
        ));
        remove_quietly(&cleanup_root);
        return;
    }

    let probe_file = probe_dir.join("probe");
    if fs::write(&probe_file, b"probe").is_err() {
        findings.check(format!(
            "The base dir \"{}\" does not allow creation of files.",
            base_dir.display()
        ));
        remove_quietly(&cleanup_root);
        return;
    }

    // Hard links matter when the destination differs from the legacy tree.
    if params.files == FileTransferStrategy::HardLink {
        let probe_link = probe_dir.join("probe-link");
        if fs::hard_link(&probe_file, &probe_link).is_err() {
            findings.check(format!(
                "The base dir \"{}\" does not allow creation of hard links.",
                base_dir.display()
            ));
            remove_quietly(&cleanup_root);
            return;
        }
    }

    let staging = params.staging_dir();
    let staging_free = measure.free_space(&staging).unwrap_or(0);
    if staging_free < MIN_TEMP_DIR_SIZE {
        findings.check(format!(
            "The free size of the temp directory should be greater than {}MB.",
            mb_ceil(MIN_TEMP_DIR_SIZE)
        ));
        remove_quietly(&cleanup_root);
        return;
    }

    let destination_free = measure.free_space(base_dir).unwrap_or(0);
    if destination_free < MIN_DESTINATION_SIZE {
        findings.check(format!(
            "The free size of the base dir should be greater than {}MB.",
            mb_ceil(MIN_DESTINATION_SIZE)
        ));
        remove_quietly(&cleanup_root);
        return;
    }
    measurement.destination_free_size = destination_free;

    let files_dir = &params.source.files_dir;
    let files_size = measure.directory_size(files_dir).unwrap_or(0);
    if files_size == 0 {
        findings.check("Cannot evaluate the size of the legacy files directory.");
        remove_quietly(&cleanup_root);
        return;
    }
    measurement.source_files_size = files_size;
    measurement.source_file_count = measure.file_count(files_dir).unwrap_or(0);

    remove_quietly(&cleanup_root);
}

fn remove_quietly(path: &Path) {
    let _ = fs::remove_dir_all(path);
}
