// ABOUTME: Two-phase feasibility validation: prechecks, then checks.
// ABOUTME: Both phases run to completion and accumulate every finding.

mod capacity;
mod environment;
mod filesystem;
mod finding;
mod topology;

pub use capacity::{
    HARD_LINK_FILE_COST, MIN_DESTINATION_SIZE, MIN_TEMP_DIR_SIZE, PLACEHOLDER_FILE_COST,
    check_free_size, mb_ceil, minimum_required,
};
pub use environment::{
    ArchiveCapability, DispatcherConfig, EnvironmentChecker, EnvironmentInfo, HostOs,
    PrecheckContext,
};
pub use finding::{Finding, Findings, Phase};
pub use topology::TopologyValidator;
