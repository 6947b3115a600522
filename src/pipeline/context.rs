// ABOUTME: Shared run context handed to every step.
// ABOUTME: Owns the parameter set, measurements, and the destination handle.

use super::step::StepError;
use crate::db::{TargetDatabase, TargetHandle};
use crate::measure::ResourceMeasurement;
use crate::params::ParameterSet;
use crate::release::ReleaseSpec;
use std::path::PathBuf;

/// Name of the staged release package.
pub const PACKAGE_FILENAME: &str = "successor.tar.gz";

/// Everything a step may read or, for the destination handle, create.
///
/// The executor hands each step exclusive access for the duration of its
/// execution; nothing here is shared across runs.
pub struct RunContext {
    pub params: ParameterSet,
    pub release: ReleaseSpec,
    pub measurement: ResourceMeasurement,
    target: Option<TargetHandle>,
}

impl RunContext {
    pub fn new(
        params: ParameterSet,
        release: ReleaseSpec,
        measurement: ResourceMeasurement,
    ) -> Self {
        Self {
            params,
            release,
            measurement,
            target: None,
        }
    }

    /// Staging location of the release package.
    pub fn package_path(&self) -> PathBuf {
        self.params.staging_dir().join(PACKAGE_FILENAME)
    }

    /// A path inside the destination installation.
    pub fn install_path(&self, relative: &str) -> PathBuf {
        self.params.base_dir.join(relative)
    }

    /// The destination database handle created by the config step.
    pub fn target(&self) -> Result<&dyn TargetDatabase, StepError> {
        self.target
            .as_deref()
            .ok_or(StepError::TargetNotConnected)
    }

    /// Store the destination handle. The run owns it from here on.
    pub fn set_target(&mut self, handle: TargetHandle) {
        self.target = Some(handle);
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }
}
