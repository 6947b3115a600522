// ABOUTME: Extracts the staged release package into the base directory.
// ABOUTME: The package is a gzip-compressed tar archive.

use crate::pipeline::{MigrationStep, RunContext, StepError, StepGroup};
use async_trait::async_trait;
use flate2::read::GzDecoder;

pub struct UnpackPackage;

#[async_trait]
impl MigrationStep for UnpackPackage {
    fn id(&self) -> &'static str {
        "unpack-package"
    }

    fn group(&self) -> StepGroup {
        StepGroup::Install
    }

    async fn execute(&self, ctx: &mut RunContext) -> Result<(), StepError> {
        let archive = ctx.package_path();
        let dest = ctx.params.base_dir.clone();

        let file = std::fs::File::open(&archive)?;
        let mut unpacker = tar::Archive::new(GzDecoder::new(file));
        unpacker.unpack(&dest).map_err(|e| StepError::Extract {
            archive,
            dest: dest.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!(step = self.id(), dest = %dest.display(), "package extracted");
        Ok(())
    }
}
