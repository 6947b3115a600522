// ABOUTME: First pipeline step: create the destination base directory.
// ABOUTME: Safe to run when the directory already exists.

use crate::pipeline::{MigrationStep, RunContext, StepError, StepGroup};
use async_trait::async_trait;

pub struct CreateDirectory;

#[async_trait]
impl MigrationStep for CreateDirectory {
    fn id(&self) -> &'static str {
        "create-directory"
    }

    fn group(&self) -> StepGroup {
        StepGroup::Install
    }

    async fn execute(&self, ctx: &mut RunContext) -> Result<(), StepError> {
        let base_dir = ctx.params.base_dir.clone();
        std::fs::create_dir_all(&base_dir)
            .map_err(|_| StepError::CreateDirectory(base_dir.clone()))?;
        tracing::debug!(step = self.id(), dir = %base_dir.display(), "base directory ready");
        Ok(())
    }
}
