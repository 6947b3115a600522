// ABOUTME: Contract steps for the pluggable per-entity collaborators.
// ABOUTME: Record mapping lives outside this crate; these keep the pipeline order stable.

use crate::pipeline::{MigrationStep, RunContext, StepError, StepGroup};
use async_trait::async_trait;

macro_rules! contract_step {
    ($name:ident, $id:literal, $group:expr) => {
        pub struct $name;

        #[async_trait]
        impl MigrationStep for $name {
            fn id(&self) -> &'static str {
                $id
            }

            fn group(&self) -> StepGroup {
                $group
            }

            async fn execute(&self, _ctx: &mut RunContext) -> Result<(), StepError> {
                tracing::debug!(
                    step = self.id(),
                    "record mapping is provided by an external importer; nothing to do here"
                );
                Ok(())
            }
        }
    };
}

pub struct ImportSettings;

#[async_trait]
impl MigrationStep for ImportSettings {
    fn id(&self) -> &'static str {
        "import-settings"
    }

    fn group(&self) -> StepGroup {
        StepGroup::DatabaseImport
    }

    async fn execute(&self, _ctx: &mut RunContext) -> Result<(), StepError> {
        tracing::warn!(
            step = self.id(),
            "the routes configuration is not migrated (rarely customized)"
        );
        Ok(())
    }
}

contract_step!(ImportUsers, "import-users", StepGroup::DatabaseImport);
contract_step!(ImportItemTypes, "import-item-types", StepGroup::DatabaseImport);
contract_step!(ImportCollections, "import-collections", StepGroup::DatabaseImport);
contract_step!(ImportItems, "import-items", StepGroup::DatabaseImport);
contract_step!(ImportFiles, "import-files", StepGroup::DatabaseImport);
contract_step!(CopyFiles, "copy-files", StepGroup::FileCopy);
contract_step!(CopyThemes, "copy-themes", StepGroup::FileCopy);

macro_rules! compat_step {
    ($name:ident, $id:literal) => {
        pub struct $name;

        #[async_trait]
        impl MigrationStep for $name {
            fn id(&self) -> &'static str {
                $id
            }

            fn group(&self) -> StepGroup {
                StepGroup::PostInstall
            }

            async fn execute(&self, _ctx: &mut RunContext) -> Result<(), StepError> {
                tracing::debug!(
                    step = self.id(),
                    "no compatibility module is published for this release"
                );
                Ok(())
            }
        }
    };
}

compat_step!(FetchCompatModule, "fetch-compat-module");
compat_step!(UnpackCompatModule, "unpack-compat-module");
compat_step!(InstallCompatModule, "install-compat-module");
