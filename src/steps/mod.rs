// ABOUTME: Built-in pipeline steps and the default step list.
// ABOUTME: The list order is the execution order; groups are documentation.

mod configure;
mod create_dir;
mod download;
mod import;
mod install;
mod unpack;

pub use configure::{DATABASE_CONFIG_PATH, WriteConfig};
pub use create_dir::CreateDirectory;
pub use download::{DownloadPackage, FetchError, HttpFetcher, PackageFetcher, sha256_hex};
pub use import::{
    CopyFiles, CopyThemes, FetchCompatModule, ImportCollections, ImportFiles, ImportItemTypes,
    ImportItems, ImportSettings, ImportUsers, InstallCompatModule, UnpackCompatModule,
};
pub use install::{MIGRATIONS_DIR, SCHEMA_PATH, InstallSchema, scan_migration_versions};
pub use unpack::UnpackPackage;

use crate::db::TargetConnector;
use crate::pipeline::MigrationStep;
use nonempty::NonEmpty;
use std::sync::Arc;

/// The full migration pipeline, in execution order.
pub fn default_pipeline(
    connector: Arc<dyn TargetConnector>,
    fetcher: Arc<dyn PackageFetcher>,
) -> NonEmpty<Box<dyn MigrationStep>> {
    let steps: Vec<Box<dyn MigrationStep>> = vec![
        // Installation.
        Box::new(CreateDirectory),
        Box::new(DownloadPackage::new(fetcher)),
        Box::new(UnpackPackage),
        Box::new(WriteConfig::new(connector)),
        Box::new(InstallSchema),
        // Database import.
        Box::new(ImportSettings),
        Box::new(ImportUsers),
        Box::new(ImportItemTypes),
        Box::new(ImportCollections),
        Box::new(ImportItems),
        Box::new(ImportFiles),
        // Files.
        Box::new(CopyFiles),
        Box::new(CopyThemes),
        // Post-install tasks.
        Box::new(FetchCompatModule),
        Box::new(UnpackCompatModule),
        Box::new(InstallCompatModule),
    ];
    NonEmpty::from_vec(steps).expect("the built-in pipeline is never empty")
}
