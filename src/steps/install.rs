// ABOUTME: Installs the successor schema and seeds its initial data.
// ABOUTME: Mirrors the successor's own installer task sequence.

use crate::pipeline::{MigrationStep, RunContext, StepError, StepGroup};
use async_trait::async_trait;
use regex::Regex;
use serde_json::json;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// Relative location of the schema blob inside the unpacked package.
pub const SCHEMA_PATH: &str = "application/data/install/schema.sql";

/// Relative location of the versioned migration-definition files.
pub const MIGRATIONS_DIR: &str = "application/data/migrations";

static MIGRATION_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)_(\w+)\.\w+$").expect("valid pattern"));

pub struct InstallSchema;

#[async_trait]
impl MigrationStep for InstallSchema {
    fn id(&self) -> &'static str {
        "install-schema"
    }

    fn group(&self) -> StepGroup {
        StepGroup::Install
    }

    async fn execute(&self, ctx: &mut RunContext) -> Result<(), StepError> {
        // No session exists yet and no cache has been primed, so the first
        // two installer tasks of the successor have nothing to do.
        tracing::debug!(step = self.id(), task = "destroy session", "installer task ended (nothing to do)");
        tracing::debug!(step = self.id(), task = "clear cache", "installer task ended (nothing to do)");

        let schema_path = ctx.install_path(SCHEMA_PATH);
        let schema_sql = std::fs::read_to_string(&schema_path)?;
        ctx.target()?.execute_batch(&schema_sql).await?;
        tracing::debug!(step = self.id(), task = "install schema", "installer task ended");

        let migrations_dir = ctx.install_path(MIGRATIONS_DIR);
        let versions = scan_migration_versions(&migrations_dir)?;
        ctx.target()?.record_migrations(&versions).await?;
        tracing::debug!(
            step = self.id(),
            task = "record migrations",
            count = versions.len(),
            "installer task ended"
        );

        for script in ctx.params.seed_scripts.clone() {
            let sql = std::fs::read_to_string(&script)?;
            ctx.target()?.execute_batch(&sql).await?;
            tracing::debug!(step = self.id(), script = %script.display(), "seed script executed");
        }

        tracing::debug!(
            step = self.id(),
            task = "create first user",
            "installer task skipped (processed with the user import)"
        );

        let email = ctx
            .params
            .admin_email
            .clone()
            .ok_or(StepError::MissingAdminEmail)?;
        let title = ctx.params.installation_title.clone();
        let time_zone = ctx.params.time_zone.clone();
        let target = ctx.target()?;
        target
            .insert_setting("administrator_email", &json!(email))
            .await?;
        target
            .insert_setting("installation_title", &json!(title))
            .await?;
        target.insert_setting("time_zone", &json!(time_zone)).await?;
        tracing::debug!(step = self.id(), task = "add default settings", "installer task ended");

        tracing::info!(
            step = self.id(),
            "the main tables are created and default data inserted"
        );
        Ok(())
    }
}

/// Collect every migration version identifier under `dir`, in filename
/// order, each exactly once.
pub fn scan_migration_versions(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();

    let mut seen = HashSet::new();
    let mut versions = Vec::new();
    for name in names {
        if let Some(captures) = MIGRATION_FILENAME.captures(&name) {
            let version = captures[1].to_string();
            if seen.insert(version.clone()) {
                versions.push(version);
            }
        }
    }
    Ok(versions)
}
