// ABOUTME: Writes the destination database config file and opens the target handle.
// ABOUTME: The handle created here is owned by the run for all later steps.

use crate::db::{DbEndpoint, TargetConnector};
use crate::params::DatabaseTopology;
use crate::pipeline::{MigrationStep, RunContext, StepError, StepGroup};
use async_trait::async_trait;
use std::sync::Arc;

/// Relative location of the config file inside the unpacked installation.
pub const DATABASE_CONFIG_PATH: &str = "config/database.ini";

pub struct WriteConfig {
    connector: Arc<dyn TargetConnector>,
}

impl WriteConfig {
    pub fn new(connector: Arc<dyn TargetConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl MigrationStep for WriteConfig {
    fn id(&self) -> &'static str {
        "write-config"
    }

    fn group(&self) -> StepGroup {
        StepGroup::Install
    }

    async fn execute(&self, ctx: &mut RunContext) -> Result<(), StepError> {
        let endpoint = destination_endpoint(ctx);

        let config_path = ctx.install_path(DATABASE_CONFIG_PATH);
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&config_path, render_database_config(&endpoint))
            .map_err(|_| StepError::WriteConfig(config_path.clone()))?;
        tracing::info!(step = self.id(), path = %config_path.display(), "database config written");

        // The connection is checked even for a shared database.
        let target = self.connector.connect(&endpoint).await?;

        // The checks phase already validated this, but the state may have
        // changed since; at this point a collision is fatal, not a finding.
        match &ctx.params.database {
            DatabaseTopology::Separate { name, .. } => {
                if target.table_count().await? != 0 {
                    return Err(StepError::TargetNotEmpty(name.clone()));
                }
            }
            DatabaseTopology::Shared { .. } => {
                let names = target.table_names().await?;
                if names
                    .iter()
                    .any(|t| ctx.release.default_tables.contains(&t.as_str()))
                {
                    return Err(StepError::TableCollision);
                }
            }
        }

        ctx.set_target(target);
        Ok(())
    }
}

/// Coordinates the successor will connect with: the declared separate
/// database, or the legacy one when the topology is shared.
fn destination_endpoint(ctx: &RunContext) -> DbEndpoint {
    match &ctx.params.database {
        DatabaseTopology::Separate {
            host,
            port,
            username,
            password,
            name,
        } => DbEndpoint {
            host: host.clone(),
            port: *port,
            username: username.clone(),
            password: password.clone(),
            name: name.clone(),
        },
        DatabaseTopology::Shared { .. } => {
            let source = &ctx.params.source;
            DbEndpoint {
                host: source.host.clone(),
                port: source.port,
                username: source.username.clone(),
                password: source.password.clone(),
                name: source.name.clone(),
            }
        }
    }
}

/// Render the `key = "value"` config file, commenting out unset optional
/// keys rather than omitting them.
fn render_database_config(endpoint: &DbEndpoint) -> String {
    let mut out = String::new();
    out.push_str(&format!("user     = \"{}\"\n", endpoint.username));
    out.push_str(&format!("password = \"{}\"\n", endpoint.password));
    out.push_str(&format!("dbname   = \"{}\"\n", endpoint.name));
    out.push_str(&format!("host     = \"{}\"\n", endpoint.host));
    match endpoint.port {
        Some(port) => out.push_str(&format!("port     = \"{port}\"\n")),
        None => out.push_str(";port     = \n"),
    }
    out.push_str(";unix_socket = \"\"\n");
    out.push_str(";log_path = \"\"\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(port: Option<u16>) -> DbEndpoint {
        DbEndpoint {
            host: "db.example.org".into(),
            port,
            username: "succ".into(),
            password: "s3cret".into(),
            name: "successor".into(),
        }
    }

    #[test]
    fn renders_all_keys_with_port() {
        let config = render_database_config(&endpoint(Some(3307)));
        assert_eq!(
            config,
            "user     = \"succ\"\n\
             password = \"s3cret\"\n\
             dbname   = \"successor\"\n\
             host     = \"db.example.org\"\n\
             port     = \"3307\"\n\
             ;unix_socket = \"\"\n\
             ;log_path = \"\"\n"
        );
    }

    #[test]
    fn unset_port_is_commented_out() {
        let config = render_database_config(&endpoint(None));
        assert!(config.contains("\n;port     = \n"));
    }
}
