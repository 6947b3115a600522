// ABOUTME: Phase-two validator: database topology, filesystem probe, capacity.
// ABOUTME: Collects all findings; early returns only where a sub-check cannot continue.

use super::capacity;
use super::filesystem;
use super::finding::Findings;
use crate::db::{DbEndpoint, SourceDatabase, TargetConnector};
use crate::measure::{Measure, ResourceMeasurement};
use crate::params::{DatabaseTopology, ParameterSet};
use crate::release::ReleaseSpec;
use crate::types::TablePrefix;

/// Runs the phase-two checks against a requested destination topology.
pub struct TopologyValidator<'a> {
    source: &'a dyn SourceDatabase,
    connector: &'a dyn TargetConnector,
    measure: &'a dyn Measure,
    release: &'a ReleaseSpec,
}

impl<'a> TopologyValidator<'a> {
    pub fn new(
        source: &'a dyn SourceDatabase,
        connector: &'a dyn TargetConnector,
        measure: &'a dyn Measure,
        release: &'a ReleaseSpec,
    ) -> Self {
        Self {
            source,
            connector,
            measure,
            release,
        }
    }

    /// Evaluate the topology, filesystem, and capacity checks in order,
    /// capturing measurements along the way.
    pub async fn run_checks(
        &self,
        params: &ParameterSet,
        measurement: &mut ResourceMeasurement,
    ) -> Findings {
        let mut findings = Findings::new();

        self.check_database(params, &mut findings, measurement).await;
        filesystem::check_filesystem(params, self.measure, &mut findings, measurement);
        findings.extend(capacity::check_free_size(
            params.files,
            self.release.base_install_size,
            measurement,
        ));

        findings
    }

    async fn check_database(
        &self,
        params: &ParameterSet,
        findings: &mut Findings,
        measurement: &mut ResourceMeasurement,
    ) {
        let source = self.source.endpoint();
        if source.name.is_empty() {
            findings.check("Unable to get the database name.");
            return;
        }
        if source.host.is_empty() {
            findings.check("Unable to get the database host.");
            return;
        }

        // Data + index is the live footprint; data_free is fragmentation
        // that an export would still have to walk.
        let data_size = self.source.schema_data_size().await.ok().flatten();
        let free_size = self.source.schema_free_size().await.ok().flatten();
        let database_size = data_size.unwrap_or(0) + free_size.unwrap_or(0);
        measurement.source_database_size = database_size;
        if data_size.unwrap_or(0) == 0 || database_size == 0 {
            findings.check("Cannot evaluate the size of the legacy database.");
        }

        match &params.database {
            DatabaseTopology::Separate {
                host,
                port,
                username,
                password,
                name,
            } => {
                self.check_separate(
                    source, host, *port, username, password, name, findings,
                )
                .await;
            }
            DatabaseTopology::Shared { prefix } => {
                self.check_shared(prefix, findings).await;
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn check_separate(
        &self,
        source: &DbEndpoint,
        host: &str,
        port: Option<u16>,
        username: &str,
        password: &str,
        name: &str,
        findings: &mut Findings,
    ) {
        for (field, value) in [("host", host), ("username", username), ("name", name)] {
            if value.is_empty() {
                findings.check(format!(
                    "The param \"{field}\" should be set when the databases are separate."
                ));
            }
        }
        if name == source.name && host == source.host {
            findings.check(
                "The database name should be different from the legacy one when the \
                 databases are separate, but on the same server.",
            );
        }

        let endpoint = DbEndpoint {
            host: host.to_string(),
            port,
            username: username.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        let target = match self.connector.connect(&endpoint).await {
            Ok(target) => target,
            Err(e) => {
                findings.check(format!("Cannot access the database \"{name}\": {e}"));
                return;
            }
        };

        match target.table_count().await {
            Ok(0) => {}
            Ok(_) => {
                findings.check(format!("The database \"{name}\" should be empty."));
            }
            Err(e) => {
                findings.check(format!(
                    "Cannot count the tables of the database \"{name}\": {e}"
                ));
            }
        }
    }

    async fn check_shared(&self, prefix: &str, findings: &mut Findings) {
        if prefix.is_empty() {
            findings.check("A database prefix is required when the database is shared.");
            return;
        }
        if let Err(e) = TablePrefix::new(prefix) {
            findings.check(format!("The database prefix \"{prefix}\" is not usable: {e}."));
            return;
        }
        if prefix == self.source.table_prefix() {
            findings.check(
                "The database prefix should be different from the legacy one when the \
                 database is shared.",
            );
            return;
        }

        let tables = match self.source.table_names().await {
            Ok(tables) if !tables.is_empty() => tables,
            Ok(_) | Err(_) => {
                findings.check("Cannot get the list of the tables of the legacy database.");
                return;
            }
        };

        if tables.iter().any(|t| t.starts_with(prefix)) {
            findings.check(format!(
                "The prefix \"{prefix}\" cannot be used, because it causes a conflict \
                 in the table names of the legacy database."
            ));
            return;
        }

        // Non-fatal: later checks still run.
        if tables
            .iter()
            .any(|t| self.release.default_tables.contains(&t.as_str()))
        {
            findings.check(
                "Some table names of the successor platform already exist in the \
                 legacy database.",
            );
        }
    }
}
