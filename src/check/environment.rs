// ABOUTME: Phase-one precheck engine: environment, runtime, server, job queue.
// ABOUTME: Stateless and read-only; every rule runs and failures accumulate.

use super::finding::Findings;
use crate::db::SourceDatabase;
use crate::jobs::JobQueue;
use crate::params::{DispatcherMode, ParameterSet};
use crate::release::ReleaseSpec;
use crate::version;
use std::collections::BTreeSet;
use std::process::Command;

/// Snapshot of the host environment, gathered once and injected.
///
/// Checks read this value instead of probing process-wide state, so a
/// front-end (or a test) can describe any environment it likes.
#[derive(Debug, Clone)]
pub struct EnvironmentInfo {
    pub os: HostOs,
    /// Identity string of the invoking web server, when one is present.
    pub server_software: Option<String>,
    /// Host runtime version, `None` when it could not be determined.
    pub runtime_version: Option<String>,
    /// Lowercased names of runtime extensions that are loadable.
    pub loaded_extensions: BTreeSet<String>,
    pub dispatcher: DispatcherConfig,
    pub archive: ArchiveCapability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Linux,
    Windows,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else if std::env::consts::OS == "linux" {
            HostOs::Linux
        } else {
            HostOs::Other
        }
    }
}

/// Job-dispatcher state of the legacy host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatcherConfig {
    /// The legacy configuration could not be read at all.
    Missing,
    /// Configuration present but no long-running dispatcher entry.
    Undefined,
    Mode(DispatcherMode),
}

/// How downloaded packages can be extracted on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveCapability {
    /// The built-in extractor is available.
    Library,
    /// An external archive command responded to a probe.
    Command,
    /// Neither; `error` carries the probe's captured error text.
    Missing { error: String },
}

impl EnvironmentInfo {
    /// Gather a best-effort snapshot of the current host.
    pub fn detect(params: &ParameterSet) -> Self {
        let runtime_version = Command::new("php")
            .args(["-r", "echo PHP_VERSION;"])
            .output()
            .ok()
            .filter(|out| out.status.success())
            .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
            .filter(|v| !v.is_empty());

        let loaded_extensions = Command::new("php")
            .arg("-m")
            .output()
            .ok()
            .filter(|out| out.status.success())
            .map(|out| {
                String::from_utf8_lossy(&out.stdout)
                    .lines()
                    .map(|l| l.trim().to_lowercase())
                    .filter(|l| !l.is_empty() && !l.starts_with('['))
                    .collect()
            })
            .unwrap_or_default();

        let dispatcher = match params.source.dispatcher {
            Some(mode) => DispatcherConfig::Mode(mode),
            None => DispatcherConfig::Undefined,
        };

        EnvironmentInfo {
            os: HostOs::current(),
            server_software: std::env::var("SERVER_SOFTWARE").ok(),
            runtime_version,
            loaded_extensions,
            dispatcher,
            // The extractor is linked into this binary.
            archive: ArchiveCapability::Library,
        }
    }
}

/// Invocation context for the precheck phase, passed explicitly rather
/// than inferred from ambient process state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecheckContext {
    /// True when this process *is* the background migration job.
    pub is_background_job: bool,
}

/// Runs the phase-one prechecks. Never mutates anything.
pub struct EnvironmentChecker<'a> {
    env: &'a EnvironmentInfo,
    release: &'a ReleaseSpec,
    source: &'a dyn SourceDatabase,
    jobs: &'a dyn JobQueue,
}

impl<'a> EnvironmentChecker<'a> {
    pub fn new(
        env: &'a EnvironmentInfo,
        release: &'a ReleaseSpec,
        source: &'a dyn SourceDatabase,
        jobs: &'a dyn JobQueue,
    ) -> Self {
        Self {
            env,
            release,
            source,
            jobs,
        }
    }

    /// Evaluate every precheck rule and return the accumulated findings.
    pub async fn run_prechecks(
        &self,
        current_version: &str,
        ctx: &PrecheckContext,
    ) -> Findings {
        let mut findings = Findings::new();

        self.check_version(current_version, &mut findings);
        if !ctx.is_background_job {
            self.check_dispatcher(&mut findings);
            // The server identity is unavailable inside the background job.
            self.check_server(&mut findings);
        }
        self.check_runtime(&mut findings);
        self.check_extensions(&mut findings);
        self.check_database_server(&mut findings).await;
        self.check_archive_capability(&mut findings);
        if !ctx.is_background_job {
            self.check_jobs(&mut findings).await;
        }

        findings
    }

    fn check_version(&self, current: &str, findings: &mut Findings) {
        if !version::at_least(current, self.release.min_legacy_version) {
            findings.precheck(format!(
                "The current release requires at least legacy version {}, current is only {}.",
                self.release.min_legacy_version, current
            ));
        }

        if !version::at_most(current, self.release.max_legacy_version) {
            findings.precheck(format!(
                "The current release requires at most legacy version {}, current is {}.",
                self.release.max_legacy_version, current
            ));
        }
    }

    fn check_dispatcher(&self, findings: &mut Findings) {
        match &self.env.dispatcher {
            DispatcherConfig::Mode(DispatcherMode::Background) => {}
            DispatcherConfig::Mode(DispatcherMode::Synchronous) => {
                findings.precheck(
                    "The migration should run in the background: change the long-running \
                     job dispatcher in the configuration of the legacy installation.",
                );
            }
            DispatcherConfig::Undefined => {
                findings.precheck(
                    "The background job dispatcher is not defined in the configuration \
                     of the legacy installation.",
                );
            }
            DispatcherConfig::Missing => {
                findings
                    .precheck("The configuration of the legacy installation has not been found.");
            }
        }
    }

    fn check_server(&self, findings: &mut Findings) {
        if self.env.os == HostOs::Windows {
            findings.precheck("The successor platform requires a Linux server.");
        }

        let is_apache = self
            .env
            .server_software
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains("apache"));
        if !is_apache {
            findings.precheck("The successor platform requires an Apache server.");
        }
    }

    fn check_runtime(&self, findings: &mut Findings) {
        match self.env.runtime_version.as_deref() {
            Some(current) => {
                if !version::at_least(current, self.release.min_runtime_version) {
                    findings.precheck(format!(
                        "The successor platform requires at least runtime {} and prefers \
                         the latest stable release.",
                        self.release.min_runtime_version
                    ));
                }
            }
            None => {
                findings.precheck("The version of the host runtime cannot be determined.");
            }
        }
    }

    fn check_extensions(&self, findings: &mut Findings) {
        for extension in self.release.required_extensions {
            if !self.env.loaded_extensions.contains(*extension) {
                findings.precheck(format!(
                    "The successor platform requires the runtime extension \"{extension}\"."
                ));
            }
        }
    }

    async fn check_database_server(&self, findings: &mut Findings) {
        match self.source.server_version().await {
            Ok(Some(raw)) => {
                let lower = raw.to_lowercase();
                let mariadb = lower.contains("-mariadb");
                let current = lower.split('-').next().unwrap_or(&lower);
                let minimum = if mariadb {
                    self.release.min_mariadb_version
                } else {
                    self.release.min_mysql_version
                };
                if !version::at_least(current, minimum) {
                    findings.precheck(format!(
                        "The current release requires at least MariaDB {} or MySQL {}, \
                         current is only {} {}.",
                        self.release.min_mariadb_version,
                        self.release.min_mysql_version,
                        if mariadb { "MariaDB" } else { "MySQL" },
                        current
                    ));
                }
            }
            Ok(None) => {
                findings.precheck("The version of the database server cannot be checked.");
            }
            Err(e) => {
                findings.precheck(format!(
                    "The version of the database server cannot be checked: {e}."
                ));
            }
        }
    }

    fn check_archive_capability(&self, findings: &mut Findings) {
        if let ArchiveCapability::Missing { error } = &self.env.archive {
            findings.precheck(
                "An archive extraction capability (the built-in extractor or an external \
                 tar command) is required to unpack downloaded packages.",
            );
            findings.precheck(format!("The shell returned an error: {error}"));
        }
    }

    async fn check_jobs(&self, findings: &mut Findings) {
        match self.jobs.running_jobs().await {
            Ok(0) => {}
            Ok(1) => findings.precheck("1 job is running."),
            Ok(n) => findings.precheck(format!("{n} jobs are running.")),
            Err(e) => findings.precheck(format!("Cannot count the running jobs: {e}.")),
        }
    }
}
