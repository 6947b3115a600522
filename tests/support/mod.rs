// ABOUTME: Shared fakes for integration tests: databases, connectors, measures, fetchers.
// ABOUTME: Every fake is deterministic and records what was asked of it.

#![allow(dead_code)]

use async_trait::async_trait;
use metoikos::check::{ArchiveCapability, DispatcherConfig, EnvironmentInfo, HostOs};
use metoikos::db::{
    DbEndpoint, DbError, SourceDatabase, TargetConnector, TargetDatabase, TargetHandle,
};
use metoikos::jobs::JobQueue;
use metoikos::measure::Measure;
use metoikos::params::{DispatcherMode, ParameterSet};
use metoikos::steps::{FetchError, PackageFetcher};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An environment that passes every precheck.
pub fn healthy_env() -> EnvironmentInfo {
    EnvironmentInfo {
        os: HostOs::Linux,
        server_software: Some("Apache/2.4.57 (Debian)".to_string()),
        runtime_version: Some("8.2.7".to_string()),
        loaded_extensions: BTreeSet::from(["pdo".to_string(), "pdo_mysql".to_string()]),
        dispatcher: DispatcherConfig::Mode(DispatcherMode::Background),
        archive: ArchiveCapability::Library,
    }
}

/// A healthy legacy database view.
pub struct FakeSource {
    pub endpoint: DbEndpoint,
    pub prefix: String,
    pub server_version: Option<String>,
    pub data_size: Option<u64>,
    pub free_size: Option<u64>,
    pub tables: Vec<String>,
}

impl Default for FakeSource {
    fn default() -> Self {
        Self {
            endpoint: DbEndpoint {
                host: "localhost".to_string(),
                port: None,
                username: "legacy".to_string(),
                password: String::new(),
                name: "legacy".to_string(),
            },
            prefix: "legacy_".to_string(),
            server_version: Some("10.6.12-MariaDB-log".to_string()),
            data_size: Some(80_000_000),
            free_size: Some(20_000_000),
            tables: vec![
                "legacy_items".to_string(),
                "legacy_collections".to_string(),
                "legacy_processes".to_string(),
            ],
        }
    }
}

#[async_trait]
impl SourceDatabase for FakeSource {
    fn endpoint(&self) -> &DbEndpoint {
        &self.endpoint
    }

    fn table_prefix(&self) -> &str {
        &self.prefix
    }

    async fn server_version(&self) -> Result<Option<String>, DbError> {
        Ok(self.server_version.clone())
    }

    async fn schema_data_size(&self) -> Result<Option<u64>, DbError> {
        Ok(self.data_size)
    }

    async fn schema_free_size(&self) -> Result<Option<u64>, DbError> {
        Ok(self.free_size)
    }

    async fn table_names(&self) -> Result<Vec<String>, DbError> {
        Ok(self.tables.clone())
    }
}

pub struct FakeJobs {
    pub running: u64,
}

#[async_trait]
impl JobQueue for FakeJobs {
    async fn running_jobs(&self) -> Result<u64, DbError> {
        Ok(self.running)
    }
}

/// Everything a fake destination database observed.
#[derive(Debug, Default)]
pub struct TargetState {
    /// Tables that pre-exist in the destination schema.
    pub existing_tables: Vec<String>,
    pub executed_batches: Vec<String>,
    pub migrations: Vec<String>,
    /// (id, raw JSON) pairs inserted as settings.
    pub settings: Vec<(String, String)>,
    pub connects: usize,
}

pub struct FakeConnector {
    pub state: Arc<Mutex<TargetState>>,
    /// When set, every connection attempt fails with this message.
    pub unreachable: Option<String>,
}

impl FakeConnector {
    pub fn reachable(state: Arc<Mutex<TargetState>>) -> Self {
        Self {
            state,
            unreachable: None,
        }
    }

    pub fn unreachable(message: &str) -> Self {
        Self {
            state: Arc::default(),
            unreachable: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl TargetConnector for FakeConnector {
    async fn connect(&self, endpoint: &DbEndpoint) -> Result<TargetHandle, DbError> {
        if let Some(message) = &self.unreachable {
            return Err(DbError::Provider(message.clone()));
        }
        self.state.lock().unwrap().connects += 1;
        Ok(Box::new(FakeTarget {
            endpoint: endpoint.clone(),
            state: Arc::clone(&self.state),
        }))
    }
}

pub struct FakeTarget {
    pub endpoint: DbEndpoint,
    pub state: Arc<Mutex<TargetState>>,
}

#[async_trait]
impl TargetDatabase for FakeTarget {
    fn endpoint(&self) -> &DbEndpoint {
        &self.endpoint
    }

    async fn table_count(&self) -> Result<u64, DbError> {
        Ok(self.state.lock().unwrap().existing_tables.len() as u64)
    }

    async fn table_names(&self) -> Result<Vec<String>, DbError> {
        Ok(self.state.lock().unwrap().existing_tables.clone())
    }

    async fn execute_batch(&self, sql: &str) -> Result<(), DbError> {
        self.state
            .lock()
            .unwrap()
            .executed_batches
            .push(sql.to_string());
        Ok(())
    }

    async fn record_migrations(&self, versions: &[String]) -> Result<(), DbError> {
        self.state
            .lock()
            .unwrap()
            .migrations
            .extend(versions.iter().cloned());
        Ok(())
    }

    async fn insert_setting(&self, id: &str, value: &serde_json::Value) -> Result<(), DbError> {
        self.state
            .lock()
            .unwrap()
            .settings
            .push((id.to_string(), value.to_string()));
        Ok(())
    }
}

/// Fixed-size measurements, independent of the real filesystem.
pub struct FakeMeasure {
    pub dir_size: u64,
    pub file_count: u64,
    pub free: u64,
}

impl Default for FakeMeasure {
    fn default() -> Self {
        Self {
            dir_size: 500_000_000,
            file_count: 10_000,
            free: 2_000_000_000,
        }
    }
}

impl Measure for FakeMeasure {
    fn directory_size(&self, _path: &Path) -> std::io::Result<u64> {
        Ok(self.dir_size)
    }

    fn file_count(&self, _path: &Path) -> std::io::Result<u64> {
        Ok(self.file_count)
    }

    fn free_space(&self, _path: &Path) -> std::io::Result<u64> {
        Ok(self.free)
    }
}

/// Writes a fixed payload and counts how many transfers were asked for.
pub struct CountingFetcher {
    pub payload: Vec<u8>,
    pub calls: AtomicUsize,
}

impl CountingFetcher {
    pub fn new(payload: &[u8]) -> Self {
        Self {
            payload: payload.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PackageFetcher for CountingFetcher {
    async fn fetch(&self, _url: &str, dest: &Path) -> Result<(), FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut file = std::fs::File::create(dest)?;
        file.write_all(&self.payload)?;
        Ok(())
    }
}

/// Template parameters pointed at test-controlled directories.
pub fn test_params(base_dir: &Path, files_dir: &Path, staging_dir: &Path) -> ParameterSet {
    let mut params = ParameterSet::template();
    params.base_dir = base_dir.to_path_buf();
    params.source.files_dir = files_dir.to_path_buf();
    params.staging_dir = Some(PathBuf::from(staging_dir));
    params
}
