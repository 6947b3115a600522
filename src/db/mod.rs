// ABOUTME: Database provider traits for the source and destination databases.
// ABOUTME: The source is read-only; the destination handle is owned by the run.

mod mysql;

pub use mysql::{MySqlConnector, MySqlSource};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("cannot access the database \"{name}\": {source}")]
    Connect {
        name: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("{0}")]
    Provider(String),
}

/// Connection coordinates for one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbEndpoint {
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    pub name: String,
}

/// Read-only view of the legacy database.
#[async_trait]
pub trait SourceDatabase: Send + Sync {
    /// Coordinates of the source database, reused by the shared topology.
    fn endpoint(&self) -> &DbEndpoint;

    /// Table prefix of the legacy application, empty if none.
    fn table_prefix(&self) -> &str;

    /// Raw server version string, if the server reports one.
    async fn server_version(&self) -> Result<Option<String>, DbError>;

    /// Sum of data and index bytes across the source schema.
    async fn schema_data_size(&self) -> Result<Option<u64>, DbError>;

    /// Sum of fragmentation free space across the source schema.
    async fn schema_free_size(&self) -> Result<Option<u64>, DbError>;

    /// Every table name in the source schema.
    async fn table_names(&self) -> Result<Vec<String>, DbError>;
}

/// The destination database handle, exclusively owned by the run once
/// the configure step creates it.
#[async_trait]
pub trait TargetDatabase: Send + Sync {
    fn endpoint(&self) -> &DbEndpoint;

    /// Number of tables existing in the destination schema.
    async fn table_count(&self) -> Result<u64, DbError>;

    async fn table_names(&self) -> Result<Vec<String>, DbError>;

    /// Execute an opaque SQL blob (schema or seed script).
    async fn execute_batch(&self, sql: &str) -> Result<(), DbError>;

    /// Insert one row per detected schema-migration version.
    async fn record_migrations(&self, versions: &[String]) -> Result<(), DbError>;

    /// Insert an initial setting row with a JSON-encoded value.
    async fn insert_setting(&self, id: &str, value: &serde_json::Value) -> Result<(), DbError>;
}

pub type TargetHandle = Box<dyn TargetDatabase>;

/// Opens destination connections for checks and for the configure step.
#[async_trait]
pub trait TargetConnector: Send + Sync {
    async fn connect(&self, endpoint: &DbEndpoint) -> Result<TargetHandle, DbError>;
}
