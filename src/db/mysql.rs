// ABOUTME: sqlx-backed MySQL implementations of the database provider traits.
// ABOUTME: Also the job-queue provider, which lives in the legacy schema.

use super::{DbEndpoint, DbError, SourceDatabase, TargetConnector, TargetDatabase, TargetHandle};
use crate::jobs::JobQueue;
use crate::params::SourceParams;
use async_trait::async_trait;
use sqlx::Row;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

/// Legacy-database connection. Read-only by policy: nothing in this type
/// issues a write against the source schema.
pub struct MySqlSource {
    pool: MySqlPool,
    endpoint: DbEndpoint,
    prefix: String,
}

impl MySqlSource {
    pub async fn connect(params: &SourceParams) -> Result<Self, DbError> {
        let endpoint = DbEndpoint {
            host: params.host.clone(),
            port: params.port,
            username: params.username.clone(),
            password: params.password.clone(),
            name: params.name.clone(),
        };
        let pool = open_pool(&endpoint).await?;
        Ok(Self {
            pool,
            endpoint,
            prefix: params.prefix.clone(),
        })
    }

    async fn schema_sum(&self, expr: &str) -> Result<Option<u64>, DbError> {
        let sql = format!(
            "SELECT CAST(SUM({expr}) AS UNSIGNED) FROM information_schema.tables \
             WHERE table_schema = ?"
        );
        let size: Option<u64> = sqlx::query_scalar(&sql)
            .bind(&self.endpoint.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(size)
    }
}

#[async_trait]
impl SourceDatabase for MySqlSource {
    fn endpoint(&self) -> &DbEndpoint {
        &self.endpoint
    }

    fn table_prefix(&self) -> &str {
        &self.prefix
    }

    async fn server_version(&self) -> Result<Option<String>, DbError> {
        let row = sqlx::query("SHOW VARIABLES LIKE 'version'")
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(row.try_get::<String, _>(1)?)),
            None => Ok(None),
        }
    }

    async fn schema_data_size(&self) -> Result<Option<u64>, DbError> {
        self.schema_sum("data_length + index_length").await
    }

    async fn schema_free_size(&self) -> Result<Option<u64>, DbError> {
        self.schema_sum("data_free").await
    }

    async fn table_names(&self) -> Result<Vec<String>, DbError> {
        let rows = sqlx::query("SHOW TABLES").fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>(0).map_err(DbError::from))
            .collect()
    }
}

#[async_trait]
impl JobQueue for MySqlSource {
    async fn running_jobs(&self) -> Result<u64, DbError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {}processes WHERE status IN ('starting', 'in progress')",
            self.prefix
        );
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }
}

/// Opens destination connections.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlConnector;

#[async_trait]
impl TargetConnector for MySqlConnector {
    async fn connect(&self, endpoint: &DbEndpoint) -> Result<TargetHandle, DbError> {
        let pool = open_pool(endpoint).await?;
        Ok(Box::new(MySqlTarget {
            pool,
            endpoint: endpoint.clone(),
        }))
    }
}

struct MySqlTarget {
    pool: MySqlPool,
    endpoint: DbEndpoint,
}

#[async_trait]
impl TargetDatabase for MySqlTarget {
    fn endpoint(&self) -> &DbEndpoint {
        &self.endpoint
    }

    async fn table_count(&self) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ?",
        )
        .bind(&self.endpoint.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.max(0) as u64)
    }

    async fn table_names(&self) -> Result<Vec<String>, DbError> {
        let rows = sqlx::query("SHOW TABLES").fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>(0).map_err(DbError::from))
            .collect()
    }

    async fn execute_batch(&self, sql: &str) -> Result<(), DbError> {
        for statement in split_statements(sql) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn record_migrations(&self, versions: &[String]) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        for version in versions {
            sqlx::query("INSERT INTO migration (version) VALUES (?)")
                .bind(version)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn insert_setting(&self, id: &str, value: &serde_json::Value) -> Result<(), DbError> {
        sqlx::query("INSERT INTO setting (id, value) VALUES (?, ?)")
            .bind(id)
            .bind(value.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

async fn open_pool(endpoint: &DbEndpoint) -> Result<MySqlPool, DbError> {
    let mut options = MySqlConnectOptions::new()
        .host(&endpoint.host)
        .username(&endpoint.username)
        .password(&endpoint.password)
        .database(&endpoint.name);
    if let Some(port) = endpoint.port {
        options = options.port(port);
    }

    MySqlPoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await
        .map_err(|source| DbError::Connect {
            name: endpoint.name.clone(),
            source,
        })
}

/// Split an opaque SQL blob into executable statements.
///
/// Schema and seed dumps are plain semicolon-separated statements; comment
/// lines are stripped. Statement bodies containing literal semicolons are
/// not supported by this splitter.
fn split_statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';').map(str::trim).filter(|s| {
        !s.is_empty() && !s.lines().all(|l| l.trim().is_empty() || l.trim_start().starts_with("--"))
    })
}
