// ABOUTME: Job-queue provider: how many migration jobs are already active.
// ABOUTME: Backs the single-active-run guard checked at precheck time.

use crate::db::DbError;
use async_trait::async_trait;

/// Counts jobs of the migration's own type currently `starting` or
/// `in progress`. This is the only cross-run coordination mechanism; a
/// second invocation is refused at precheck time, never pre-empted later.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn running_jobs(&self) -> Result<u64, DbError>;
}
