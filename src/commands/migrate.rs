// ABOUTME: Migrate command implementation.
// ABOUTME: Gates the pipeline behind both check phases, then drives it to completion.

use super::report_findings;
use metoikos::check::{
    EnvironmentChecker, EnvironmentInfo, PrecheckContext, TopologyValidator,
};
use metoikos::db::{MySqlConnector, MySqlSource, TargetConnector};
use metoikos::error::{Error, Result};
use metoikos::measure::{FsMeasure, ResourceMeasurement};
use metoikos::params::ParameterSet;
use metoikos::pipeline::{Executor, RunContext, RunState};
use metoikos::release::RELEASE;
use metoikos::steps::{HttpFetcher, default_pipeline};
use std::sync::Arc;

/// Validate feasibility, then run the migration pipeline.
///
/// Nothing destructive happens until both phases return empty; from the
/// first step on, a failure leaves everything as it was at that moment
/// for manual inspection.
pub async fn migrate(params: ParameterSet, background_job: bool) -> Result<()> {
    let source = MySqlSource::connect(&params.source).await?;
    let env = EnvironmentInfo::detect(&params);
    let ctx = PrecheckContext {
        is_background_job: background_job,
    };

    let mut executor = Executor::new();

    println!("Running prechecks...");
    executor.begin_prechecks();
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &source);
    let prechecks = checker.run_prechecks(&params.source.version, &ctx).await;
    report_findings(&prechecks);
    if !prechecks.is_empty() {
        return Err(Error::NotFeasible(prechecks.len()));
    }

    println!("Running checks...");
    executor.begin_checks();
    let connector: Arc<dyn TargetConnector> = Arc::new(MySqlConnector);
    let validator = TopologyValidator::new(&source, connector.as_ref(), &FsMeasure, &RELEASE);
    let mut measurement = ResourceMeasurement::default();
    let checks = validator.run_checks(&params, &mut measurement).await;
    report_findings(&checks);
    if !checks.is_empty() {
        return Err(Error::NotFeasible(checks.len()));
    }

    println!("Starting the migration pipeline...");
    let steps = default_pipeline(Arc::clone(&connector), Arc::new(HttpFetcher::new()));
    let mut run_ctx = RunContext::new(params, RELEASE, measurement);
    let report = executor.run(&steps, &mut run_ctx).await;

    match report.state {
        RunState::Completed => {
            println!(
                "  ✓ Migration completed: {} step(s) in {}s",
                report.completed_steps.len(),
                (report.finished_at - report.started_at).num_seconds()
            );
            Ok(())
        }
        RunState::Aborted { step, reason } => {
            let id = steps
                .iter()
                .nth(step)
                .map(|s| s.id())
                .unwrap_or("unknown");
            eprintln!("  ✗ Step \"{id}\" failed: {reason}");
            eprintln!(
                "    The base dir and the destination database are left as they were \
                 at the moment of failure."
            );
            Err(Error::Aborted {
                step: id.to_string(),
                reason,
            })
        }
        other => unreachable!("executor returned a non-terminal state: {other:?}"),
    }
}
