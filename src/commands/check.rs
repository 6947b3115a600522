// ABOUTME: Check command implementation.
// ABOUTME: Runs both validation phases and reports every finding, changing nothing.

use super::report_findings;
use metoikos::check::{
    EnvironmentChecker, EnvironmentInfo, PrecheckContext, TopologyValidator,
};
use metoikos::db::{MySqlConnector, MySqlSource};
use metoikos::error::{Error, Result};
use metoikos::measure::{FsMeasure, ResourceMeasurement};
use metoikos::params::ParameterSet;
use metoikos::release::RELEASE;

/// Run prechecks and checks to completion and print the full checklist.
pub async fn check(params: ParameterSet, background_job: bool) -> Result<()> {
    let source = MySqlSource::connect(&params.source).await?;
    let env = EnvironmentInfo::detect(&params);
    let ctx = PrecheckContext {
        is_background_job: background_job,
    };

    println!("Running prechecks...");
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &source);
    let prechecks = checker.run_prechecks(&params.source.version, &ctx).await;
    report_findings(&prechecks);

    println!("Running checks...");
    let connector = MySqlConnector;
    let validator = TopologyValidator::new(&source, &connector, &FsMeasure, &RELEASE);
    let mut measurement = ResourceMeasurement::default();
    let checks = validator.run_checks(&params, &mut measurement).await;
    report_findings(&checks);

    let total = prechecks.len() + checks.len();
    if total > 0 {
        return Err(Error::NotFeasible(total));
    }

    println!("  ✓ The environment is ready for migration.");
    Ok(())
}
