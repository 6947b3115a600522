// ABOUTME: Tests for the phase-one precheck engine.
// ABOUTME: Every rule accumulates findings; nothing short-circuits or throws.

mod support;

use metoikos::check::{
    ArchiveCapability, DispatcherConfig, EnvironmentChecker, HostOs, PrecheckContext,
};
use metoikos::params::DispatcherMode;
use metoikos::release::RELEASE;
use support::{FakeJobs, FakeSource, healthy_env};

const CURRENT: &str = "2.4.1";

fn foreground() -> PrecheckContext {
    PrecheckContext {
        is_background_job: false,
    }
}

#[tokio::test]
async fn healthy_environment_has_no_findings() {
    let env = healthy_env();
    let source = FakeSource::default();
    let jobs = FakeJobs { running: 0 };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);

    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert!(findings.is_empty(), "unexpected: {:?}", findings.messages());
}

#[tokio::test]
async fn legacy_version_below_minimum_is_reported() {
    let env = healthy_env();
    let source = FakeSource::default();
    let jobs = FakeJobs { running: 0 };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);

    let findings = checker.run_prechecks("2.2", &foreground()).await;
    assert_eq!(findings.len(), 1);
    assert!(findings.any_contains("requires at least legacy version 2.3.1"));
}

#[tokio::test]
async fn legacy_version_above_maximum_is_reported() {
    let env = healthy_env();
    let source = FakeSource::default();
    let jobs = FakeJobs { running: 0 };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);

    let findings = checker.run_prechecks("2.6", &foreground()).await;
    assert_eq!(findings.len(), 1);
    assert!(findings.any_contains("requires at most legacy version 2.5"));
}

#[tokio::test]
async fn synchronous_dispatcher_is_reported() {
    let mut env = healthy_env();
    env.dispatcher = DispatcherConfig::Mode(DispatcherMode::Synchronous);
    let source = FakeSource::default();
    let jobs = FakeJobs { running: 0 };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);

    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert!(findings.any_contains("should run in the background"));
}

#[tokio::test]
async fn undefined_and_missing_dispatcher_configs_are_distinct() {
    let source = FakeSource::default();
    let jobs = FakeJobs { running: 0 };

    let mut env = healthy_env();
    env.dispatcher = DispatcherConfig::Undefined;
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);
    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert!(findings.any_contains("dispatcher is not defined"));

    let mut env = healthy_env();
    env.dispatcher = DispatcherConfig::Missing;
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);
    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert!(findings.any_contains("has not been found"));
}

#[tokio::test]
async fn windows_and_non_apache_server_are_separate_findings() {
    let mut env = healthy_env();
    env.os = HostOs::Windows;
    env.server_software = Some("nginx/1.24.0".to_string());
    let source = FakeSource::default();
    let jobs = FakeJobs { running: 0 };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);

    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert_eq!(findings.len(), 2);
    assert!(findings.any_contains("Linux server"));
    assert!(findings.any_contains("Apache server"));
}

#[tokio::test]
async fn server_identity_match_is_case_insensitive() {
    let mut env = healthy_env();
    env.server_software = Some("APACHE/2.4".to_string());
    let source = FakeSource::default();
    let jobs = FakeJobs { running: 0 };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);

    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert!(findings.is_empty(), "unexpected: {:?}", findings.messages());
}

#[tokio::test]
async fn background_job_skips_dispatcher_server_and_job_checks() {
    let mut env = healthy_env();
    env.os = HostOs::Windows;
    env.server_software = None;
    env.dispatcher = DispatcherConfig::Mode(DispatcherMode::Synchronous);
    let source = FakeSource::default();
    let jobs = FakeJobs { running: 3 };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);

    let ctx = PrecheckContext {
        is_background_job: true,
    };
    let findings = checker.run_prechecks(CURRENT, &ctx).await;
    assert!(findings.is_empty(), "unexpected: {:?}", findings.messages());
}

#[tokio::test]
async fn each_missing_extension_is_its_own_finding() {
    let mut env = healthy_env();
    env.loaded_extensions.clear();
    let source = FakeSource::default();
    let jobs = FakeJobs { running: 0 };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);

    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert_eq!(findings.len(), RELEASE.required_extensions.len());
    assert!(findings.any_contains("\"pdo\""));
    assert!(findings.any_contains("\"pdo_mysql\""));
}

#[tokio::test]
async fn old_runtime_and_unknown_runtime_are_reported() {
    let source = FakeSource::default();
    let jobs = FakeJobs { running: 0 };

    let mut env = healthy_env();
    env.runtime_version = Some("5.5.9".to_string());
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);
    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert!(findings.any_contains("requires at least runtime 5.6"));

    let mut env = healthy_env();
    env.runtime_version = None;
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);
    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert!(findings.any_contains("host runtime cannot be determined"));
}

#[tokio::test]
async fn database_server_minimum_depends_on_variant() {
    let env = healthy_env();
    let jobs = FakeJobs { running: 0 };

    let mariadb = FakeSource {
        server_version: Some("5.5.2-MariaDB".to_string()),
        ..FakeSource::default()
    };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &mariadb, &jobs);
    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert!(findings.any_contains("current is only MariaDB 5.5.2"));

    let mysql = FakeSource {
        server_version: Some("5.5.2-log".to_string()),
        ..FakeSource::default()
    };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &mysql, &jobs);
    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert!(findings.any_contains("current is only MySQL 5.5.2"));
}

#[tokio::test]
async fn unreadable_database_version_is_reported() {
    let env = healthy_env();
    let source = FakeSource {
        server_version: None,
        ..FakeSource::default()
    };
    let jobs = FakeJobs { running: 0 };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);

    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert_eq!(findings.len(), 1);
    assert!(findings.any_contains("version of the database server cannot be checked"));
}

#[tokio::test]
async fn missing_archive_capability_records_two_findings() {
    let mut env = healthy_env();
    env.archive = ArchiveCapability::Missing {
        error: "tar: command not found".to_string(),
    };
    let source = FakeSource::default();
    let jobs = FakeJobs { running: 0 };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);

    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert_eq!(findings.len(), 2);
    assert!(findings.any_contains("archive extraction capability"));
    assert!(findings.any_contains("tar: command not found"));
}

#[tokio::test]
async fn one_running_job_is_exactly_one_pluralized_finding() {
    let env = healthy_env();
    let source = FakeSource::default();
    let jobs = FakeJobs { running: 1 };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);

    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert_eq!(findings.len(), 1);
    assert_eq!(findings.messages(), vec!["1 job is running."]);
}

#[tokio::test]
async fn several_running_jobs_use_the_plural_form() {
    let env = healthy_env();
    let source = FakeSource::default();
    let jobs = FakeJobs { running: 3 };
    let checker = EnvironmentChecker::new(&env, &RELEASE, &source, &jobs);

    let findings = checker.run_prechecks(CURRENT, &foreground()).await;
    assert_eq!(findings.messages(), vec!["3 jobs are running."]);
}
