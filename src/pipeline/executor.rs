// ABOUTME: Drives the ordered step list with fail-fast abort semantics.
// ABOUTME: Owns the run state machine and step-level logging.

use super::context::RunContext;
use super::state::RunState;
use super::step::MigrationStep;
use chrono::{DateTime, Utc};
use nonempty::NonEmpty;

/// Outcome of one pipeline run.
#[derive(Debug)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// `Completed`, or `Aborted` with the failing step index and reason.
    pub state: RunState,
    /// Ids of steps that ran to completion, in execution order.
    pub completed_steps: Vec<&'static str>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.state == RunState::Completed
    }
}

/// Executes steps strictly in declaration order.
///
/// Contract: both check phases must have returned empty findings before
/// [`Executor::run`] is invoked; the executor does not re-validate. On the
/// first step failure the run aborts; already-applied steps are left
/// exactly as they were for manual inspection or continuation.
pub struct Executor {
    state: RunState,
}

impl Executor {
    pub fn new() -> Self {
        Self {
            state: RunState::NotStarted,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Mark phase one as underway.
    pub fn begin_prechecks(&mut self) {
        self.advance(RunState::Prechecking);
    }

    /// Mark phase two as underway.
    pub fn begin_checks(&mut self) {
        self.advance(RunState::Checking);
    }

    /// Run every step to completion, aborting on the first failure.
    pub async fn run(
        &mut self,
        steps: &NonEmpty<Box<dyn MigrationStep>>,
        ctx: &mut RunContext,
    ) -> RunReport {
        let started_at = Utc::now();
        let mut completed_steps = Vec::with_capacity(steps.len());

        for (index, step) in steps.iter().enumerate() {
            self.advance(RunState::Running { step: index });
            tracing::info!(step = step.id(), index, "step started");

            match step.execute(ctx).await {
                Ok(()) => {
                    tracing::info!(step = step.id(), "step succeeded");
                    completed_steps.push(step.id());
                }
                Err(e) => {
                    tracing::error!(step = step.id(), index, error = %e, "step failed, aborting the run");
                    self.state = RunState::Aborted {
                        step: index,
                        reason: e.to_string(),
                    };
                    return RunReport {
                        started_at,
                        finished_at: Utc::now(),
                        state: self.state.clone(),
                        completed_steps,
                    };
                }
            }
        }

        self.state = RunState::Completed;
        tracing::info!(steps = completed_steps.len(), "migration completed");
        RunReport {
            started_at,
            finished_at: Utc::now(),
            state: RunState::Completed,
            completed_steps,
        }
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(
            !self.state.is_terminal() && self.state.rank() <= next.rank(),
            "run state may only move forward: {:?} -> {next:?}",
            self.state
        );
        self.state = next;
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}
