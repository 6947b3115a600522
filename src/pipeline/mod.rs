// ABOUTME: Pipeline orchestration: step contract, run context, executor, state.
// ABOUTME: Exports everything a step implementation or a driver needs.

mod context;
mod executor;
mod state;
mod step;

pub use context::{PACKAGE_FILENAME, RunContext};
pub use executor::{Executor, RunReport};
pub use state::RunState;
pub use step::{MigrationStep, StepError, StepGroup};
