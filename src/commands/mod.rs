// ABOUTME: Command handlers dispatched from main.
// ABOUTME: Each command owns its provider wiring.

mod check;
mod migrate;

pub use check::check;
pub use migrate::migrate;

use metoikos::check::Findings;

/// Print a findings checklist the way the operator sees it.
pub(crate) fn report_findings(findings: &Findings) {
    for finding in findings.iter() {
        println!("  ✗ {}", finding.message);
    }
}
