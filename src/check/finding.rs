// ABOUTME: Findings accumulator for blocking feasibility messages.
// ABOUTME: Collects every problem in a phase so the operator can fix them in one pass.

/// The two ordered validation phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Environment, runtime, and server conditions.
    Precheck,
    /// Resource sizing and database-topology conditions.
    Check,
}

/// A blocking, human-readable infeasibility message.
///
/// Never fatal by itself; a non-empty set prevents the pipeline from
/// starting.
#[derive(Debug, Clone)]
pub struct Finding {
    pub phase: Phase,
    pub message: String,
}

/// Collects findings during a validation phase, auto-logging each one.
#[derive(Debug, Default)]
pub struct Findings {
    items: Vec<Finding>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a precheck finding, logging it via tracing.
    pub fn precheck(&mut self, message: impl Into<String>) {
        self.push(Phase::Precheck, message.into());
    }

    /// Record a check finding, logging it via tracing.
    pub fn check(&mut self, message: impl Into<String>) {
        self.push(Phase::Check, message.into());
    }

    fn push(&mut self, phase: Phase, message: String) {
        tracing::warn!(?phase, "{message}");
        self.items.push(Finding { phase, message });
    }

    pub fn extend(&mut self, other: Findings) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.items.iter()
    }

    /// Message texts, in recording order.
    pub fn messages(&self) -> Vec<&str> {
        self.items.iter().map(|f| f.message.as_str()).collect()
    }

    /// True when any recorded message contains `needle`.
    pub fn any_contains(&self, needle: &str) -> bool {
        self.items.iter().any(|f| f.message.contains(needle))
    }
}

impl IntoIterator for Findings {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
