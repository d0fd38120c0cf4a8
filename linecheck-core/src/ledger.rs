//! Pass/fail bookkeeping for a harness run.

use std::fmt;
use tracing::warn;

/// A single failed check and why it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub test: String,
    pub reason: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "✗ {}: {}", self.test, self.reason)
    }
}

/// Aggregate outcome of every check recorded during one run.
///
/// Only `record_pass` and `record_fail` mutate it, so `passed + failed`
/// always equals the number of recorded outcomes.
#[derive(Debug, Default)]
pub struct ResultLedger {
    passed: usize,
    failed: usize,
    failures: Vec<Failure>,
    progress: bool,
}

impl ResultLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger that prints one line per outcome to stdout as it is recorded.
    pub fn with_progress() -> Self {
        Self {
            progress: true,
            ..Self::default()
        }
    }

    /// Print a free-form progress line.
    pub fn note(&self, line: &str) {
        if self.progress {
            println!("{line}");
        }
    }

    /// Print a heading that groups the outcomes recorded after it.
    pub fn section(&self, title: &str) {
        if self.progress {
            println!("\n{title}");
            println!("{}", "-".repeat(60));
        }
    }

    pub fn record_pass(&mut self, test: impl Into<String>) {
        let test = test.into();
        self.passed += 1;
        if self.progress {
            println!("✓ {test}");
        }
    }

    pub fn record_fail(&mut self, test: impl Into<String>, reason: impl Into<String>) {
        let failure = Failure {
            test: test.into(),
            reason: reason.into(),
        };
        warn!(test = %failure.test, reason = %failure.reason, "check failed");
        self.failed += 1;
        if self.progress {
            println!("{failure}");
        }
        self.failures.push(failure);
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Failures in the order they were recorded.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Renders the end-of-run summary block.
impl fmt::Display for ResultLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "Test Results: {}/{} passed", self.passed, self.total())?;
        if self.failed > 0 {
            writeln!(f)?;
            writeln!(f, "Failed tests:")?;
            for failure in &self.failures {
                writeln!(f, "  {failure}")?;
            }
        }
        write!(f, "{rule}")
    }
}
