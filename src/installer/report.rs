//! Per-step outcomes and the run summary.

use crate::constants::LOG_TAG;
use colored::Colorize;
use std::fmt;

/// What a step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Something on disk or in a CLI registry changed.
    Applied,
    /// Everything was already in place.
    Unchanged,
    /// The step did not run; the reason is shown to the user.
    Skipped(String),
}

impl Outcome {
    /// `Skipped` with `reason`.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }

    /// `Applied` when `changed`, `Unchanged` otherwise.
    #[must_use]
    pub const fn from_change(changed: bool) -> Self {
        if changed {
            Self::Applied
        } else {
            Self::Unchanged
        }
    }

    /// Fold two outcomes of the same step: any change wins.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Applied, _) | (_, Self::Applied) => Self::Applied,
            (Self::Unchanged, _) | (_, Self::Unchanged) => Self::Unchanged,
            (skipped, _) => skipped,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => write!(f, "applied"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::Skipped(reason) => write!(f, "skipped ({reason})"),
        }
    }
}

/// One line of the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Short step label, e.g. `codex config`
    pub step: String,
    /// What happened
    pub outcome: Outcome,
}

/// Collects step outcomes and prints progress lines as they arrive.
#[derive(Debug, Default)]
pub struct InstallReport {
    steps: Vec<StepRecord>,
    quiet: bool,
}

impl InstallReport {
    /// A report that prints unless `quiet`.
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self {
            steps: Vec::new(),
            quiet,
        }
    }

    /// Print an informational tagged line.
    pub fn note(&self, message: impl AsRef<str>) {
        tracing::debug!(target: "provision::report", "{}", message.as_ref());
        if !self.quiet {
            println!("{} {}", LOG_TAG.cyan(), message.as_ref());
        }
    }

    /// Record `outcome` for `step` and print it.
    pub fn record(&mut self, step: impl Into<String>, outcome: Outcome) {
        let step = step.into();
        tracing::debug!(target: "provision::report", "{step}: {outcome}");
        if !self.quiet {
            println!("{} {}: {}", LOG_TAG.cyan(), step, paint(&outcome));
        }
        self.steps.push(StepRecord {
            step,
            outcome,
        });
    }

    /// Every recorded step in order.
    #[must_use]
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Outcome of the first step labelled `step`.
    #[must_use]
    pub fn outcome_of(&self, step: &str) -> Option<&Outcome> {
        self.steps.iter().find(|record| record.step == step).map(|record| &record.outcome)
    }

    /// Number of steps that changed something.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.steps.iter().filter(|record| record.outcome == Outcome::Applied).count()
    }

    /// Print the summary table.
    pub fn print_summary(&self) {
        if self.quiet {
            return;
        }
        let width = self.steps.iter().map(|record| record.step.len()).max().unwrap_or(0);

        println!("\n{}", "Provisioning summary".bold());
        for record in &self.steps {
            println!("  {:<width$}  {}", record.step, paint(&record.outcome));
        }

        let applied = self.applied_count();
        if applied == 0 {
            println!("\n{}", "Everything was already up to date.".green());
        } else {
            println!("\n{}", format!("{applied} step(s) applied.").green().bold());
        }
    }
}

fn paint(outcome: &Outcome) -> colored::ColoredString {
    match outcome {
        Outcome::Applied => outcome.to_string().green(),
        Outcome::Unchanged => outcome.to_string().dimmed(),
        Outcome::Skipped(_) => outcome.to_string().yellow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_prefers_change() {
        assert_eq!(Outcome::Unchanged.combine(Outcome::Applied), Outcome::Applied);
        assert_eq!(Outcome::skipped("x").combine(Outcome::Unchanged), Outcome::Unchanged);
        assert_eq!(Outcome::skipped("x").combine(Outcome::skipped("y")), Outcome::skipped("x"));
    }

    #[test]
    fn test_report_records_in_order() {
        let mut report = InstallReport::new(true);
        report.record("package", Outcome::skipped("npm not found"));
        report.record("codex config", Outcome::Applied);
        report.record("shell profile", Outcome::Unchanged);

        assert_eq!(report.steps().len(), 3);
        assert_eq!(report.applied_count(), 1);
        assert_eq!(report.outcome_of("package"), Some(&Outcome::skipped("npm not found")));
        assert_eq!(report.outcome_of("missing"), None);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::skipped("no key").to_string(), "skipped (no key)");
        assert_eq!(Outcome::from_change(false).to_string(), "unchanged");
    }
}
