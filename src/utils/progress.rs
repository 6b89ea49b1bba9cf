//! Spinner shown while slow external commands run.
//!
//! Wraps [`indicatif`] so callers never have to think about whether output is
//! allowed: a disabled spinner is a hidden bar and every method is a no-op.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// A spinner that is hidden when progress output is disabled.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Start a spinner with `message`.
    ///
    /// The spinner only renders when `enabled` is true and stderr is a TTY.
    #[must_use]
    pub fn start(message: impl Into<String>, enabled: bool) -> Self {
        let bar = if enabled && std::io::stderr().is_terminal() {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        bar.set_message(message.into());
        Self {
            bar,
        }
    }

    /// Stop and erase the spinner.
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
