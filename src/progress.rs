//! Progress display while the analysis runs
//!
//! The engine reports each external step (reading baseline files, listing
//! packages, resolving modules) as it starts and finishes. The spinner on
//! stderr names the steps still in flight, in the order they started.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Spinner tracking the analysis steps in flight
pub struct Progress {
    /// Leading text, e.g. "Analyzing changes since origin/main"
    label: String,
    /// None when display is disabled (quiet mode, stderr not a terminal)
    bar: Option<ProgressBar>,
    /// Started and not yet finished steps
    running: Mutex<Vec<String>>,
}

impl Progress {
    /// Create a reporter; the spinner starts right away when `enabled`
    pub fn new(label: impl Into<String>, enabled: bool) -> Self {
        let label = label.into();
        let bar = enabled.then(|| {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                    .template("{spinner:.cyan} {msg} ({elapsed})")
                    .expect("Invalid template"),
            );
            spinner.set_message(label.clone());
            spinner.enable_steady_tick(Duration::from_millis(80));
            spinner
        });

        Self {
            label,
            bar,
            running: Mutex::new(Vec::new()),
        }
    }

    /// Reporter that tracks steps without drawing anything
    pub fn hidden() -> Self {
        Self::new("Analyzing", false)
    }

    pub fn step_started(&self, step: &str) {
        self.update(|running| running.push(step.to_string()));
    }

    pub fn step_finished(&self, step: &str) {
        self.update(|running| {
            if let Some(pos) = running.iter().position(|s| s == step) {
                running.remove(pos);
            }
        });
    }

    /// Text the spinner currently shows
    pub fn message(&self) -> String {
        let running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        compose(&self.label, &running)
    }

    /// Remove the spinner from the terminal
    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    fn update(&self, change: impl FnOnce(&mut Vec<String>)) {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        change(&mut running);
        if let Some(bar) = &self.bar {
            bar.set_message(compose(&self.label, &running));
        }
    }
}

fn compose(label: &str, running: &[String]) -> String {
    if running.is_empty() {
        label.to_string()
    } else {
        format!("{}: {}", label, running.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_has_no_spinner() {
        let progress = Progress::hidden();
        assert!(progress.bar.is_none());
        progress.finish_and_clear();
    }

    #[test]
    fn test_message_lists_running_steps_in_start_order() {
        let progress = Progress::new("Analyzing changes since origin/main", false);
        assert_eq!(progress.message(), "Analyzing changes since origin/main");

        progress.step_started("listing packages");
        progress.step_started("resolving current modules");
        assert_eq!(
            progress.message(),
            "Analyzing changes since origin/main: listing packages, resolving current modules"
        );

        progress.step_finished("listing packages");
        assert_eq!(
            progress.message(),
            "Analyzing changes since origin/main: resolving current modules"
        );

        progress.step_finished("resolving current modules");
        assert_eq!(progress.message(), "Analyzing changes since origin/main");
    }

    #[test]
    fn test_finishing_unknown_step_is_ignored() {
        let progress = Progress::hidden();
        progress.step_started("listing packages");
        progress.step_finished("reading the baseline go.mod");
        assert_eq!(progress.message(), "Analyzing: listing packages");
    }

    #[test]
    fn test_enabled_progress_draws_spinner() {
        let progress = Progress::new("Analyzing", true);
        progress.step_started("listing packages");
        assert!(progress.bar.is_some());
        progress.finish_and_clear();
    }
}
