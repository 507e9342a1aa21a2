//! Per-trial progress reporting
//!
//! All console output of a run goes through this manager so the bar and
//! the per-trial file listings do not clobber each other. The manager is
//! informational only; assembly never depends on it.

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static TRIAL_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Trials: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Coordinates the progress display across all trials of a run
pub struct ProgressManager {
    trial_bar: Option<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager with no active display
    pub const fn new() -> Self {
        Self { trial_bar: None }
    }

    /// Initialize the trial bar once the number of trials is known
    pub fn initialize(&mut self, trial_count: usize) {
        let bar = ProgressBar::new(trial_count as u64);
        bar.set_style(TRIAL_STYLE.clone());
        self.trial_bar = Some(bar);
    }

    /// Announce a trial and list every frame selected for it
    pub fn start_trial(&self, name: &str, frames: &[PathBuf]) {
        if let Some(bar) = &self.trial_bar {
            bar.set_message(format!("building {name}"));
            bar.println(format!(
                "building stack '{name}' from {} frame(s):",
                frames.len()
            ));
            for frame in frames {
                bar.println(format!("  {}", frame.display()));
            }
        }
    }

    /// Report a finished stack write
    pub fn complete_trial(&self, name: &str, output_path: &Path) {
        if let Some(bar) = &self.trial_bar {
            bar.println(format!("stack '{name}' written to {}", output_path.display()));
            bar.inc(1);
        }
    }

    /// Tear down the display after the last trial
    pub fn finish(&self) {
        if let Some(bar) = &self.trial_bar {
            bar.finish_with_message("all stacks written");
        }
    }
}
