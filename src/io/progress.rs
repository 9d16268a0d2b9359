//! Batch progress display for multi-file runs

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Files: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Tracks how many input files have been quilted
pub struct ProgressManager {
    bar: Option<ProgressBar>,
    completed: Vec<(String, Duration)>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a manager with no bar yet
    pub const fn new() -> Self {
        Self {
            bar: None,
            completed: Vec::new(),
        }
    }

    /// Create the bar for a batch of `file_count` files
    pub fn initialize(&mut self, file_count: usize) {
        let bar = ProgressBar::new(file_count as u64);
        bar.set_style(BATCH_STYLE.clone());
        self.bar = Some(bar);
    }

    /// Show the file currently being quilted
    pub fn start_file(&self, path: &Path) {
        if let Some(ref bar) = self.bar {
            bar.set_message(display_name(path));
        }
    }

    /// Advance the bar past a finished file
    pub fn complete_file(&mut self, path: &Path, elapsed: Duration) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
        self.completed.push((display_name(path), elapsed));
    }

    /// Names and durations of the files finished so far
    pub fn completed(&self) -> &[(String, Duration)] {
        &self.completed
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
