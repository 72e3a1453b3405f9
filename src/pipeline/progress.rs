// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for clone runs
// reference: uses indicatif for progress bars and tracks clone counts

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct CloneStats {
    pub repositories_cloned: usize,
    pub repositories_failed: usize,
    pub duration_secs: u64,
}

impl CloneStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.repositories_cloned + self.repositories_failed
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.repositories_cloned as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    repositories_cloned: Arc<AtomicUsize>,
    repositories_failed: Arc<AtomicUsize>,
    start_time: Instant,
    colored: bool,
}

impl ProgressTracker {
    pub fn with_color(total_repositories: usize, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();

        let main_bar = create_progress_bar(&multi_progress, total_repositories as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self::from_bars(main_bar, detail_bar, colored)
    }

    /// Counts without drawing anything.
    pub fn hidden(total_repositories: usize) -> Self {
        let main_bar = ProgressBar::hidden();
        main_bar.set_length(total_repositories as u64);
        Self::from_bars(main_bar, ProgressBar::hidden(), false)
    }

    fn from_bars(main_bar: ProgressBar, detail_bar: ProgressBar, colored: bool) -> Self {
        Self {
            main_bar,
            detail_bar,
            repositories_cloned: Arc::new(AtomicUsize::new(0)),
            repositories_failed: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
            colored,
        }
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    pub fn inc_cloned(&self, name: &str) {
        self.repositories_cloned.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar(name);
    }

    pub fn inc_failed(&self, name: &str) {
        self.repositories_failed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar(name);
    }

    pub fn finish(&self) {
        if !self.main_bar.is_finished() {
            self.main_bar.finish_with_message("Cloning complete");
        }
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> CloneStats {
        CloneStats {
            repositories_cloned: self.repositories_cloned.load(Ordering::SeqCst),
            repositories_failed: self.repositories_failed.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }

    fn update_detail_bar(&self, last: &str) {
        let failed = self.repositories_failed.load(Ordering::SeqCst);
        let message = if failed > 0 && self.colored {
            format!("Last: {} | {}", last, format!("Failed: {}", failed).red())
        } else {
            format!("Last: {} | Failed: {}", last, failed)
        };

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    if colored {
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
                )
                .expect("Failed to create progress bar template")
                .progress_chars("█▓▒░"),
        );
    } else {
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}")
                .expect("Failed to create progress bar template")
                .progress_chars("=>-"),
        );
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .expect("Failed to create detail bar template");
    bar.set_style(style);
    bar
}
