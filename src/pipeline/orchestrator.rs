// file: src/pipeline/orchestrator.rs
// description: clones a list of repositories concurrently and aggregates their outcomes
// reference: fan-out on tokio's blocking pool with optional semaphore bound

use crate::config::CloneConfig;
use crate::error::{CloneError, Result};
use crate::git::{GitCli, VersionControlInvoker};
use crate::models::{CloneOutcome, RepositoryDescriptor, RunReport};
use crate::pipeline::progress::{CloneStats, ProgressTracker};
use crate::utils::{OperationTimer, Validator};
use chrono::Utc;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, info, warn};

pub struct CloneOrchestrator {
    invoker: Arc<dyn VersionControlInvoker>,
    max_concurrent: Option<usize>,
    show_progress: bool,
    colored: bool,
}

impl CloneOrchestrator {
    pub fn new(invoker: Arc<dyn VersionControlInvoker>) -> Self {
        Self {
            invoker,
            max_concurrent: None,
            show_progress: false,
            colored: true,
        }
    }

    pub fn from_config(config: &CloneConfig) -> Self {
        let git = GitCli::new(&config.git_binary).with_depth(config.depth);
        Self::new(Arc::new(git))
            .with_max_concurrent(config.max_concurrent)
            .with_progress(config.show_progress)
    }

    /// `None` (the default) starts every clone at once.
    pub fn with_max_concurrent(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent = limit.map(|n| n.max(1));
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn progress_tracker(&self, total: usize) -> ProgressTracker {
        if self.show_progress {
            ProgressTracker::with_color(total, self.colored)
        } else {
            ProgressTracker::hidden(total)
        }
    }

    /// Creates `destination_root` and clones every repository into
    /// `destination_root/<name>`.
    ///
    /// Returns `Err` only when the directory cannot be created, in which
    /// case nothing is cloned. Individual clone failures are reported in
    /// the returned [`RunReport`], index-aligned with `repos`.
    pub async fn clone_all(
        &self,
        repos: &[RepositoryDescriptor],
        destination_root: &Path,
    ) -> Result<RunReport> {
        tokio::fs::create_dir(destination_root)
            .await
            .map_err(|source| CloneError::Directory {
                path: destination_root.to_path_buf(),
                source,
            })?;

        let started_at = Utc::now();
        let timer = OperationTimer::new("clone repositories");
        info!(
            "Cloning {} repositories into {} ({})",
            repos.len(),
            destination_root.display(),
            match self.max_concurrent {
                Some(limit) => format!("at most {} at a time", limit),
                None => "all at once".to_string(),
            }
        );

        let progress = Arc::new(self.progress_tracker(repos.len()));
        let semaphore = self.max_concurrent.map(|n| Arc::new(Semaphore::new(n)));
        let (tx, rx) = mpsc::unbounded_channel::<(usize, CloneOutcome)>();

        let handles: Vec<_> = repos
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, repo)| {
                let tx = tx.clone();
                let invoker = Arc::clone(&self.invoker);
                let progress = Arc::clone(&progress);
                let semaphore = semaphore.clone();
                let root = destination_root.to_path_buf();

                tokio::spawn(async move {
                    let _permit = match semaphore {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };

                    let outcome = clone_one(invoker, repo, root).await;
                    if outcome.is_success() {
                        progress.inc_cloned(outcome.name());
                    } else {
                        progress.inc_failed(outcome.name());
                    }

                    if tx.send((index, outcome)).is_err() {
                        error!("Outcome receiver dropped before clone {} finished", index);
                    }
                })
            })
            .collect();
        drop(tx);

        // The receiver drains only once every task has dropped its sender.
        let (outcomes, joined) = tokio::join!(collect_outcomes(rx, repos), join_all(handles));
        for result in joined {
            if let Err(e) = result {
                error!("Clone task failed to complete: {}", e);
            }
        }

        progress.finish();
        let stats = progress.get_stats();
        timer.finish_with_count(repos.len());
        log_final_stats(&stats);

        Ok(RunReport::new(
            destination_root.to_path_buf(),
            outcomes,
            started_at,
            Utc::now(),
        ))
    }
}

async fn clone_one(
    invoker: Arc<dyn VersionControlInvoker>,
    repo: RepositoryDescriptor,
    root: PathBuf,
) -> CloneOutcome {
    let RepositoryDescriptor {
        name, clone_url, ..
    } = repo;

    if let Err(error) = Validator::validate_repository_name(&name) {
        warn!("Skipping {}: {}", name, error);
        return CloneOutcome::Failed { name, error };
    }

    let target = root.join(&name);
    let result = tokio::task::spawn_blocking({
        let url = clone_url.clone();
        let target = target.clone();
        move || invoker.clone_repository(&url, &target)
    })
    .await;

    match result {
        Ok(Ok(())) => {
            debug!("Cloned {} into {}", name, target.display());
            CloneOutcome::Cloned { name, path: target }
        }
        Ok(Err(error)) => {
            warn!("Failed to clone {}: {}", name, error);
            CloneOutcome::Failed { name, error }
        }
        Err(e) => {
            error!("Clone task for {} panicked: {}", name, e);
            CloneOutcome::Failed {
                name,
                error: CloneError::Clone {
                    url: clone_url,
                    message: format!("clone task aborted: {}", e),
                },
            }
        }
    }
}

async fn collect_outcomes(
    mut rx: mpsc::UnboundedReceiver<(usize, CloneOutcome)>,
    repos: &[RepositoryDescriptor],
) -> Vec<CloneOutcome> {
    let mut slots: Vec<Option<CloneOutcome>> = repos.iter().map(|_| None).collect();

    while let Some((index, outcome)) = rx.recv().await {
        slots[index] = Some(outcome);
    }

    slots
        .into_iter()
        .zip(repos)
        .map(|(slot, repo)| {
            slot.unwrap_or_else(|| CloneOutcome::Failed {
                name: repo.name.clone(),
                error: CloneError::Clone {
                    url: repo.clone_url.clone(),
                    message: "clone task ended without reporting an outcome".to_string(),
                },
            })
        })
        .collect()
}

fn log_final_stats(stats: &CloneStats) {
    info!("=== Clone Summary ===");
    info!("Duration: {} seconds", stats.duration_secs);
    info!("Repositories cloned: {}", stats.repositories_cloned);
    info!("Repositories failed: {}", stats.repositories_failed);
    info!("Success rate: {:.2}%", stats.success_rate());
    info!("=====================");
}
