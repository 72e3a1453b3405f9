// file: src/models/outcome.rs
// description: per-repository clone outcomes and the aggregate run report

use crate::error::CloneError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum CloneOutcome {
    Cloned { name: String, path: PathBuf },
    Failed { name: String, error: CloneError },
}

impl CloneOutcome {
    pub fn name(&self) -> &str {
        match self {
            CloneOutcome::Cloned { name, .. } | CloneOutcome::Failed { name, .. } => name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CloneOutcome::Cloned { .. })
    }

    pub fn error(&self) -> Option<&CloneError> {
        match self {
            CloneOutcome::Cloned { .. } => None,
            CloneOutcome::Failed { error, .. } => Some(error),
        }
    }
}

/// Outcomes of one clone run.
///
/// `outcomes()[i]` always belongs to the i-th descriptor handed to the
/// orchestrator, whatever order the clones finished in.
#[derive(Debug)]
pub struct RunReport {
    destination: PathBuf,
    outcomes: Vec<CloneOutcome>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn new(
        destination: PathBuf,
        outcomes: Vec<CloneOutcome>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            destination,
            outcomes,
            started_at,
            finished_at,
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn outcomes(&self) -> &[CloneOutcome] {
        &self.outcomes
    }

    /// Failed outcomes in descriptor order.
    pub fn failures(&self) -> impl Iterator<Item = &CloneOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn failed_names(&self) -> Vec<&str> {
        self.failures().map(CloneOutcome::name).collect()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_success())
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn failed(name: &str) -> CloneOutcome {
        CloneOutcome::Failed {
            name: name.to_string(),
            error: CloneError::Clone {
                url: format!("https://example.com/{}.git", name),
                message: "exit status: 128".to_string(),
            },
        }
    }

    fn cloned(name: &str) -> CloneOutcome {
        CloneOutcome::Cloned {
            name: name.to_string(),
            path: PathBuf::from("/tmp/owner").join(name),
        }
    }

    #[test]
    fn test_failures_keep_descriptor_order() {
        let now = Utc::now();
        let report = RunReport::new(
            PathBuf::from("/tmp/owner"),
            vec![failed("zeta"), cloned("beta"), failed("alpha"), cloned("gamma")],
            now,
            now,
        );

        assert_eq!(report.failed_names(), vec!["zeta", "alpha"]);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 2);
        assert!(report.has_failures());
        assert_eq!(report.len(), 4);
    }

    #[test]
    fn test_empty_report() {
        let now = Utc::now();
        let report = RunReport::new(PathBuf::from("/tmp/owner"), vec![], now, now);
        assert!(report.is_empty());
        assert!(!report.has_failures());
        assert_eq!(report.failures().count(), 0);
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = cloned("gh");
        assert_eq!(ok.name(), "gh");
        assert!(ok.error().is_none());

        let err = failed("gh");
        assert!(!err.is_success());
        assert!(err.error().unwrap().to_string().contains("exit status: 128"));
    }
}
