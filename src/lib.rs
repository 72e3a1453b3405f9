// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod git;
pub mod github;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use config::{ApiConfig, CloneConfig, Config};
pub use error::{CloneError, Result};
pub use exporter::{JsonExporter, ReportManifest};
pub use git::{GitCli, VersionControlInvoker};
pub use github::GithubClient;
pub use models::{Category, CloneOutcome, Credentials, RepositoryDescriptor, RunReport};
pub use pipeline::{CloneOrchestrator, CloneStats, ProgressTracker};
pub use utils::{OperationTimer, Validator};
