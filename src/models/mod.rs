// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod outcome;
pub mod repository;

pub use outcome::{CloneOutcome, RunReport};
pub use repository::{Category, Credentials, RepositoryDescriptor};
