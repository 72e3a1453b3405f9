// file: src/github/mod.rs
// description: GitHub API module exports
// reference: internal module structure

pub mod client;
pub mod pagination;

pub use client::GithubClient;
