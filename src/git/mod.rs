// file: src/git/mod.rs
// description: version control invocation module exports
// reference: internal module structure

pub mod invoker;

pub use invoker::{GitCli, VersionControlInvoker};
