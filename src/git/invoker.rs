// file: src/git/invoker.rs
// description: blocking wrapper around the git executable
// reference: https://git-scm.com/docs/git-clone

use crate::error::{CloneError, Result};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tracing::{debug, warn};

/// Performs one clone. Implementations block the calling thread until the
/// clone has finished and report failure as an error value.
pub trait VersionControlInvoker: Send + Sync {
    fn clone_repository(&self, url: &str, target: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct GitCli {
    binary: String,
    depth: Option<u32>,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    pub fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
            depth: None,
        }
    }

    pub fn with_depth(mut self, depth: Option<u32>) -> Self {
        self.depth = depth;
        self
    }

    /// Runs `git --version`; cloning is pointless without a working binary.
    pub fn check_installed(&self) -> Result<String> {
        let output = wrap_cmd(&self.binary, ["--version"])
            .map_err(|e| CloneError::GitUnavailable(format!("{}: {}", self.binary, e)))?;

        if !output.status.success() {
            return Err(CloneError::GitUnavailable(format!(
                "{} --version exited with {}",
                self.binary, output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// `--` ends option parsing so a url starting with `-` is never read as a flag.
    fn clone_args(&self, url: &str, target: &Path) -> Vec<OsString> {
        let mut args = vec![OsString::from("clone")];
        if let Some(depth) = self.depth {
            args.push(OsString::from("--depth"));
            args.push(OsString::from(depth.to_string()));
        }
        args.push(OsString::from("--"));
        args.push(OsString::from(url));
        args.push(target.as_os_str().to_os_string());
        args
    }
}

impl VersionControlInvoker for GitCli {
    fn clone_repository(&self, url: &str, target: &Path) -> Result<()> {
        let output = wrap_cmd(&self.binary, self.clone_args(url, target)).map_err(|e| {
            CloneError::Clone {
                url: url.to_string(),
                message: e.to_string(),
            }
        })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            output.status.to_string()
        } else {
            format!("{}: {}", output.status, stderr)
        };

        Err(CloneError::Clone {
            url: url.to_string(),
            message,
        })
    }
}

fn wrap_cmd<I, S>(cmd: &str, args: I) -> io::Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = pipe_io(Command::new(cmd).args(args).stdin(Stdio::null()))
        .spawn()?
        .wait_with_output()?;

    log_output(&output);

    Ok(output)
}

fn pipe_io(cmd: &mut Command) -> &mut Command {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped())
}

fn log_output(output: &Output) {
    // git reports clone progress on stderr even when it succeeds
    if output.status.success() {
        if !output.stdout.is_empty() {
            debug!("{}", String::from_utf8_lossy(&output.stdout).trim());
        }
        if !output.stderr.is_empty() {
            debug!("{}", String::from_utf8_lossy(&output.stderr).trim());
        }
    } else if !output.stderr.is_empty() {
        warn!("{}", String::from_utf8_lossy(&output.stderr).trim());
    }
}
