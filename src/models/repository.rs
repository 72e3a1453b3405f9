// file: src/models/repository.rs
// description: repository descriptor, owner category and api credentials
// reference: https://docs.github.com/en/rest/repos/repos

use crate::error::{CloneError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimal repository metadata needed to drive a clone.
///
/// The listing endpoint returns far more fields than this; serde ignores the
/// rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub clone_url: String,
}

impl RepositoryDescriptor {
    pub fn new(id: u64, name: &str, full_name: &str, clone_url: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            full_name: full_name.to_string(),
            clone_url: clone_url.to_string(),
        }
    }
}

/// Kind of account that owns the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Organization,
    User,
}

impl Category {
    /// Path segment used by the listing endpoint.
    pub fn api_segment(&self) -> &'static str {
        match self {
            Category::Organization => "orgs",
            Category::User => "users",
        }
    }
}

impl FromStr for Category {
    type Err = CloneError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "org" => Ok(Category::Organization),
            "user" => Ok(Category::User),
            other => Err(CloneError::Usage(format!(
                "unknown category '{}', expected 'org' or 'user'",
                other
            ))),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Organization => write!(f, "org"),
            Category::User => write!(f, "user"),
        }
    }
}

/// Username and password/token pair sent as HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(username: &str, secret: &str) -> Self {
        Self {
            username: username.to_string(),
            secret: secret.to_string(),
        }
    }
}

impl FromStr for Credentials {
    type Err = CloneError;

    /// Splits at the first `:` so tokens containing colons survive intact.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((username, secret)) => Ok(Credentials::new(username, secret)),
            None => Err(CloneError::Usage(
                "credentials must be given as username:password/token".to_string(),
            )),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}
