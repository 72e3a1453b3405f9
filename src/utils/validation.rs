// file: src/utils/validation.rs
// description: validation of owner and repository names before they touch the filesystem
// reference: https://docs.github.com/en/rest/repos/repos

use crate::error::{CloneError, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // GitHub logins: alphanumerics and single hyphens, no leading hyphen
    pub static ref OWNER_NAME: Regex = Regex::new(
        r"^[A-Za-z0-9](?:[A-Za-z0-9]|-[A-Za-z0-9])*$"
    ).expect("OWNER_NAME regex is valid");

    pub static ref REPOSITORY_NAME: Regex = Regex::new(
        r"^[A-Za-z0-9._-]+$"
    ).expect("REPOSITORY_NAME regex is valid");
}

pub struct Validator;

impl Validator {
    /// The owner name doubles as the destination directory name.
    pub fn validate_owner_name(owner: &str) -> Result<()> {
        if !OWNER_NAME.is_match(owner) {
            return Err(CloneError::Usage(format!(
                "invalid owner name '{}': only letters, digits and '-' are allowed",
                owner
            )));
        }
        Ok(())
    }

    /// Rejects names that would escape the destination root when joined to it.
    pub fn validate_repository_name(name: &str) -> Result<()> {
        if name == "." || name == ".." || !REPOSITORY_NAME.is_match(name) {
            return Err(CloneError::InvalidRepositoryName(name.to_string()));
        }
        Ok(())
    }
}
