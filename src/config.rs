// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{CloneError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub clone: CloneConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub user_agent: String,
    pub per_page: u32,
    /// Upper bound on listing pages followed through `Link` headers.
    pub max_pages: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloneConfig {
    pub git_binary: String,
    pub output_dir: PathBuf,
    /// `None` launches every clone at once.
    #[serde(default)]
    pub max_concurrent: Option<usize>,
    #[serde(default)]
    pub depth: Option<u32>,
    pub show_progress: bool,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = Self::default_config();
        let mut builder = config::Config::builder()
            .set_default("api.base_url", defaults.api.base_url)
            .and_then(|b| b.set_default("api.user_agent", defaults.api.user_agent))
            .and_then(|b| b.set_default("api.per_page", i64::from(defaults.api.per_page)))
            .and_then(|b| b.set_default("api.max_pages", i64::from(defaults.api.max_pages)))
            .and_then(|b| b.set_default("api.timeout_secs", defaults.api.timeout_secs as i64))
            .and_then(|b| b.set_default("clone.git_binary", defaults.clone.git_binary))
            .and_then(|b| {
                b.set_default(
                    "clone.output_dir",
                    defaults.clone.output_dir.to_string_lossy().to_string(),
                )
            })
            .and_then(|b| b.set_default("clone.show_progress", defaults.clone.show_progress))
            .map_err(|e| CloneError::Config(e.to_string()))?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GH_CLONE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| CloneError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| CloneError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://api.github.com".to_string(),
                user_agent: format!("gh_clone/{}", env!("CARGO_PKG_VERSION")),
                per_page: 100,
                max_pages: 100,
                timeout_secs: 30,
            },
            clone: CloneConfig {
                git_binary: "git".to_string(),
                output_dir: PathBuf::from("."),
                max_concurrent: None,
                depth: None,
                show_progress: true,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.per_page == 0 || self.api.per_page > 100 {
            return Err(CloneError::Config(
                "per_page must be between 1 and 100".to_string(),
            ));
        }

        if self.api.max_pages == 0 {
            return Err(CloneError::Config(
                "max_pages must be greater than 0".to_string(),
            ));
        }

        if self.clone.max_concurrent == Some(0) {
            return Err(CloneError::Config(
                "max_concurrent must be greater than 0".to_string(),
            ));
        }

        if self.clone.depth == Some(0) {
            return Err(CloneError::Config("depth must be greater than 0".to_string()));
        }

        if self.clone.git_binary.trim().is_empty() {
            return Err(CloneError::Config("git_binary must not be empty".to_string()));
        }

        Ok(())
    }
}
