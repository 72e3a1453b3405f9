// file: src/main.rs
// description: commandline application entry point
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use gh_clone::utils::logging::{format_error, format_success, format_warning};
use gh_clone::{
    Category, CloneOrchestrator, Config, Credentials, GitCli, GithubClient, JsonExporter,
    OperationTimer, RunReport, Validator,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "gh_clone")]
#[command(author = "cipher")]
#[command(version)]
#[command(about = "Clone every repository of a GitHub organization or user", long_about = None)]
#[command(after_help = "Example:\n  gh_clone user heppu heppu:my-secret-token")]
struct Cli {
    /// Owner kind: `org` or `user`
    category: Category,

    /// Organization or user name; also the name of the created directory
    #[arg(value_parser = parse_owner)]
    name: String,

    /// Basic auth credentials as username:password/token
    credentials: Option<Credentials>,

    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Directory in which the owner directory is created
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Maximum number of clones running at once
    #[arg(short = 'j', long, value_name = "NUM")]
    max_concurrent: Option<usize>,

    /// Create shallow clones with the given history depth
    #[arg(long, value_name = "NUM")]
    depth: Option<u32>,

    #[arg(long, action = ArgAction::SetTrue)]
    no_progress: bool,

    /// Write a JSON report of the run to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    gh_clone::utils::logging::init_logger(cli.color, cli.verbose);

    let config = load_config(&cli)?;

    let version = GitCli::new(&config.clone.git_binary)
        .check_installed()
        .context("git must be installed to clone repositories")?;
    info!("Using {}", version);

    let timer = OperationTimer::new("list repositories");
    let client = GithubClient::new(config.api.clone()).context("Failed to build HTTP client")?;
    let repos = client
        .list_repositories(cli.category, &cli.name, cli.credentials.as_ref())
        .await
        .with_context(|| format!("Failed to list repositories of {} {}", cli.category, cli.name))?;
    timer.finish_with_count(repos.len());

    let destination = config.clone.output_dir.join(&cli.name);
    let report = CloneOrchestrator::from_config(&config.clone)
        .with_color(cli.color)
        .clone_all(&repos, &destination)
        .await
        .context("Clone run aborted")?;

    if let Some(path) = &cli.report {
        JsonExporter::new(path)?
            .export(&report, true)
            .context("Failed to write report")?;
    }

    print_summary(&report);

    if report.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Rejected names surface as clap usage errors (exit status 2).
fn parse_owner(name: &str) -> std::result::Result<String, gh_clone::CloneError> {
    Validator::validate_owner_name(name)?;
    Ok(name.to_string())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) if path.exists() => {
            info!("Loading configuration from: {}", path.display());
            Config::load(Some(path.as_path())).context("Failed to load configuration")?
        }
        Some(path) => {
            warn!(
                "Config file {} not found, using default configuration",
                path.display()
            );
            Config::load(None).context("Failed to load configuration")?
        }
        None => Config::load(None).context("Failed to load configuration")?,
    };

    if let Some(dir) = &cli.output_dir {
        config.clone.output_dir = dir.clone();
    }
    if cli.max_concurrent.is_some() {
        config.clone.max_concurrent = cli.max_concurrent;
    }
    if cli.depth.is_some() {
        config.clone.depth = cli.depth;
    }
    if cli.no_progress {
        config.clone.show_progress = false;
    }

    config.validate()?;
    Ok(config)
}

fn print_summary(report: &RunReport) {
    println!();
    if report.is_empty() {
        println!("{}", format_warning("No repositories to clone"));
        return;
    }

    println!(
        "{}",
        format_success(&format!(
            "Cloned {} of {} repositories into {}",
            report.succeeded(),
            report.len(),
            report.destination().display()
        ))
    );

    if report.has_failures() {
        println!(
            "{}",
            format_warning(&format!("{} repositories failed to clone:", report.failed()))
        );
        for failed in report.failures() {
            let detail = failed
                .error()
                .map(ToString::to_string)
                .unwrap_or_default();
            println!("  {}", format_error(&format!("{}: {}", failed.name(), detail)));
        }
    }
}
