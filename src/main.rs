// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Command-line interface for the `ghstat` binary.
//!
//! Resolves the run configuration, executes the pipeline against the GitHub
//! API and reports where the stats ended up.

use std::{path::PathBuf, process};

use clap::Parser;
use ghstat::{
    CommandOptions, Error, GistOutcome, OctocrabGateway, Options, ProcessEnvironment, Progress,
    RunReport, execute, load_command_options, resolve_options, retry::RetryConfig,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Export GitHub activity stats with a rank score.
#[derive(Debug, Parser,)]
#[command(name = "ghstat", version, about = "Export GitHub activity stats with a rank score")]
struct Cli
{
    /// Directory receiving github-stats.json.
    #[arg(long = "cwd", value_name = "DIR")]
    cwd: Option<PathBuf,>,

    /// GitHub token; defaults to GH_PAT, GITHUB_TOKEN or `gh auth token`.
    #[arg(long = "token", value_name = "TOKEN")]
    token: Option<String,>,

    /// Value of the X-GitHub-Api-Version header.
    #[arg(long = "api-version", value_name = "VERSION")]
    api_version: Option<String,>,

    /// Pull requests requested from the search (1-100).
    #[arg(long = "per-page", value_name = "N")]
    per_page: Option<u32,>,

    /// GitHub host, e.g. github.com or an Enterprise host.
    #[arg(long = "base-url", value_name = "HOST")]
    base_url: Option<String,>,

    /// Gist whose contributions.json is replaced; defaults to GIST_ID.
    #[arg(long = "gist-id", value_name = "ID")]
    gist_id: Option<String,>,

    /// Owned repositories fetched for the star breakdown (1-100).
    #[arg(long = "repositories", value_name = "N")]
    repositories: Option<u32,>,

    /// Deadline for the whole run, in seconds.
    #[arg(long = "timeout", value_name = "SECONDS")]
    timeout: Option<u64,>,

    /// YAML file with default values for the flags above.
    #[arg(long = "config", value_name = "PATH", env = "GHSTAT_CONFIG")]
    config: Option<PathBuf,>,
}

impl Cli
{
    fn command_options(&self,) -> CommandOptions
    {
        CommandOptions {
            cwd:          self.cwd.clone(),
            token:        self.token.clone(),
            api_version:  self.api_version.clone(),
            per_page:     self.per_page,
            base_url:     self.base_url.clone(),
            gist_id:      self.gist_id.clone(),
            repositories: self.repositories,
            timeout_secs: self.timeout,
        }
    }
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    init_tracing();

    if let Err(error,) = run(Cli::parse(),).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing()
{
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn",),),)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr,),)
        .init();
}

/// Resolves options and executes one run.
///
/// # Errors
///
/// Propagates configuration, gateway and pipeline errors.
async fn run(cli: Cli,) -> Result<(), Error,>
{
    let options = resolve(&cli,)?;
    let gateway = OctocrabGateway::new(
        &options.token,
        &options.api_version,
        options.endpoints(),
        RetryConfig::default(),
    )?;

    let progress = Progress::spinner();
    let result = execute(&gateway, &options, &progress,).await;
    match &result {
        Ok(_,) => progress.finish("Done",),
        Err(_,) => progress.abandon(),
    }

    print_summary(&result?,);
    Ok((),)
}

fn resolve(cli: &Cli,) -> Result<Options, Error,>
{
    let file = cli.config.as_deref().map(load_command_options,).transpose()?;
    resolve_options(cli.command_options(), file, &ProcessEnvironment,)
}

fn print_summary(outcome: &RunReport,)
{
    println!(
        "Rank {} ({:.2}) written to {}",
        outcome.report.rank.level,
        outcome.report.rank.percentile,
        outcome.local_path.display()
    );

    match &outcome.gist {
        GistOutcome::Skipped => {}
        GistOutcome::Published {
            url,
        } => println!("Gist updated: {url}"),
        GistOutcome::Failed {
            message,
        } => eprintln!("warning: gist was not updated: {message}"),
    }
}
