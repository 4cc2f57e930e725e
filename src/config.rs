// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Run configuration and its layered resolution.
//!
//! Values come from command-line flags first, then an optional YAML file,
//! then the process environment, then built-in defaults. [`CommandOptions`]
//! carries one partial layer; [`resolve_options`] folds the layers into the
//! validated [`Options`] a run needs. Environment access goes through the
//! [`Environment`] trait so resolution can be exercised without touching the
//! real process state.

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{self, Error},
    gateway::ApiEndpoints,
};

/// Value of the `X-GitHub-Api-Version` header when none is configured.
pub const DEFAULT_API_VERSION: &str = "2022-11-28";
/// Pull requests requested from the search when none is configured.
pub const DEFAULT_PER_PAGE: u32 = 50;
/// Base host when none is configured.
pub const DEFAULT_BASE_URL: &str = "github.com";
/// Owned repository nodes fetched when none is configured.
pub const DEFAULT_REPOSITORIES: u32 = 100;
/// Run deadline in seconds when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
/// Largest page the GitHub API serves.
pub const MAX_PAGE_SIZE: u32 = 100;

const TOKEN_VARIABLES: [&str; 2] = ["GH_PAT", "GITHUB_TOKEN",];
const GIST_ID_VARIABLE: &str = "GIST_ID";

/// One partial configuration layer, as given on the command line or in a
/// YAML file.
///
/// # Examples
///
/// ```
/// use ghstat::parse_command_options;
///
/// let options = parse_command_options("per-page: 20\ngistId: abc\n",)?;
/// assert_eq!(options.per_page, Some(20));
/// assert_eq!(options.gist_id.as_deref(), Some("abc"));
/// # Ok::<(), ghstat::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(deny_unknown_fields)]
pub struct CommandOptions
{
    /// Directory receiving the local report.
    #[serde(default)]
    pub cwd: Option<PathBuf,>,

    /// GitHub token.
    #[serde(default)]
    pub token: Option<String,>,

    /// `X-GitHub-Api-Version` header value.
    #[serde(default, alias = "api-version", alias = "apiVersion")]
    pub api_version: Option<String,>,

    /// Pull requests requested from the search.
    #[serde(default, alias = "per-page", alias = "perPage")]
    pub per_page: Option<u32,>,

    /// Base host, or a full API URL.
    #[serde(default, alias = "base-url", alias = "baseUrl")]
    pub base_url: Option<String,>,

    /// Gist receiving the report.
    #[serde(default, alias = "gist-id", alias = "gistId")]
    pub gist_id: Option<String,>,

    /// Owned repository nodes fetched for the star breakdown.
    #[serde(default)]
    pub repositories: Option<u32,>,

    /// Run deadline in seconds.
    #[serde(default, alias = "timeout", alias = "timeout-secs", alias = "timeoutSecs")]
    pub timeout_secs: Option<u64,>,
}

impl CommandOptions
{
    /// Fills every unset field of `self` from `fallback`.
    pub fn or(self, fallback: Self,) -> Self
    {
        Self {
            cwd:          self.cwd.or(fallback.cwd,),
            token:        non_empty(self.token,).or_else(|| non_empty(fallback.token,),),
            api_version:  non_empty(self.api_version,).or_else(|| non_empty(fallback.api_version,),),
            per_page:     self.per_page.or(fallback.per_page,),
            base_url:     non_empty(self.base_url,).or_else(|| non_empty(fallback.base_url,),),
            gist_id:      non_empty(self.gist_id,).or_else(|| non_empty(fallback.gist_id,),),
            repositories: self.repositories.or(fallback.repositories,),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs,),
        }
    }
}

/// Fully resolved configuration of one run.
#[derive(Clone, PartialEq, Eq,)]
pub struct Options
{
    /// Directory receiving the local report.
    pub cwd:          PathBuf,
    /// GitHub token.
    pub token:        String,
    /// `X-GitHub-Api-Version` header value.
    pub api_version:  String,
    /// Pull requests requested from the search, `1..=100`.
    pub per_page:     u32,
    /// Base host, or a full API URL.
    pub base_url:     String,
    /// Gist receiving the report; publishing is skipped when unset.
    pub gist_id:      Option<String,>,
    /// Owned repository nodes fetched, `1..=100`.
    pub repositories: u32,
    /// Deadline covering the whole run.
    pub timeout:      Duration,
}

impl Options
{
    /// REST and GraphQL endpoints for the configured base host.
    pub fn endpoints(&self,) -> ApiEndpoints
    {
        ApiEndpoints::from_base_url(&self.base_url,)
    }
}

impl std::fmt::Debug for Options
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        f.debug_struct("Options",)
            .field("cwd", &self.cwd,)
            .field("token", &"<redacted>",)
            .field("api_version", &self.api_version,)
            .field("per_page", &self.per_page,)
            .field("base_url", &self.base_url,)
            .field("gist_id", &self.gist_id,)
            .field("repositories", &self.repositories,)
            .field("timeout", &self.timeout,)
            .finish()
    }
}

/// Process state consulted when flags and files leave a value unset.
pub trait Environment
{
    /// Reads an environment variable.
    fn var(&self, key: &str,) -> Option<String,>;

    /// Asks an external helper for a token.
    fn token_helper(&self,) -> Option<String,>;

    /// Returns the working directory of the process.
    fn current_dir(&self,) -> Result<PathBuf, Error,>;
}

/// [`Environment`] backed by the running process.
#[derive(Debug, Clone, Copy, Default,)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment
{
    fn var(&self, key: &str,) -> Option<String,>
    {
        std::env::var(key,).ok()
    }

    fn token_helper(&self,) -> Option<String,>
    {
        gh_auth_token()
    }

    fn current_dir(&self,) -> Result<PathBuf, Error,>
    {
        std::env::current_dir()
            .map_err(|e| Error::validation(format!("cannot determine working directory: {e}"),),)
    }
}

/// Reads a YAML configuration layer from disk.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read and [`Error::Parse`]
/// when it is not a valid configuration document.
pub fn load_command_options(path: &Path,) -> Result<CommandOptions, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_command_options(&contents,)
}

/// Parses a YAML configuration layer; unknown keys are rejected.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the document cannot be decoded.
pub fn parse_command_options(contents: &str,) -> Result<CommandOptions, Error,>
{
    if contents.trim().is_empty() {
        return Ok(CommandOptions::default(),);
    }
    Ok(serde_yaml::from_str(contents,)?,)
}

/// Folds the configuration layers into validated options.
///
/// # Arguments
///
/// * `cli` - Values given as command-line flags
/// * `file` - Values read from the configuration file, if any
/// * `env` - Source of environment variables, the token helper and the
///   working directory
///
/// # Errors
///
/// Returns [`Error::Validation`] when no token can be found or a numeric
/// value is out of range.
pub fn resolve_options<E,>(
    cli: CommandOptions,
    file: Option<CommandOptions,>,
    env: &E,
) -> Result<Options, Error,>
where
    E: Environment + ?Sized,
{
    let layered = cli.or(file.unwrap_or_default(),);

    let token = match layered.token {
        Some(token,) => token,
        None => token_from_environment(env,).ok_or_else(|| {
            Error::validation(
                "no GitHub token found; pass --token, set GH_PAT or GITHUB_TOKEN, or log in with \
                 `gh auth login`",
            )
        },)?,
    };

    let gist_id = layered.gist_id.or_else(|| non_empty(env.var(GIST_ID_VARIABLE,),),);
    let cwd = match layered.cwd {
        Some(cwd,) => cwd,
        None => env.current_dir()?,
    };

    let per_page = in_page_range("per-page", layered.per_page.unwrap_or(DEFAULT_PER_PAGE,),)?;
    let repositories =
        in_page_range("repositories", layered.repositories.unwrap_or(DEFAULT_REPOSITORIES,),)?;
    let timeout_secs = layered.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS,);
    if timeout_secs == 0 {
        return Err(Error::validation("timeout must be at least one second",),);
    }

    Ok(Options {
        cwd,
        token,
        api_version: layered.api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_owned(),),
        per_page,
        base_url: layered.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned(),),
        gist_id,
        repositories,
        timeout: Duration::from_secs(timeout_secs,),
    },)
}

/// Runs `gh auth token` and returns its trimmed output.
///
/// Returns `None` when the CLI is missing, fails or prints nothing.
pub fn gh_auth_token() -> Option<String,>
{
    let output = match Command::new("gh",).args(["auth", "token",],).output() {
        Ok(output,) => output,
        Err(e,) => {
            debug!("gh auth token unavailable: {e}");
            return None;
        }
    };

    if !output.status.success() {
        debug!("gh auth token exited with {}", output.status);
        return None;
    }

    non_empty(Some(String::from_utf8_lossy(&output.stdout,).into_owned(),),)
}

fn token_from_environment<E,>(env: &E,) -> Option<String,>
where
    E: Environment + ?Sized,
{
    TOKEN_VARIABLES
        .iter()
        .find_map(|key| non_empty(env.var(key,),),)
        .or_else(|| non_empty(env.token_helper(),),)
}

fn in_page_range(name: &str, value: u32,) -> Result<u32, Error,>
{
    if value == 0 || value > MAX_PAGE_SIZE {
        return Err(Error::validation(format!(
            "{name} must be between 1 and {MAX_PAGE_SIZE}, got {value}"
        ),),);
    }
    Ok(value,)
}

fn non_empty(value: Option<String,>,) -> Option<String,>
{
    value.map(|v| v.trim().to_owned(),).filter(|v| !v.is_empty(),)
}
