// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! GitHub activity statistics with rank scoring and gist publishing.
//!
//! A run resolves the authenticated account, collects its authored pull
//! requests enriched with repository metadata, fetches aggregate counters in
//! one GraphQL query, scores the result into a letter grade, writes the
//! report to `github-stats.json` and optionally replaces `contributions.json`
//! in an existing gist. All remote access goes through [`GitHubGateway`];
//! [`OctocrabGateway`] is the production implementation.

mod cache;
mod collector;
mod config;
mod error;
mod fetcher;
mod gateway;
mod models;
mod pipeline;
mod progress;
mod publish;
mod rank;
mod stats;

pub mod retry;

#[cfg(test)]
mod testing;

pub use cache::{RepositoryCache, RepositoryMetadata};
pub use collector::{PullRequestCollector, classify};
pub use config::{
    CommandOptions, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_PER_PAGE,
    DEFAULT_REPOSITORIES, DEFAULT_TIMEOUT_SECS, Environment, MAX_PAGE_SIZE, Options,
    ProcessEnvironment, gh_auth_token, load_command_options, parse_command_options,
    resolve_options,
};
pub use error::{Error, io_error, output_io_error};
pub use fetcher::{StatsCounters, fetch_counters, merge, rank_input};
pub use gateway::{ApiEndpoints, GitHubGateway, OctocrabGateway, USER_STATISTICS_QUERY};
pub use models::{
    ApiGist, ApiRepository, ApiRepositoryOwner, ApiUser, Contributions, CountData, GraphQlUser,
    IssueState, OwnerType, PullRequestLinks, RepositoryNode, RepositoryNodes, SearchIssue,
};
pub use pipeline::{GistOutcome, RunReport, execute, resolve_user, run};
pub use progress::Progress;
pub use publish::{GIST_FILE_NAME, LOCAL_FILE_NAME, publish_gist, write_local};
pub use rank::{Rank, RankInput, RankLevel, calculate_rank, percentile};
pub use stats::{
    AggregateStats, DiscussionsStats, GitHubUser, IssuesStats, PullRequest, PullRequestState,
    PullRequestStats, RepositoriesStats, Repository, StatsReport,
};
