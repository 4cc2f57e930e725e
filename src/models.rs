// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Wire shapes returned by the GitHub REST and GraphQL APIs.
//!
//! Only the fields the exporter reads are modelled. Optional counters carry
//! `#[serde(default)]` so an absent value decodes as zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Authenticated account returned by `GET /user`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize,)]
pub struct ApiUser
{
    /// Login handle.
    pub login:      String,
    /// Display name; GitHub returns `null` when unset.
    #[serde(default)]
    pub name:       Option<String,>,
    /// Avatar image URL.
    pub avatar_url: String,
}

/// Page returned by `GET /search/issues`.
#[derive(Debug, Clone, Deserialize,)]
pub struct SearchIssuesPage
{
    /// Total number of matches across all pages.
    #[serde(default)]
    pub total_count: u64,
    /// Items on the requested page.
    #[serde(default)]
    pub items:       Vec<SearchIssue,>,
}

/// Open/closed state reported by the issues search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize,)]
#[serde(rename_all = "lowercase")]
pub enum IssueState
{
    /// Item is open.
    Open,
    /// Item is closed, merged or not.
    Closed,
}

/// Single pull request hit of the issues search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize,)]
pub struct SearchIssue
{
    /// Pull request title.
    pub title:          String,
    /// Browser URL of the pull request.
    pub html_url:       String,
    /// Creation timestamp in ISO 8601 form.
    pub created_at:     String,
    /// Remote open/closed state.
    pub state:          IssueState,
    /// Pull request number within its repository.
    pub number:         u64,
    /// Draft flag; absent on older payloads.
    #[serde(default)]
    pub draft:          Option<bool,>,
    /// API URL of the parent repository, e.g.
    /// `https://api.github.com/repos/owner/name`.
    pub repository_url: String,
    /// Pull request links, present for pull request hits only.
    #[serde(default)]
    pub pull_request:   Option<PullRequestLinks,>,
}

impl SearchIssue
{
    /// Returns `true` when the pull request carries a merge timestamp.
    pub fn is_merged(&self,) -> bool
    {
        self.pull_request.as_ref().is_some_and(|links| links.merged_at.is_some(),)
    }
}

/// Pull request section of a search hit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize,)]
pub struct PullRequestLinks
{
    /// Merge timestamp, `null` until merged.
    #[serde(default)]
    pub merged_at: Option<String,>,
}

/// Kind of account owning a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,)]
pub enum OwnerType
{
    /// Personal account.
    User,
    /// Organization account.
    Organization,
}

/// Repository returned by `GET /repos/{owner}/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize,)]
pub struct ApiRepository
{
    /// Owning account.
    pub owner:            ApiRepositoryOwner,
    /// Number of stargazers.
    #[serde(default)]
    pub stargazers_count: u64,
}

/// Owner section of a repository payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize,)]
pub struct ApiRepositoryOwner
{
    /// Account kind.
    #[serde(rename = "type")]
    pub owner_type: OwnerType,
}

/// Gist returned by `GET /gists/{id}` and `PATCH /gists/{id}`.
#[derive(Debug, Clone, Deserialize,)]
pub struct ApiGist
{
    /// Browser URL of the gist.
    pub html_url: String,
    /// Files keyed by file name.
    #[serde(default)]
    pub files:    BTreeMap<String, serde_json::Value,>,
}

impl ApiGist
{
    /// Returns `true` when the gist holds a file with exactly this name.
    pub fn contains_file(&self, file_name: &str,) -> bool
    {
        self.files.contains_key(file_name,)
    }
}

/// Top-level GraphQL response envelope.
#[derive(Debug, Deserialize,)]
pub struct GraphQlResponse<T,>
{
    /// Query result; `null` when the query failed as a whole.
    pub data:   Option<T,>,
    /// Errors reported by the endpoint.
    #[serde(default)]
    pub errors: Vec<GraphQlError,>,
}

/// Single GraphQL error entry.
#[derive(Debug, Clone, Deserialize,)]
pub struct GraphQlError
{
    /// Human readable message.
    pub message: String,
}

/// `data` object of the user statistics query.
#[derive(Debug, Deserialize,)]
pub struct UserStatisticsData
{
    /// Requested user; `null` when the login does not resolve.
    pub user: Option<GraphQlUser,>,
}

/// Aggregate counters for one user as returned by the statistics query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlUser
{
    /// Display name.
    #[serde(default)]
    pub name:                        Option<String,>,
    /// Login handle.
    #[serde(default)]
    pub login:                       String,
    /// Commit contributions collection.
    #[serde(default)]
    pub commits:                     Contributions,
    /// Review contributions collection.
    #[serde(default)]
    pub reviews:                     Contributions,
    /// Repositories the user contributed to.
    #[serde(default)]
    pub repositories_contributed_to: CountData,
    /// All authored pull requests.
    #[serde(default)]
    pub pull_requests:               CountData,
    /// Merged authored pull requests.
    #[serde(default)]
    pub merged_pull_requests:        CountData,
    /// Open authored issues.
    #[serde(default)]
    pub open_issues:                 CountData,
    /// Closed authored issues.
    #[serde(default)]
    pub closed_issues:               CountData,
    /// Followers.
    #[serde(default)]
    pub followers:                   CountData,
    /// Discussions started.
    #[serde(default)]
    pub repository_discussions:      CountData,
    /// Discussion comments written.
    #[serde(default)]
    pub repository_discussion_comments: CountData,
    /// Owned repositories, ordered by stars.
    #[serde(default)]
    pub repositories:                RepositoryNodes,
}

/// Contributions collection; each alias fills one of the two counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct Contributions
{
    /// Commit contributions in the current collection window.
    #[serde(default)]
    pub total_commit_contributions:              Option<u64,>,
    /// Review contributions in the current collection window.
    #[serde(default)]
    pub total_pull_request_review_contributions: Option<u64,>,
}

/// Connection reduced to its total count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct CountData
{
    /// Number of items in the connection.
    #[serde(default)]
    pub total_count: u64,
}

/// Repository connection with star counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNodes
{
    /// Number of owned repositories.
    #[serde(default)]
    pub total_count: u64,
    /// Fetched repository nodes.
    #[serde(default)]
    pub nodes:       Vec<RepositoryNode,>,
}

/// Repository node with its stargazer count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize,)]
pub struct RepositoryNode
{
    /// Repository name.
    pub name:       String,
    /// Stargazer connection.
    #[serde(default)]
    pub stargazers: CountData,
}
