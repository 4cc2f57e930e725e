// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Records assembled by the pipeline and persisted as the stats report.
//!
//! Field names follow the published JSON layout: camelCase for aggregate
//! sections, while pull request entries keep their `created_at` and `type`
//! keys so existing gist consumers keep working.

use serde::{Deserialize, Serialize};

use crate::{models::OwnerType, rank::Rank};

/// Identity of the authenticated account, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct GitHubUser
{
    /// Display name, falling back to the login.
    pub name:     String,
    /// Login handle used to search pull requests.
    pub username: String,
    /// Avatar image URL.
    pub avatar:   String,
}

/// Classified state of a collected pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState
{
    /// Open and ready for review.
    Open,
    /// Closed; never produced for unmerged pull requests, which are dropped.
    Closed,
    /// Carries a merge timestamp.
    Merged,
    /// Open as a draft.
    Draft,
}

/// Pull request authored by the user, enriched with repository metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct PullRequest
{
    /// Parent repository as `owner/name`.
    pub repo:       String,
    /// Pull request title.
    pub title:      String,
    /// Browser URL.
    pub url:        String,
    /// Creation timestamp as reported by GitHub.
    pub created_at: String,
    /// Classified state.
    pub state:      PullRequestState,
    /// Number within the repository.
    pub number:     u64,
    /// Kind of account owning the repository.
    #[serde(rename = "type")]
    pub owner_type: OwnerType,
    /// Stargazers of the repository.
    pub stars:      u64,
}

/// Pull request totals plus the collected list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestStats
{
    /// All authored pull requests.
    pub total_count:  u64,
    /// Merged authored pull requests.
    pub merged_count: u64,
    /// First search page of pull requests, closed-unmerged ones removed.
    pub data:         Vec<PullRequest,>,
}

/// Issue totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct IssuesStats
{
    /// Open plus closed.
    pub total_count:  u64,
    /// Open issues.
    pub open_count:   u64,
    /// Closed issues.
    pub closed_count: u64,
}

/// Discussion totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionsStats
{
    /// Discussions started.
    pub total_count:    u64,
    /// Discussion comments written.
    pub comments_count: u64,
}

/// Owned repository with its stars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Repository
{
    /// Repository name.
    pub name:       String,
    /// Stargazer count.
    pub stargazers: u64,
}

/// Repository totals and the per-repository star breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct RepositoriesStats
{
    /// Owned repositories.
    pub total_count:      u64,
    /// Sum of stars over `data`; bounded by the fetched node limit.
    pub total_stargazers: u64,
    /// Fetched repositories ordered by stars.
    pub data:             Vec<Repository,>,
}

/// Aggregate statistics for one account, before ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats
{
    /// Account identity.
    pub user:                        GitHubUser,
    /// Commit contributions.
    pub commits:                     u64,
    /// Review contributions.
    pub reviews:                     u64,
    /// Repositories contributed to.
    pub repositories_contributed_to: u64,
    /// Pull request totals and list.
    pub pull_request:                PullRequestStats,
    /// Issue totals.
    pub issues:                      IssuesStats,
    /// Followers.
    pub followers:                   u64,
    /// Discussion totals.
    pub discussions:                 DiscussionsStats,
    /// Repository totals.
    pub repositories:                RepositoriesStats,
}

/// Persisted artifact: aggregate statistics plus their rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize,)]
pub struct StatsReport
{
    /// Aggregate statistics, flattened into the top-level object.
    #[serde(flatten)]
    pub stats: AggregateStats,
    /// Rank derived from `stats`.
    pub rank:  Rank,
}

impl StatsReport
{
    /// Serializes the report as JSON indented with two spaces.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Serialize`] when encoding fails.
    pub fn to_pretty_json(&self,) -> Result<String, crate::Error,>
    {
        Ok(serde_json::to_string_pretty(self,)?,)
    }
}

#[cfg(test)]
pub(crate) mod fixtures
{
    use super::*;
    use crate::rank::RankLevel;

    pub(crate) fn user() -> GitHubUser
    {
        GitHubUser {
            name:     "The Octocat".to_owned(),
            username: "octocat".to_owned(),
            avatar:   "https://avatars.githubusercontent.com/u/583231".to_owned(),
        }
    }

    pub(crate) fn report() -> StatsReport
    {
        StatsReport {
            stats: AggregateStats {
                user:                        user(),
                commits:                     250,
                reviews:                     2,
                repositories_contributed_to: 7,
                pull_request:                PullRequestStats {
                    total_count:  50,
                    merged_count: 41,
                    data:         vec![PullRequest {
                        repo:       "rust-lang/rust".to_owned(),
                        title:      "Fix typo".to_owned(),
                        url:        "https://github.com/rust-lang/rust/pull/1".to_owned(),
                        created_at: "2024-05-01T10:00:00Z".to_owned(),
                        state:      PullRequestState::Merged,
                        number:     1,
                        owner_type: OwnerType::Organization,
                        stars:      90000,
                    }],
                },
                issues:                      IssuesStats {
                    total_count: 25, open_count: 5, closed_count: 20,
                },
                followers:                   10,
                discussions:                 DiscussionsStats {
                    total_count: 1, comments_count: 4,
                },
                repositories:                RepositoriesStats {
                    total_count:      2,
                    total_stargazers: 50,
                    data:             vec![
                        Repository {
                            name: "hello-world".to_owned(), stargazers: 45,
                        },
                        Repository {
                            name: "spoon-knife".to_owned(), stargazers: 5,
                        },
                    ],
                },
            },
            rank:  Rank {
                level: RankLevel::BPlus, percentile: 50.0,
            },
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn report_serializes_published_layout()
    {
        let value = serde_json::to_value(fixtures::report(),).expect("serialization failed",);

        assert_eq!(value["user"]["username"], "octocat");
        assert_eq!(value["repositoriesContributedTo"], 7);
        assert_eq!(value["pullRequest"]["mergedCount"], 41);
        assert_eq!(value["pullRequest"]["data"][0]["type"], "Organization");
        assert_eq!(value["pullRequest"]["data"][0]["state"], "merged");
        assert_eq!(value["pullRequest"]["data"][0]["created_at"], "2024-05-01T10:00:00Z");
        assert_eq!(value["repositories"]["totalStargazers"], 50);
        assert_eq!(value["rank"]["level"], "B+");
        assert_eq!(value["rank"]["percentile"], 50.0);
    }

    #[test]
    fn pretty_json_uses_two_space_indent()
    {
        let json = fixtures::report().to_pretty_json().expect("serialization failed",);
        assert!(json.starts_with("{\n  \"user\": {\n    \"name\""));
    }

    #[test]
    fn report_round_trips_through_json()
    {
        let report = fixtures::report();
        let json = report.to_pretty_json().expect("serialization failed",);
        let parsed: StatsReport = serde_json::from_str(&json,).expect("deserialization failed",);
        assert_eq!(parsed, report);
    }
}
