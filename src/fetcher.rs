// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Batched counter fetch and the merge into [`AggregateStats`].

use tracing::info;

use crate::{
    error::Error,
    gateway::GitHubGateway,
    models::GraphQlUser,
    rank::RankInput,
    stats::{
        AggregateStats, DiscussionsStats, GitHubUser, IssuesStats, PullRequest, PullRequestStats,
        RepositoriesStats, Repository,
    },
};

/// Counters returned by the statistics query, zero-filled where absent.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct StatsCounters
{
    /// Commit contributions.
    pub commits:                     u64,
    /// Review contributions.
    pub reviews:                     u64,
    /// Repositories contributed to.
    pub repositories_contributed_to: u64,
    /// All authored pull requests.
    pub pull_requests:               u64,
    /// Merged authored pull requests.
    pub merged_pull_requests:        u64,
    /// Open authored issues.
    pub open_issues:                 u64,
    /// Closed authored issues.
    pub closed_issues:               u64,
    /// Followers.
    pub followers:                   u64,
    /// Discussions started.
    pub discussions:                 u64,
    /// Discussion comments written.
    pub discussion_comments:         u64,
    /// Owned repositories in total.
    pub repository_count:            u64,
    /// Fetched repositories ordered by stars.
    pub repositories:                Vec<Repository,>,
}

impl From<GraphQlUser,> for StatsCounters
{
    fn from(user: GraphQlUser,) -> Self
    {
        Self {
            commits:                     user.commits.total_commit_contributions.unwrap_or(0,),
            reviews:                     user
                .reviews
                .total_pull_request_review_contributions
                .unwrap_or(0,),
            repositories_contributed_to: user.repositories_contributed_to.total_count,
            pull_requests:               user.pull_requests.total_count,
            merged_pull_requests:        user.merged_pull_requests.total_count,
            open_issues:                 user.open_issues.total_count,
            closed_issues:               user.closed_issues.total_count,
            followers:                   user.followers.total_count,
            discussions:                 user.repository_discussions.total_count,
            discussion_comments:         user.repository_discussion_comments.total_count,
            repository_count:            user.repositories.total_count,
            repositories:                user
                .repositories
                .nodes
                .into_iter()
                .map(|node| Repository {
                    name: node.name, stargazers: node.stargazers.total_count,
                },)
                .collect(),
        }
    }
}

/// Fetches every aggregate counter for `login` in one query.
///
/// # Errors
///
/// Propagates gateway and GraphQL failures.
pub async fn fetch_counters<G,>(
    gateway: &G,
    login: &str,
    repositories: u32,
) -> Result<StatsCounters, Error,>
where
    G: GitHubGateway + ?Sized,
{
    let counters = StatsCounters::from(gateway.user_statistics(login, repositories,).await?,);
    info!(
        "fetched counters for {}: {} commits, {} repositories",
        login, counters.commits, counters.repository_count
    );
    Ok(counters,)
}

/// Merges the identity, collected pull requests and counters.
///
/// `issues.total_count` is open plus closed. `total_stargazers` sums the
/// fetched repository nodes only, so it undercounts accounts owning more
/// repositories than the node limit.
pub fn merge(
    user: GitHubUser,
    pull_requests: Vec<PullRequest,>,
    counters: StatsCounters,
) -> AggregateStats
{
    let total_stargazers = counters.repositories.iter().map(|repo| repo.stargazers,).sum();

    AggregateStats {
        user,
        commits: counters.commits,
        reviews: counters.reviews,
        repositories_contributed_to: counters.repositories_contributed_to,
        pull_request: PullRequestStats {
            total_count:  counters.pull_requests,
            merged_count: counters.merged_pull_requests,
            data:         pull_requests,
        },
        issues: IssuesStats {
            total_count:  counters.open_issues + counters.closed_issues,
            open_count:   counters.open_issues,
            closed_count: counters.closed_issues,
        },
        followers: counters.followers,
        discussions: DiscussionsStats {
            total_count:    counters.discussions,
            comments_count: counters.discussion_comments,
        },
        repositories: RepositoriesStats {
            total_count: counters.repository_count,
            total_stargazers,
            data: counters.repositories,
        },
    }
}

/// Projects aggregate statistics onto the scorer input.
pub fn rank_input(stats: &AggregateStats,) -> RankInput
{
    RankInput {
        commits:   stats.commits,
        prs:       stats.pull_request.total_count,
        issues:    stats.issues.total_count,
        reviews:   stats.reviews,
        repos:     stats.repositories.total_count,
        stars:     stats.repositories.total_stargazers,
        followers: stats.followers,
    }
}
