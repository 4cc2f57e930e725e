// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! End-to-end run: identity, collection, counters, rank and publishing.
//!
//! Every failure before the gist step aborts the run. A failed gist update
//! is reported through [`GistOutcome::Failed`] and logged as a warning, so
//! the local report still counts as a successful run.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::{
    collector::PullRequestCollector,
    config::Options,
    error::Error,
    fetcher::{fetch_counters, merge, rank_input},
    gateway::GitHubGateway,
    progress::Progress,
    publish::{publish_gist, write_local},
    rank::calculate_rank,
    stats::{GitHubUser, StatsReport},
};

/// What happened to the gist copy of the report.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum GistOutcome
{
    /// No gist id was configured.
    Skipped,
    /// The gist file was replaced.
    Published
    {
        /// Browser URL of the gist.
        url: String,
    },
    /// Publishing failed; the run still succeeded.
    Failed
    {
        /// Display string of the publishing error.
        message: String,
    },
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq,)]
pub struct RunReport
{
    /// Ranked statistics that were written.
    pub report:     StatsReport,
    /// Location of the local report.
    pub local_path: PathBuf,
    /// Gist publishing outcome.
    pub gist:       GistOutcome,
}

/// Runs the pipeline under the configured deadline.
///
/// # Errors
///
/// Returns [`Error::Timeout`] when the deadline elapses, otherwise the first
/// fatal stage error.
pub async fn execute<G,>(
    gateway: &G,
    options: &Options,
    progress: &Progress,
) -> Result<RunReport, Error,>
where
    G: GitHubGateway + ?Sized,
{
    match tokio::time::timeout(options.timeout, run(gateway, options, progress,),).await {
        Ok(result,) => result,
        Err(_,) => Err(Error::Timeout {
            seconds: options.timeout.as_secs(),
        },),
    }
}

/// Runs the pipeline without a deadline.
///
/// The pull request collector and the counter query run concurrently; the
/// report is written locally before the gist is attempted.
///
/// # Errors
///
/// Returns the first fatal stage error.
pub async fn run<G,>(
    gateway: &G,
    options: &Options,
    progress: &Progress,
) -> Result<RunReport, Error,>
where
    G: GitHubGateway + ?Sized,
{
    progress.stage("Resolving authenticated user...",);
    let user = resolve_user(gateway,).await?;
    info!("running as {}", user.username);

    progress.stage(format!("Collecting pull requests and statistics for {}...", user.username),);
    let mut collector = PullRequestCollector::new(gateway, options.per_page,);
    let (pull_requests, counters,) = tokio::try_join!(
        collector.collect(&user.username),
        fetch_counters(gateway, &user.username, options.repositories),
    )?;

    progress.stage("Calculating rank...",);
    let stats = merge(user, pull_requests, counters,);
    let rank = calculate_rank(&rank_input(&stats,),)?;
    info!("rank {} at percentile {:.2}", rank.level, rank.percentile);
    let report = StatsReport {
        stats,
        rank,
    };

    progress.stage(format!("Writing report to {}...", options.cwd.display()),);
    let local_path = write_local(&options.cwd, &report,)?;

    let gist = match options.gist_id.as_deref() {
        None => GistOutcome::Skipped,
        Some(gist_id,) => {
            progress.stage(format!("Publishing to gist {gist_id}..."),);
            match publish_gist(gateway, gist_id, &report,).await {
                Ok(url,) => {
                    info!("published report to {}", url);
                    GistOutcome::Published {
                        url,
                    }
                }
                Err(e,) => {
                    warn!("gist publishing failed: {}", e);
                    GistOutcome::Failed {
                        message: e.to_display_string(),
                    }
                }
            }
        }
    };

    Ok(RunReport {
        report,
        local_path,
        gist,
    },)
}

/// Resolves the authenticated account; the display name falls back to the
/// login.
///
/// # Errors
///
/// Propagates the gateway error.
pub async fn resolve_user<G,>(gateway: &G,) -> Result<GitHubUser, Error,>
where
    G: GitHubGateway + ?Sized,
{
    let user = gateway.authenticated_user().await?;
    let name = user.name.filter(|name| !name.trim().is_empty(),).unwrap_or_else(|| user.login.clone(),);

    Ok(GitHubUser {
        name,
        username: user.login,
        avatar: user.avatar_url,
    },)
}

#[cfg(test)]
mod tests
{
    use std::time::Duration;

    use tempfile::{TempDir, tempdir};

    use super::*;
    use crate::{
        models::{Contributions, CountData, GraphQlUser, IssueState, OwnerType},
        publish::LOCAL_FILE_NAME,
        rank::RankLevel,
        stats::PullRequestState,
        testing::{FakeGateway, api_gist, api_repository, api_user, search_issue},
    };

    fn options(dir: &TempDir, gist_id: Option<&str,>,) -> Options
    {
        Options {
            cwd:          dir.path().to_path_buf(),
            token:        "token".to_owned(),
            api_version:  "2022-11-28".to_owned(),
            per_page:     50,
            base_url:     "github.com".to_owned(),
            gist_id:      gist_id.map(str::to_owned,),
            repositories: 100,
            timeout:      Duration::from_secs(30,),
        }
    }

    fn gateway() -> FakeGateway
    {
        let mut gateway = FakeGateway {
            user: Some(api_user("octocat", Some("The Octocat",),),),
            search: vec![
                search_issue("rust-lang/rust", 2, IssueState::Closed, true, false,),
                search_issue("rust-lang/rust", 1, IssueState::Closed, false, false,),
                search_issue("octocat/hello", 3, IssueState::Open, false, false,),
            ],
            statistics: GraphQlUser {
                login: "octocat".to_owned(),
                commits: Contributions {
                    total_commit_contributions: Some(250,),
                    total_pull_request_review_contributions: None,
                },
                reviews: Contributions {
                    total_commit_contributions: None,
                    total_pull_request_review_contributions: Some(2,),
                },
                pull_requests: CountData {
                    total_count: 50,
                },
                open_issues: CountData {
                    total_count: 10,
                },
                closed_issues: CountData {
                    total_count: 15,
                },
                followers: CountData {
                    total_count: 10,
                },
                ..GraphQlUser::default()
            },
            ..FakeGateway::default()
        };
        gateway
            .repositories
            .insert("rust-lang/rust".to_owned(), api_repository(OwnerType::Organization, 90,),);
        gateway
            .repositories
            .insert("octocat/hello".to_owned(), api_repository(OwnerType::User, 3,),);
        gateway
    }

    #[tokio::test]
    async fn run_writes_ranked_report_without_gist()
    {
        let dir = tempdir().expect("temp dir",);
        let gateway = gateway();

        let outcome =
            execute(&gateway, &options(&dir, None,), &Progress::hidden(),).await.expect("run",);

        assert_eq!(outcome.gist, GistOutcome::Skipped);
        assert_eq!(outcome.local_path, dir.path().join(LOCAL_FILE_NAME));
        assert!(outcome.local_path.exists());

        let stats = &outcome.report.stats;
        assert_eq!(stats.user.name, "The Octocat");
        assert_eq!(stats.issues.total_count, 25);
        let states: Vec<PullRequestState,> =
            stats.pull_request.data.iter().map(|pr| pr.state,).collect();
        assert_eq!(states, vec![PullRequestState::Merged, PullRequestState::Open]);

        assert_eq!(gateway.count("statistics"), 1);
        assert_eq!(gateway.count("gist"), 0);
    }

    #[tokio::test]
    async fn rank_reflects_merged_counters()
    {
        let dir = tempdir().expect("temp dir",);
        let gateway = gateway();

        let outcome =
            execute(&gateway, &options(&dir, None,), &Progress::hidden(),).await.expect("run",);

        let expected = calculate_rank(&rank_input(&outcome.report.stats,),).expect("rank",);
        assert_eq!(outcome.report.rank, expected);
        assert_ne!(outcome.report.rank.level, RankLevel::S);
    }

    #[tokio::test]
    async fn name_falls_back_to_login()
    {
        let mut gateway = gateway();
        gateway.user = Some(api_user("octocat", None,),);

        let user = resolve_user(&gateway,).await.expect("user",);
        assert_eq!(user.name, "octocat");
        assert_eq!(user.username, "octocat");
    }

    #[tokio::test]
    async fn gist_is_published_after_local_write()
    {
        let dir = tempdir().expect("temp dir",);
        let mut gateway = gateway();
        gateway.gists.insert("g1".to_owned(), api_gist("g1", &["contributions.json"],),);

        let outcome =
            execute(&gateway, &options(&dir, Some("g1",),), &Progress::hidden(),).await.expect("run",);

        assert_eq!(outcome.gist, GistOutcome::Published {
            url: "https://gist.github.com/g1".to_owned(),
        });
        let local = std::fs::read_to_string(&outcome.local_path,).expect("local report",);
        assert_eq!(gateway.patches()[0].2, local);
    }

    #[tokio::test]
    async fn gist_failure_is_downgraded()
    {
        let dir = tempdir().expect("temp dir",);
        let mut gateway = gateway();
        gateway.gists.insert("g1".to_owned(), api_gist("g1", &["notes.md"],),);

        let outcome =
            execute(&gateway, &options(&dir, Some("g1",),), &Progress::hidden(),).await.expect("run",);

        assert_eq!(outcome.gist, GistOutcome::Failed {
            message: "gist g1 does not contain contributions.json file".to_owned(),
        });
        assert!(outcome.local_path.exists());
        assert!(gateway.patches().is_empty());
    }

    #[tokio::test]
    async fn collection_failure_aborts_before_writing()
    {
        let dir = tempdir().expect("temp dir",);
        let mut gateway = gateway();
        gateway.failing.insert("search",);

        let result = execute(&gateway, &options(&dir, None,), &Progress::hidden(),).await;

        assert!(result.is_err());
        assert!(!dir.path().join(LOCAL_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn deadline_fails_the_run()
    {
        let dir = tempdir().expect("temp dir",);
        let mut gateway = gateway();
        gateway.user_delay = Some(Duration::from_secs(5,),);
        let mut options = options(&dir, None,);
        options.timeout = Duration::from_millis(20,);

        let error = execute(&gateway, &options, &Progress::hidden(),)
            .await
            .expect_err("expected timeout",);

        assert!(matches!(error, Error::Timeout { .. }));
        assert!(!dir.path().join(LOCAL_FILE_NAME).exists());
    }
}
