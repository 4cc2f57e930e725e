// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Pull request collection and enrichment.
//!
//! The collector searches the first page of pull requests authored by the
//! user, drops the ones closed without a merge, and enriches the survivors
//! with the owner type and star count of their repository. Enrichment runs
//! sequentially in search order through the collector's own
//! [`RepositoryCache`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::{
    cache::RepositoryCache,
    error::Error,
    gateway::GitHubGateway,
    models::{IssueState, SearchIssue},
    stats::{PullRequest, PullRequestState},
};

const REPOSITORY_URL_PATTERN: &str = r"/repos/([^/]+)/([^/]+)/?$";

static REPOSITORY_URL: LazyLock<Result<Regex, regex::Error,>,> =
    LazyLock::new(|| Regex::new(REPOSITORY_URL_PATTERN,),);

/// Collects and enriches pull requests authored by one user.
pub struct PullRequestCollector<'a, G: ?Sized,>
{
    gateway:  &'a G,
    cache:    RepositoryCache,
    per_page: u32,
}

impl<'a, G,> PullRequestCollector<'a, G,>
where
    G: GitHubGateway + ?Sized,
{
    /// Creates a collector with an empty cache.
    ///
    /// `per_page` bounds the single search page that is requested.
    pub fn new(gateway: &'a G, per_page: u32,) -> Self
    {
        Self {
            gateway,
            cache: RepositoryCache::new(),
            per_page,
        }
    }

    /// Returns the repository cache filled by previous collections.
    pub fn cache(&self,) -> &RepositoryCache
    {
        &self.cache
    }

    /// Searches, filters and enriches pull requests authored by `username`.
    ///
    /// # Errors
    ///
    /// Fails as a whole when the search fails, when a repository lookup
    /// fails, or when a search hit carries a repository URL that cannot be
    /// split into owner and name.
    pub async fn collect(&mut self, username: &str,) -> Result<Vec<PullRequest,>, Error,>
    {
        let pattern = repository_pattern()?;
        let items = self.gateway.search_pull_requests(username, self.per_page,).await?;
        debug!("search returned {} pull requests for {}", items.len(), username);

        let mut pull_requests = Vec::with_capacity(items.len(),);
        for item in &items {
            let Some(state,) = classify(item,) else {
                debug!("skipping closed unmerged pull request {}", item.html_url);
                continue;
            };

            let (owner, name,) = parse_repository_url(pattern, &item.repository_url,)?;
            let metadata = self.cache.get(self.gateway, &owner, &name,).await?;

            pull_requests.push(PullRequest {
                repo: format!("{owner}/{name}"),
                title: item.title.clone(),
                url: item.html_url.clone(),
                created_at: item.created_at.clone(),
                state,
                number: item.number,
                owner_type: metadata.owner_type,
                stars: metadata.stars,
            },);
        }

        info!(
            "collected {} pull requests across {} repositories",
            pull_requests.len(),
            self.cache.len()
        );
        Ok(pull_requests,)
    }
}

/// Classifies a search hit, returning `None` for closed unmerged ones.
///
/// A merge timestamp wins over the remote state, and an open draft is
/// reported as [`PullRequestState::Draft`].
pub fn classify(item: &SearchIssue,) -> Option<PullRequestState,>
{
    if item.is_merged() {
        return Some(PullRequestState::Merged,);
    }

    match item.state {
        IssueState::Closed => None,
        IssueState::Open if item.draft == Some(true,) => Some(PullRequestState::Draft,),
        IssueState::Open => Some(PullRequestState::Open,),
    }
}

/// Returns the repository URL pattern, compiled on first use.
fn repository_pattern() -> Result<&'static Regex, Error,>
{
    REPOSITORY_URL
        .as_ref()
        .map_err(|e| Error::validation(format!("invalid repository URL pattern: {e}"),),)
}

/// Splits a repository API URL into owner and name.
fn parse_repository_url(pattern: &Regex, url: &str,) -> Result<(String, String,), Error,>
{
    pattern
        .captures(url,)
        .and_then(|captures| Some((captures.get(1,)?, captures.get(2,)?,),),)
        .map(|(owner, name,)| (owner.as_str().to_owned(), name.as_str().to_owned(),),)
        .ok_or_else(|| Error::MalformedRepositoryUrl {
            url: url.to_owned(),
        },)
}
