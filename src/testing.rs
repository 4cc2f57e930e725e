// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory gateway that records every call, for unit tests.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    error::Error,
    gateway::GitHubGateway,
    models::{
        ApiGist, ApiRepository, ApiRepositoryOwner, ApiUser, GraphQlUser, IssueState, OwnerType,
        PullRequestLinks, SearchIssue,
    },
};

#[derive(Debug, Default,)]
pub(crate) struct FakeGateway
{
    pub(crate) user:         Option<ApiUser,>,
    pub(crate) search:       Vec<SearchIssue,>,
    pub(crate) repositories: HashMap<String, ApiRepository,>,
    pub(crate) statistics:   GraphQlUser,
    pub(crate) gists:        HashMap<String, ApiGist,>,
    pub(crate) failing:      HashSet<&'static str,>,
    pub(crate) user_delay:   Option<Duration,>,
    pub(crate) calls:        Mutex<Vec<String,>,>,
    pub(crate) patches:      Mutex<Vec<(String, String, String,),>,>,
}

impl FakeGateway
{
    pub(crate) fn calls(&self,) -> Vec<String,>
    {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, prefix: &str,) -> usize
    {
        self.calls.lock().unwrap().iter().filter(|call| call.starts_with(prefix,),).count()
    }

    pub(crate) fn patches(&self,) -> Vec<(String, String, String,),>
    {
        self.patches.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, detail: String,) -> Result<(), Error,>
    {
        self.calls.lock().unwrap().push(format!("{operation} {detail}"),);
        if self.failing.contains(operation,) {
            return Err(Error::service(format!("{operation} unavailable"),),);
        }
        Ok((),)
    }
}

#[async_trait]
impl GitHubGateway for FakeGateway
{
    async fn authenticated_user(&self,) -> Result<ApiUser, Error,>
    {
        self.record("user", String::new(),)?;
        if let Some(delay,) = self.user_delay {
            tokio::time::sleep(delay,).await;
        }
        self.user.clone().ok_or_else(|| Error::service("no user configured",),)
    }

    async fn search_pull_requests(
        &self,
        username: &str,
        per_page: u32,
    ) -> Result<Vec<SearchIssue,>, Error,>
    {
        self.record("search", format!("{username} {per_page}"),)?;
        Ok(self.search.iter().take(per_page as usize,).cloned().collect(),)
    }

    async fn repository(&self, owner: &str, name: &str,) -> Result<ApiRepository, Error,>
    {
        let key = format!("{owner}/{name}");
        self.record("repository", key.clone(),)?;
        self.repositories
            .get(&key,)
            .cloned()
            .ok_or_else(|| Error::service(format!("repository {key} not found"),),)
    }

    async fn user_statistics(&self, login: &str, repositories: u32,)
    -> Result<GraphQlUser, Error,>
    {
        self.record("statistics", format!("{login} {repositories}"),)?;
        Ok(self.statistics.clone(),)
    }

    async fn gist(&self, gist_id: &str,) -> Result<ApiGist, Error,>
    {
        self.record("gist", gist_id.to_owned(),)?;
        self.gists
            .get(gist_id,)
            .cloned()
            .ok_or_else(|| Error::service(format!("gist {gist_id} not found"),),)
    }

    async fn update_gist_file(
        &self,
        gist_id: &str,
        file_name: &str,
        content: &str,
    ) -> Result<ApiGist, Error,>
    {
        self.record("patch", format!("{gist_id} {file_name}"),)?;
        self.patches.lock().unwrap().push((
            gist_id.to_owned(),
            file_name.to_owned(),
            content.to_owned(),
        ),);
        self.gists
            .get(gist_id,)
            .cloned()
            .ok_or_else(|| Error::service(format!("gist {gist_id} not found"),),)
    }
}

pub(crate) fn api_user(login: &str, name: Option<&str,>,) -> ApiUser
{
    ApiUser {
        login:      login.to_owned(),
        name:       name.map(str::to_owned,),
        avatar_url: format!("https://avatars.example/{login}"),
    }
}

pub(crate) fn search_issue(
    repo: &str,
    number: u64,
    state: IssueState,
    merged: bool,
    draft: bool,
) -> SearchIssue
{
    SearchIssue {
        title:          format!("PR #{number}"),
        html_url:       format!("https://github.com/{repo}/pull/{number}"),
        created_at:     "2024-03-01T12:00:00Z".to_owned(),
        state,
        number,
        draft:          Some(draft,),
        repository_url: format!("https://api.github.com/repos/{repo}"),
        pull_request:   Some(PullRequestLinks {
            merged_at: merged.then(|| "2024-03-02T12:00:00Z".to_owned(),),
        },),
    }
}

pub(crate) fn api_repository(owner_type: OwnerType, stars: u64,) -> ApiRepository
{
    ApiRepository {
        owner:            ApiRepositoryOwner {
            owner_type,
        },
        stargazers_count: stars,
    }
}

pub(crate) fn api_gist(id: &str, files: &[&str],) -> ApiGist
{
    ApiGist {
        html_url: format!("https://gist.github.com/{id}"),
        files:    files
            .iter()
            .map(|name| ((*name).to_owned(), serde_json::json!({ "filename": name })),)
            .collect::<BTreeMap<_, _,>>(),
    }
}
