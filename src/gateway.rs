// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Gateway for the GitHub REST and GraphQL APIs.
//!
//! The trait-based design lets the collector, fetcher and publisher run
//! against an in-memory fake in tests while [`OctocrabGateway`] performs the
//! real HTTP requests. Every remote call of the octocrab implementation is
//! wrapped in [`retry_with_backoff`].

use async_trait::async_trait;
use http::header::HeaderName;
use octocrab::{Octocrab, service::middleware::retry::RetryConfig as TransportRetry};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::{
    error::Error,
    models::{
        ApiGist, ApiRepository, ApiUser, GraphQlResponse, GraphQlUser, SearchIssue,
        SearchIssuesPage, UserStatisticsData,
    },
    retry::{RetryConfig, retry_with_backoff},
};

/// GraphQL document requesting every aggregate counter in one round trip.
pub const USER_STATISTICS_QUERY: &str = include_str!("queries/user_statistics.graphql");

const API_VERSION_HEADER: &str = "x-github-api-version";
const GITHUB_HOST: &str = "github.com";

/// Remote operations issued by the exporter.
#[async_trait]
pub trait GitHubGateway: Send + Sync
{
    /// Fetches the account the token belongs to.
    async fn authenticated_user(&self,) -> Result<ApiUser, Error,>;

    /// Searches pull requests authored by `username`, first page only.
    async fn search_pull_requests(
        &self,
        username: &str,
        per_page: u32,
    ) -> Result<Vec<SearchIssue,>, Error,>;

    /// Fetches repository metadata.
    async fn repository(&self, owner: &str, name: &str,) -> Result<ApiRepository, Error,>;

    /// Runs the batched statistics query for `login`, fetching at most
    /// `repositories` owned repository nodes.
    async fn user_statistics(&self, login: &str, repositories: u32,)
    -> Result<GraphQlUser, Error,>;

    /// Fetches a gist.
    async fn gist(&self, gist_id: &str,) -> Result<ApiGist, Error,>;

    /// Replaces the content of one file of an existing gist.
    async fn update_gist_file(
        &self,
        gist_id: &str,
        file_name: &str,
        content: &str,
    ) -> Result<ApiGist, Error,>;
}

/// REST base and GraphQL endpoint derived from the configured base host.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct ApiEndpoints
{
    /// Base URI for REST routes.
    pub rest_base:   String,
    /// Absolute GraphQL endpoint.
    pub graphql_url: String,
}

impl ApiEndpoints
{
    /// Maps a base host to API endpoints.
    ///
    /// `github.com` maps to `api.github.com`, other hosts to the Enterprise
    /// layout, and full `http(s)://` URLs are used verbatim as REST base.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghstat::ApiEndpoints;
    ///
    /// let endpoints = ApiEndpoints::from_base_url("github.example.com",);
    /// assert_eq!(endpoints.rest_base, "https://github.example.com/api/v3");
    /// assert_eq!(endpoints.graphql_url, "https://github.example.com/api/graphql");
    /// ```
    pub fn from_base_url(base_url: &str,) -> Self
    {
        let trimmed = base_url.trim().trim_end_matches('/',);

        if trimmed.starts_with("http://",) || trimmed.starts_with("https://",) {
            return Self {
                rest_base:   trimmed.to_owned(),
                graphql_url: format!("{trimmed}/graphql"),
            };
        }

        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(GITHUB_HOST,) {
            return Self {
                rest_base:   "https://api.github.com".to_owned(),
                graphql_url: "https://api.github.com/graphql".to_owned(),
            };
        }

        Self {
            rest_base:   format!("https://{trimmed}/api/v3"),
            graphql_url: format!("https://{trimmed}/api/graphql"),
        }
    }
}

/// Query string of the pull request search.
#[derive(Debug, Serialize,)]
struct SearchParams<'a,>
{
    q:               String,
    per_page:        u32,
    page:            u32,
    advanced_search: &'a str,
}

/// Octocrab-backed gateway with a bounded retry policy on every call.
///
/// REST routes go through a client rooted at the REST base. GraphQL goes
/// through a second client rooted at the GraphQL origin, since octocrab
/// prefixes every relative route with the base path.
#[derive(Clone,)]
pub struct OctocrabGateway
{
    client:       Octocrab,
    graphql:      Octocrab,
    graphql_path: String,
    endpoints:    ApiEndpoints,
    retry:        RetryConfig,
}

impl std::fmt::Debug for OctocrabGateway
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        f.debug_struct("OctocrabGateway",)
            .field("endpoints", &self.endpoints,)
            .field("retry", &self.retry,)
            .finish_non_exhaustive()
    }
}

impl OctocrabGateway
{
    /// Builds an authenticated gateway.
    ///
    /// # Arguments
    ///
    /// * `token` - GitHub token used for every request
    /// * `api_version` - Value of the `X-GitHub-Api-Version` header
    /// * `endpoints` - REST base and GraphQL endpoint
    /// * `retry` - Retry policy applied to every call
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the base URI or API version is
    /// invalid, and [`Error::Service`] when the client cannot be built.
    pub fn new(
        token: &str,
        api_version: &str,
        endpoints: ApiEndpoints,
        retry: RetryConfig,
    ) -> Result<Self, Error,>
    {
        let base_uri = parse_uri(&endpoints.rest_base,)?;
        let (graphql_origin, graphql_path,) = split_origin(&endpoints.graphql_url,)?;

        if http::HeaderValue::from_str(api_version,).is_err() {
            return Err(Error::validation(format!("invalid API version: {api_version:?}"),),);
        }

        let client = build_client(token, api_version, base_uri,)?;
        let graphql = build_client(token, api_version, graphql_origin,)?;

        Ok(Self {
            client,
            graphql,
            graphql_path,
            endpoints,
            retry,
        },)
    }

    async fn get_with_retry<R, P,>(
        &self,
        operation: &str,
        route: &str,
        parameters: Option<&P,>,
    ) -> Result<R, Error,>
    where
        R: serde::de::DeserializeOwned,
        P: Serialize + ?Sized + Sync,
    {
        debug!("GET {} ({})", route, operation);
        retry_with_backoff(&self.retry, operation, || self.client.get(route, parameters,),)
            .await
            .map_err(|e| Error::gateway(operation, e,),)
    }
}

#[async_trait]
impl GitHubGateway for OctocrabGateway
{
    async fn authenticated_user(&self,) -> Result<ApiUser, Error,>
    {
        self.get_with_retry("get authenticated user", "/user", None::<&(),>,).await
    }

    async fn search_pull_requests(
        &self,
        username: &str,
        per_page: u32,
    ) -> Result<Vec<SearchIssue,>, Error,>
    {
        let params = SearchParams {
            q: format!("type:pr author:\"{username}\""),
            per_page,
            page: 1,
            advanced_search: "true",
        };

        let page: SearchIssuesPage =
            self.get_with_retry("search pull requests", "/search/issues", Some(&params,),).await?;
        debug!("search matched {} pull requests, {} on page 1", page.total_count, page.items.len());

        Ok(page.items,)
    }

    async fn repository(&self, owner: &str, name: &str,) -> Result<ApiRepository, Error,>
    {
        let route = format!("/repos/{owner}/{name}");
        self.get_with_retry("get repository", &route, None::<&(),>,).await
    }

    async fn user_statistics(&self, login: &str, repositories: u32,)
    -> Result<GraphQlUser, Error,>
    {
        let payload = json!({
            "query": USER_STATISTICS_QUERY,
            "variables": { "login": login, "repositories": repositories },
        });
        let operation = "query user statistics";

        debug!("POST {} ({})", self.endpoints.graphql_url, operation);
        let response: GraphQlResponse<UserStatisticsData,> =
            retry_with_backoff(&self.retry, operation, || {
                self.graphql.post(self.graphql_path.as_str(), Some(&payload,),)
            },)
            .await
            .map_err(|e| Error::gateway(operation, e,),)?;

        if !response.errors.is_empty() {
            let message = response
                .errors
                .iter()
                .map(|error| error.message.as_str(),)
                .collect::<Vec<_,>>()
                .join("; ",);
            return Err(Error::GraphQl {
                message,
            },);
        }

        response.data.and_then(|data| data.user,).ok_or_else(|| Error::GraphQl {
            message: format!("user {login} was not found"),
        },)
    }

    async fn gist(&self, gist_id: &str,) -> Result<ApiGist, Error,>
    {
        let route = format!("/gists/{gist_id}");
        self.get_with_retry("get gist", &route, None::<&(),>,).await
    }

    async fn update_gist_file(
        &self,
        gist_id: &str,
        file_name: &str,
        content: &str,
    ) -> Result<ApiGist, Error,>
    {
        let route = format!("/gists/{gist_id}");
        let mut files = serde_json::Map::new();
        files.insert(file_name.to_owned(), json!({ "content": content }),);
        let body = json!({ "files": files });
        let operation = "update gist";

        debug!("PATCH {} ({})", route, operation);
        retry_with_backoff(&self.retry, operation, || {
            self.client.patch(route.as_str(), Some(&body,),)
        },)
        .await
        .map_err(|e| Error::gateway(operation, e,),)
    }
}

fn parse_uri(url: &str,) -> Result<http::Uri, Error,>
{
    url.parse().map_err(|e| Error::validation(format!("invalid API URL {url}: {e}"),),)
}

/// Splits an absolute URL into its origin and its path.
fn split_origin(url: &str,) -> Result<(http::Uri, String,), Error,>
{
    let uri = parse_uri(url,)?;
    let (Some(scheme,), Some(authority,),) = (uri.scheme(), uri.authority(),) else {
        return Err(Error::validation(format!("API URL {url} must be absolute"),),);
    };

    let origin = http::Uri::builder()
        .scheme(scheme.clone(),)
        .authority(authority.clone(),)
        .path_and_query("/",)
        .build()
        .map_err(|e| Error::validation(format!("invalid API URL {url}: {e}"),),)?;
    let path = uri.path_and_query().map_or("/", |path| path.as_str(),).to_owned();

    Ok((origin, path,),)
}

/// Builds a client with octocrab's own retry layer disabled, so the attempt
/// budget is the one of [`retry_with_backoff`] alone.
fn build_client(token: &str, api_version: &str, base_uri: http::Uri,) -> Result<Octocrab, Error,>
{
    Octocrab::builder()
        .personal_token(token,)
        .add_retry_config(TransportRetry::None,)
        .base_uri(base_uri,)
        .map_err(|e| Error::service(format!("failed to set GitHub base URI: {e}"),),)?
        .add_header(HeaderName::from_static(API_VERSION_HEADER,), api_version.to_owned(),)
        .build()
        .map_err(|e| Error::service(format!("failed to initialize GitHub client: {e}"),),)
}
