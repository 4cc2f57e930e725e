// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Run-scoped memoization of repository metadata.
//!
//! Lookups are keyed by `owner/name`. The first lookup of a key issues one
//! gateway call and later lookups are served from memory. Entries are never
//! evicted. The cache is owned by a single collector and driven
//! sequentially, so it needs no locking.

use std::collections::HashMap;

use tracing::debug;

use crate::{error::Error, gateway::GitHubGateway, models::OwnerType};

/// Metadata kept per repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub struct RepositoryMetadata
{
    /// Kind of account owning the repository.
    pub owner_type: OwnerType,
    /// Stargazer count at lookup time.
    pub stars:      u64,
}

/// Memoized repository lookups for one run.
#[derive(Debug, Default,)]
pub struct RepositoryCache
{
    entries: HashMap<String, RepositoryMetadata,>,
}

impl RepositoryCache
{
    /// Creates an empty cache.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Returns metadata for `owner/name`, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Propagates the gateway error of a failed lookup; nothing is cached in
    /// that case.
    pub async fn get<G,>(
        &mut self,
        gateway: &G,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryMetadata, Error,>
    where
        G: GitHubGateway + ?Sized,
    {
        let key = format!("{owner}/{name}");
        if let Some(metadata,) = self.entries.get(&key,) {
            debug!("repository cache hit for {}", key);
            return Ok(*metadata,);
        }

        let repository = gateway.repository(owner, name,).await?;
        let metadata = RepositoryMetadata {
            owner_type: repository.owner.owner_type,
            stars:      repository.stargazers_count,
        };
        debug!("cached {} ({:?}, {} stars)", key, metadata.owner_type, metadata.stars);
        self.entries.insert(key, metadata,);

        Ok(metadata,)
    }

    /// Number of cached repositories.
    pub fn len(&self,) -> usize
    {
        self.entries.len()
    }

    /// Returns `true` when nothing has been cached yet.
    pub fn is_empty(&self,) -> bool
    {
        self.entries.is_empty()
    }
}
