// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Local and remote sinks for the stats report.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    error::{Error, output_io_error},
    gateway::GitHubGateway,
    stats::StatsReport,
};

/// File written to the working directory.
pub const LOCAL_FILE_NAME: &str = "github-stats.json";

/// File replaced inside the target gist.
pub const GIST_FILE_NAME: &str = "contributions.json";

/// Writes the report as two-space indented JSON into `dir`.
///
/// # Arguments
///
/// * `dir` - Working directory receiving [`LOCAL_FILE_NAME`]
/// * `report` - Report to persist
///
/// # Returns
///
/// Path of the written file.
///
/// # Errors
///
/// Returns [`Error::Serialize`] when encoding fails and [`Error::OutputIo`]
/// when the file cannot be written.
pub fn write_local(dir: &Path, report: &StatsReport,) -> Result<PathBuf, Error,>
{
    let path = dir.join(LOCAL_FILE_NAME,);
    let json = report.to_pretty_json()?;
    std::fs::write(&path, json,).map_err(|e| output_io_error(&path, e,),)?;
    info!("wrote {}", path.display());
    Ok(path,)
}

/// Replaces [`GIST_FILE_NAME`] in an existing gist with the report.
///
/// The gist is read first; when it does not already hold the file no update
/// is sent.
///
/// # Returns
///
/// Browser URL of the updated gist.
///
/// # Errors
///
/// Returns [`Error::GistFileMissing`] when the gist lacks the file, and
/// propagates gateway and serialization failures.
pub async fn publish_gist<G,>(
    gateway: &G,
    gist_id: &str,
    report: &StatsReport,
) -> Result<String, Error,>
where
    G: GitHubGateway + ?Sized,
{
    let gist = gateway.gist(gist_id,).await?;
    if !gist.contains_file(GIST_FILE_NAME,) {
        return Err(Error::GistFileMissing {
            gist_id:   gist_id.to_owned(),
            file_name: GIST_FILE_NAME.to_owned(),
        },);
    }

    let content = report.to_pretty_json()?;
    debug!("updating {} in gist {}", GIST_FILE_NAME, gist_id);
    let updated = gateway.update_gist_file(gist_id, GIST_FILE_NAME, &content,).await?;

    Ok(updated.html_url,)
}

#[cfg(test)]
mod tests
{
    use tempfile::tempdir;

    use super::*;
    use crate::{
        stats::fixtures,
        testing::{FakeGateway, api_gist},
    };

    #[test]
    fn write_local_round_trips()
    {
        let dir = tempdir().expect("temp dir",);
        let report = fixtures::report();

        let path = write_local(dir.path(), &report,).expect("write",);

        assert_eq!(path, dir.path().join("github-stats.json"));
        let content = std::fs::read_to_string(&path,).expect("read back",);
        assert!(content.contains("\n  \"commits\": 250"));
        let parsed: StatsReport = serde_json::from_str(&content,).expect("valid JSON",);
        assert_eq!(parsed, report);
    }

    #[test]
    fn write_local_overwrites_previous_report()
    {
        let dir = tempdir().expect("temp dir",);
        std::fs::write(dir.path().join(LOCAL_FILE_NAME,), "stale",).expect("seed",);

        let path = write_local(dir.path(), &fixtures::report(),).expect("write",);
        let content = std::fs::read_to_string(path,).expect("read back",);
        assert!(content.starts_with('{'));
    }

    #[test]
    fn write_local_reports_failing_path()
    {
        let dir = tempdir().expect("temp dir",);
        let missing = dir.path().join("missing",);

        let error = write_local(&missing, &fixtures::report(),).expect_err("expected failure",);
        match error {
            Error::OutputIo {
                path, ..
            } => assert_eq!(path, missing.join(LOCAL_FILE_NAME)),
            other => panic!("expected output error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn publish_gist_patches_expected_file()
    {
        let mut gateway = FakeGateway::default();
        gateway.gists.insert("g1".to_owned(), api_gist("g1", &["contributions.json", "notes.md"],),);
        let report = fixtures::report();

        let url = publish_gist(&gateway, "g1", &report,).await.expect("publish",);

        assert_eq!(url, "https://gist.github.com/g1");
        let patches = gateway.patches();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].0, "g1");
        assert_eq!(patches[0].1, "contributions.json");
        let parsed: StatsReport = serde_json::from_str(&patches[0].2,).expect("valid JSON",);
        assert_eq!(parsed, report);
    }

    #[tokio::test]
    async fn publish_gist_without_expected_file_sends_no_patch()
    {
        let mut gateway = FakeGateway::default();
        gateway.gists.insert("g1".to_owned(), api_gist("g1", &["other.json"],),);

        let error =
            publish_gist(&gateway, "g1", &fixtures::report(),).await.expect_err("expected failure",);

        assert!(matches!(error, Error::GistFileMissing { .. }));
        assert_eq!(error.to_string(), "gist g1 does not contain contributions.json file");
        assert!(gateway.patches().is_empty());
        assert_eq!(gateway.count("patch"), 0);
    }

    #[tokio::test]
    async fn publish_gist_propagates_read_failure()
    {
        let mut gateway = FakeGateway::default();
        gateway.failing.insert("gist",);

        assert!(publish_gist(&gateway, "g1", &fixtures::report(),).await.is_err());
        assert!(gateway.patches().is_empty());
    }
}
