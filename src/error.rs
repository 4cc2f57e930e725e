#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the stats exporter."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free while still
//! exposing a thoroughly documented error surface for library consumers.

use std::path::{Path, PathBuf};

/// Unified error type returned by the gateway, the pipeline stages and the
/// CLI.
///
/// Remote failures keep the transport error as their source so callers see
/// exactly what the last attempt reported. Only the gist publishing path
/// downgrades errors to warnings; every other variant aborts the run.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading configuration files.
    #[error("failed to read configuration from {path:?}: {source}")]
    Io {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when the configuration or a derived value violates
    /// invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when encoding the stats report.
    #[error("failed to serialize stats: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps I/O errors that occur while writing the stats report.
    #[error("failed to write stats to {path:?}: {source}")]
    OutputIo {
        /// Location of the report being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// A GitHub request failed after every retry attempt.
    #[error("GitHub request `{operation}` failed: {source}")]
    Gateway {
        /// Name of the remote operation, e.g. `search pull requests`.
        operation: String,
        /// Error reported by the final attempt.
        source:    octocrab::Error
    },
    /// The GraphQL endpoint answered with an `errors` payload or no user.
    #[error("GraphQL query failed: {message}")]
    GraphQl {
        /// Messages reported by the GraphQL endpoint.
        message: String
    },
    /// A search result pointed at a repository URL without owner and name.
    #[error("malformed repository URL in search results: {url}")]
    MalformedRepositoryUrl {
        /// The offending `repository_url` value.
        url: String
    },
    /// The target gist exists but does not hold the expected file.
    #[error("gist {gist_id} does not contain {file_name} file")]
    GistFileMissing {
        /// Identifier of the gist that was read.
        gist_id:   String,
        /// File name that was expected in the gist.
        file_name: String
    },
    /// The run did not complete before its deadline.
    #[error("run exceeded the {seconds}s deadline")]
    Timeout {
        /// Configured deadline in seconds.
        seconds: u64
    },
    /// Service errors when interacting with external tools.
    #[error("service error: {message}")]
    Service {
        /// Human readable message describing the service error.
        message: String
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a service error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the service error.
    pub fn service<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Service {
            message: message.into()
        }
    }

    /// Wraps a transport error with the name of the failed operation.
    pub fn gateway<O>(operation: O, source: octocrab::Error) -> Self
    where
        O: Into<String>
    {
        Self::Gateway {
            operation: operation.into(),
            source
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// This method is primarily intended for CLI contexts where the variant
    /// name does not add value to end users. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the configuration file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::OutputIo`] variant capturing the failing path and
/// source.
///
/// # Parameters
///
/// * `path` - Location of the stats report that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn output_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::OutputIo {
        path: path.to_path_buf(),
        source
    }
}
