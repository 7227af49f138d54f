//! Candidate-level failures.
//!
//! A [`CandidateError`] means one candidate URI of a source could not be
//! used. The resolver logs it and moves on to the next candidate; these
//! errors never escape [`Resolver::resolve_one`](crate::resolver::Resolver::resolve_one).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CandidateError {
    #[error("not a URI: {0}")]
    InvalidUri(String),

    #[error("cannot map URI to a local path: {0}")]
    NotLocalPath(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is neither a regular file nor a directory", .0.display())]
    NotFileOrDirectory(PathBuf),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
}

impl CandidateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
