// Typed failures for artifact loading, transcript reading, and model queries.
//
// Everything in the crate propagates `anyhow::Result`, but the failures the
// CLI cares about are raised as these enums so callers (and tests) can
// `downcast_ref` to tell a missing model apart from a broken transcript.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which on-disk artifact a load error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Corpus,
    Dictionary,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Model => "topic model",
            ArtifactKind::Corpus => "reference corpus",
            ArtifactKind::Dictionary => "dictionary",
        };
        f.write_str(name)
    }
}

/// A trained model, corpus, or dictionary could not be loaded. Always fatal.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("{kind} not found at {}", .path.display())]
    Missing { kind: ArtifactKind, path: PathBuf },

    #[error("failed to read {kind} at {}: {source}", .path.display())]
    Io {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} at {} is malformed: {reason}", .path.display())]
    Malformed {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },
}

impl ArtifactLoadError {
    /// Classify an I/O failure, turning `NotFound` into `Missing`.
    pub fn from_io(kind: ArtifactKind, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactLoadError::Missing { kind, path }
        } else {
            ArtifactLoadError::Io { kind, path, source }
        }
    }

    pub fn malformed(kind: ArtifactKind, path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ArtifactLoadError::Malformed {
            kind,
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A chat transcript could not be read. Fatal for the file (and the run).
#[derive(Debug, Error)]
pub enum TranscriptReadError {
    #[error("could not open transcript {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transcript {} row {row} is not valid TSV: {source}", .path.display())]
    Parse {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error(
        "transcript {} row {row} has {found} column(s); text column {column} is missing",
        .path.display()
    )]
    MissingColumn {
        path: PathBuf,
        row: usize,
        found: usize,
        column: usize,
    },
}

/// A query against a loaded model referenced something the model doesn't have.
#[derive(Debug, Error, PartialEq)]
pub enum ModelQueryError {
    #[error("topic {topic_id} does not exist (model has {num_topics} topics)")]
    UnknownTopic { topic_id: usize, num_topics: usize },

    #[error("term id {term_id} is outside the model vocabulary ({num_terms} terms)")]
    TermOutOfRange { term_id: usize, num_terms: usize },
}
