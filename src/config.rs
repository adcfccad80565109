use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::{ArtifactKind, ArtifactLoadError};

/// Model directory used when nothing else is configured.
pub const DEFAULT_MODEL_DIR: &str = "./data/models";
pub const DEFAULT_MODEL_FILE: &str = "lda_ubuntu.json";
pub const DEFAULT_CORPUS_FILE: &str = "ubuntu_bow.mm";
pub const DEFAULT_DICTIONARY_FILE: &str = "ubuntu.dictionary";
pub const DEFAULT_DIALOGS_DIR: &str = "./data/dialogs/5";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default, so an empty environment works when the artifacts
/// sit in `./data/models`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the artifact file names are resolved against
    pub model_dir: PathBuf,
    /// Trained LDA model (JSON)
    pub model_path: PathBuf,
    /// Reference corpus for coherence ranking (Matrix Market)
    pub corpus_path: PathBuf,
    /// Vocabulary used to vectorize transcripts
    pub dictionary_path: PathBuf,
    /// Where `classify` looks for transcripts when none are given
    pub dialogs_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let model_dir = env::var("CHAT_TOPICS_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_model_dir());

        Ok(Self::in_dir(
            model_dir,
            env::var("CHAT_TOPICS_MODEL_FILE").ok(),
            env::var("CHAT_TOPICS_CORPUS_FILE").ok(),
            env::var("CHAT_TOPICS_DICTIONARY_FILE").ok(),
            env::var("CHAT_TOPICS_DIALOGS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DIALOGS_DIR)),
        ))
    }

    /// Resolve artifact paths inside `model_dir`. Absolute file overrides are
    /// used as-is.
    pub fn in_dir(
        model_dir: PathBuf,
        model_file: Option<String>,
        corpus_file: Option<String>,
        dictionary_file: Option<String>,
        dialogs_dir: PathBuf,
    ) -> Self {
        let resolve = |file: Option<String>, default: &str| {
            model_dir.join(file.unwrap_or_else(|| default.to_string()))
        };

        Self {
            model_path: resolve(model_file, DEFAULT_MODEL_FILE),
            corpus_path: resolve(corpus_file, DEFAULT_CORPUS_FILE),
            dictionary_path: resolve(dictionary_file, DEFAULT_DICTIONARY_FILE),
            model_dir,
            dialogs_dir,
        }
    }

    /// Check that the files the topic reporter needs are present.
    pub fn require_reporter(&self) -> Result<()> {
        require(ArtifactKind::Model, &self.model_path)?;
        require(ArtifactKind::Corpus, &self.corpus_path)
    }

    /// Check that the files the classifier needs are present.
    pub fn require_classifier(&self) -> Result<()> {
        require(ArtifactKind::Model, &self.model_path)?;
        require(ArtifactKind::Dictionary, &self.dictionary_path)
    }
}

/// `./data/models` when it exists, otherwise the platform data directory
/// (~/.local/share/chat-topics/models on Linux).
pub fn default_model_dir() -> PathBuf {
    let local = PathBuf::from(DEFAULT_MODEL_DIR);
    if local.is_dir() {
        return local;
    }
    dirs::data_dir()
        .map(|d| d.join("chat-topics").join("models"))
        .unwrap_or(local)
}

fn require(kind: ArtifactKind, path: &Path) -> Result<()> {
    if !path.exists() {
        let missing = ArtifactLoadError::Missing {
            kind,
            path: path.to_path_buf(),
        };
        return Err(anyhow::Error::new(missing).context(
            "Set CHAT_TOPICS_MODEL_DIR (or the per-file variables) in your .env file.\n\
             Run `chat-topics status` to see which artifacts were found.",
        ));
    }
    Ok(())
}
