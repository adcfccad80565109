// Chat transcript reading.
//
// A transcript is a tab-separated file with one utterance per row and no
// header. The utterance text lives in a fixed column; every row must have it.
// Transcripts under a dialogs directory are discovered with walkdir.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use csv::ReaderBuilder;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::TranscriptReadError;

/// 0-based column holding the utterance text.
pub const TEXT_COLUMN: usize = 3;

/// File extension of transcripts found by `discover`.
pub const TRANSCRIPT_EXTENSION: &str = "tsv";

/// The utterances of one chat transcript, in file order.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub path: PathBuf,
    pub utterances: Vec<String>,
}

impl Transcript {
    /// Read every row's text column, trimmed. Invalid UTF-8 is replaced
    /// rather than rejected.
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| TranscriptReadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut utterances = Vec::new();
        for (idx, record) in reader.byte_records().enumerate() {
            let row = idx + 1;
            let record = record.map_err(|source| TranscriptReadError::Parse {
                path: path.to_path_buf(),
                row,
                source,
            })?;
            let text = record
                .get(TEXT_COLUMN)
                .ok_or_else(|| TranscriptReadError::MissingColumn {
                    path: path.to_path_buf(),
                    row,
                    found: record.len(),
                    column: TEXT_COLUMN,
                })?;
            // Chat logs are not always valid UTF-8; bad bytes become U+FFFD,
            // which the tokenizer treats as a word boundary.
            utterances.push(String::from_utf8_lossy(text).trim().to_string());
        }

        debug!(path = %path.display(), rows = utterances.len(), "Read transcript");
        Ok(Self {
            path: path.to_path_buf(),
            utterances,
        })
    }

    /// The whole conversation as one document, rows joined by single spaces.
    pub fn document(&self) -> String {
        self.utterances.join(" ")
    }
}

/// All transcript files under `dir` (recursively), sorted by path.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let is_transcript = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext == TRANSCRIPT_EXTENSION);
        if is_transcript {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}
