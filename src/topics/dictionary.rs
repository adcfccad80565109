// Vocabulary mapping between tokens and integer term ids.
//
// The dictionary file is plain text: the first line holds the number of
// documents the dictionary was built from, and each following line is
// `id<TAB>word<TAB>document frequency`. Frequencies are validated but not
// kept. The mapping is read-only after load; tokens it doesn't know are
// dropped when vectorizing.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing::info;

use super::traits::BowVector;
use crate::error::{ArtifactKind, ArtifactLoadError};

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    token2id: HashMap<String, usize>,
    /// Number of documents the dictionary was built from.
    pub num_docs: u64,
}

impl Dictionary {
    /// Load a dictionary saved in the text format described above.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ArtifactLoadError::from_io(ArtifactKind::Dictionary, path, e))?;
        let dictionary = Self::parse(&text)
            .map_err(|reason| ArtifactLoadError::malformed(ArtifactKind::Dictionary, path, reason))?;

        info!(
            path = %path.display(),
            terms = dictionary.len(),
            num_docs = dictionary.num_docs,
            "Loaded dictionary"
        );
        Ok(dictionary)
    }

    fn parse(text: &str) -> std::result::Result<Self, String> {
        let mut lines = text.lines().enumerate();

        let num_docs = match lines.next() {
            Some((_, first)) => first
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("line 1: expected a document count, got '{}'", first.trim()))?,
            None => return Err("file is empty".to_string()),
        };

        let mut dictionary = Dictionary {
            num_docs,
            ..Default::default()
        };
        let mut seen_ids = HashSet::new();

        for (idx, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = idx + 1;
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 3 {
                return Err(format!(
                    "line {line_no}: expected 3 tab-separated fields, found {}",
                    fields.len()
                ));
            }
            let id = fields[0]
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("line {line_no}: invalid term id '{}'", fields[0]))?;
            let word = fields[1].to_string();
            fields[2]
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("line {line_no}: invalid document frequency '{}'", fields[2]))?;

            if !seen_ids.insert(id) {
                return Err(format!("line {line_no}: duplicate term id {id}"));
            }
            if dictionary.token2id.contains_key(&word) {
                return Err(format!("line {line_no}: duplicate word '{word}'"));
            }

            dictionary.token2id.insert(word, id);
        }

        Ok(dictionary)
    }

    /// Build a dictionary directly from `(id, word)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        let mut dictionary = Dictionary::default();
        for (id, word) in pairs {
            dictionary.token2id.insert(word.into(), id);
        }
        dictionary
    }

    pub fn len(&self) -> usize {
        self.token2id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token2id.is_empty()
    }

    pub fn id(&self, token: &str) -> Option<usize> {
        self.token2id.get(token).copied()
    }

    /// Convert tokens into a bag-of-words vector sorted by term id.
    /// Unknown tokens are ignored; the dictionary never grows here.
    pub fn doc2bow<I, S>(&self, tokens: I) -> BowVector
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokens {
            if let Some(id) = self.id(token.as_ref()) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }
        counts.into_iter().collect()
    }
}
