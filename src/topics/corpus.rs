// Reference corpus in Matrix Market coordinate format.
//
// Layout: any number of `%` comment lines (the first is usually the
// `%%MatrixMarket matrix coordinate real general` banner), one size line
// `num_docs num_terms num_entries`, then one `doc term value` triple per line
// with 1-based document and term indices. Documents with no entries are kept
// as empty bag-of-words vectors so the document count stays exact.

use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing::info;

use super::traits::BowVector;
use crate::error::{ArtifactKind, ArtifactLoadError};

#[derive(Debug, Clone, Default)]
pub struct MmCorpus {
    documents: Vec<BowVector>,
    num_terms: usize,
}

impl MmCorpus {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ArtifactLoadError::from_io(ArtifactKind::Corpus, path, e))?;
        let corpus = Self::parse(&text)
            .map_err(|reason| ArtifactLoadError::malformed(ArtifactKind::Corpus, path, reason))?;

        info!(
            path = %path.display(),
            documents = corpus.len(),
            terms = corpus.num_terms,
            "Loaded reference corpus"
        );
        Ok(corpus)
    }

    fn parse(text: &str) -> std::result::Result<Self, String> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty() && !l.starts_with('%'));

        let (num_docs, num_terms, num_entries) = match lines.next() {
            Some((idx, line)) => {
                let dims = parse_numbers(line, idx + 1)?;
                if dims.len() != 3 {
                    return Err(format!(
                        "line {}: size line needs 3 numbers, found {}",
                        idx + 1,
                        dims.len()
                    ));
                }
                (dims[0], dims[1], dims[2])
            }
            None => return Err("missing size line".to_string()),
        };

        let mut documents: Vec<BowVector> = vec![Vec::new(); num_docs];
        let mut seen = 0usize;

        for (idx, line) in lines {
            let line_no = idx + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(format!("line {line_no}: expected 'doc term value'"));
            }
            let doc = parse_index(fields[0], num_docs, line_no, "document")?;
            let term = parse_index(fields[1], num_terms, line_no, "term")?;
            let value: f64 = fields[2]
                .parse()
                .map_err(|_| format!("line {line_no}: invalid value '{}'", fields[2]))?;

            documents[doc].push((term, value));
            seen += 1;
        }

        if seen != num_entries {
            return Err(format!(
                "size line declares {num_entries} entries but {seen} were found"
            ));
        }

        for doc in &mut documents {
            doc.sort_by_key(|&(term, _)| term);
        }

        Ok(MmCorpus {
            documents,
            num_terms,
        })
    }

    /// Build a corpus from in-memory documents.
    pub fn from_documents(documents: Vec<BowVector>) -> Self {
        let num_terms = documents
            .iter()
            .flat_map(|d| d.iter().map(|&(t, _)| t + 1))
            .max()
            .unwrap_or(0);
        Self {
            documents,
            num_terms,
        }
    }

    pub fn documents(&self) -> &[BowVector] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn num_terms(&self) -> usize {
        self.num_terms
    }
}

fn parse_numbers(line: &str, line_no: usize) -> std::result::Result<Vec<usize>, String> {
    line.split_whitespace()
        .map(|f| {
            f.parse::<usize>()
                .map_err(|_| format!("line {line_no}: invalid number '{f}'"))
        })
        .collect()
}

/// Parse a 1-based index and convert it to 0-based, checking the bound.
fn parse_index(
    field: &str,
    bound: usize,
    line_no: usize,
    what: &str,
) -> std::result::Result<usize, String> {
    let one_based: usize = field
        .parse()
        .map_err(|_| format!("line {line_no}: invalid {what} index '{field}'"))?;
    if one_based == 0 || one_based > bound {
        return Err(format!(
            "line {line_no}: {what} index {one_based} outside 1..={bound}"
        ));
    }
    Ok(one_based - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "%%MatrixMarket matrix coordinate real general\n\
                          3 4 4\n\
                          1 1 2\n\
                          1 3 1\n\
                          3 2 1\n\
                          3 4 5\n";

    #[test]
    fn test_parse_keeps_empty_documents() {
        let corpus = MmCorpus::parse(SAMPLE).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.num_terms(), 4);
        assert_eq!(corpus.documents()[0], vec![(0, 2.0), (2, 1.0)]);
        assert!(corpus.documents()[1].is_empty());
        assert_eq!(corpus.documents()[2], vec![(1, 1.0), (3, 5.0)]);
    }

    #[test]
    fn test_parse_rejects_out_of_range_indices() {
        let bad = "3 4 1\n4 1 1\n";
        assert!(MmCorpus::parse(bad).is_err());
        let zero = "3 4 1\n1 0 1\n";
        assert!(MmCorpus::parse(zero).is_err());
    }

    #[test]
    fn test_parse_checks_entry_count() {
        let short = "2 2 3\n1 1 1\n2 2 1\n";
        assert!(MmCorpus::parse(short).is_err());
    }

    #[test]
    fn test_parse_requires_size_line() {
        assert!(MmCorpus::parse("%%MatrixMarket matrix coordinate real general\n").is_err());
    }
}
