// Artifact status display: which model files exist and what they contain.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::topics::corpus::MmCorpus;
use crate::topics::dictionary::Dictionary;
use crate::topics::lda::LdaModel;
use crate::topics::traits::TopicModel;
use crate::transcript;

/// Display artifact status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    println!("Model directory: {}", config.model_dir.display());

    artifact_line("Model", &config.model_path, |p| {
        let model = LdaModel::load(p)?;
        Ok(format!(
            "{} topics, {} terms",
            model.num_topics(),
            model.num_terms()
        ))
    });

    artifact_line("Corpus", &config.corpus_path, |p| {
        let corpus = MmCorpus::load(p)?;
        Ok(format!(
            "{} documents, {} terms",
            corpus.len(),
            corpus.num_terms()
        ))
    });

    artifact_line("Dictionary", &config.dictionary_path, |p| {
        let dictionary = Dictionary::load(p)?;
        Ok(format!(
            "{} terms from {} documents",
            dictionary.len(),
            dictionary.num_docs
        ))
    });

    if config.dialogs_dir.is_dir() {
        let transcripts = transcript::discover(&config.dialogs_dir)?;
        println!(
            "Transcripts: {} in {}",
            transcripts.len(),
            config.dialogs_dir.display()
        );
    } else {
        println!(
            "Transcripts: {} {}",
            "directory not found".yellow(),
            config.dialogs_dir.display()
        );
    }

    Ok(())
}

/// Print one artifact's path, size, and a summary produced by `describe`.
/// Load failures are shown rather than returned so every artifact is listed.
fn artifact_line<F>(label: &str, path: &Path, describe: F)
where
    F: FnOnce(&Path) -> Result<String>,
{
    if !path.exists() {
        println!("{label}: {} ({})", "missing".red(), path.display());
        return;
    }

    let size = std::fs::metadata(path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());

    match describe(path) {
        Ok(summary) => println!(
            "{label}: {} ({}, {}) {}",
            path.display(),
            size,
            summary,
            "ok".green()
        ),
        Err(e) => println!("{label}: {} ({}) {}", path.display(), size, e.to_string().red()),
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
