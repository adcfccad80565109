use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use chat_topics::config::Config;
use chat_topics::output::terminal;
use chat_topics::pipeline::{classifier, reporter};
use chat_topics::topics::traits::TopicModel;

/// chat-topics: topic reports and chat transcript classification.
///
/// Uses a pre-trained LDA model to list its most coherent topics, or to find
/// the topics a chat transcript is about.
#[derive(Parser)]
#[command(name = "chat-topics", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the model's most coherent topics
    TopTopics {
        /// How many topics to print (default: 10)
        #[arg(long, default_value_t = reporter::DEFAULT_NUM_TOPICS)]
        num_topics: usize,

        /// Words shown per topic (default: 10)
        #[arg(long, default_value_t = reporter::DEFAULT_TOP_N)]
        top_n: usize,
    },

    /// Print the most relevant topics of chat transcripts (.tsv)
    Classify {
        /// Transcript files. When omitted, every .tsv under the dialogs
        /// directory is classified.
        paths: Vec<PathBuf>,

        /// Topics shown per transcript (default: 3)
        #[arg(long, default_value_t = classifier::DEFAULT_TOP_N)]
        top_n: usize,

        /// Dialogs directory to search instead of CHAT_TOPICS_DIALOGS_DIR
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Classify at most this many discovered transcripts
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show which model artifacts are present and what they contain
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chat_topics=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::TopTopics { num_topics, top_n } => {
            let config = Config::load()?;
            config.require_reporter()?;

            let spinner = ProgressBar::new_spinner();
            spinner.set_message("Ranking topics by coherence...");
            spinner.enable_steady_tick(Duration::from_millis(120));

            let topic_reporter =
                reporter::TopicReporter::load(&config.model_path, &config.corpus_path)?;
            let blocks = topic_reporter.report(num_topics, top_n)?;
            spinner.finish_and_clear();

            let mut out = io::stdout().lock();
            terminal::write_top_topics(&mut out, &blocks)?;
            out.flush()?;

            eprintln!(
                "{}",
                format!(
                    "{} of {} topics shown (corpus: {} documents)",
                    blocks.len(),
                    topic_reporter.model().num_topics(),
                    topic_reporter.corpus().len()
                )
                .dimmed()
            );
        }

        Commands::Classify {
            paths,
            top_n,
            dir,
            limit,
        } => {
            let config = Config::load()?;
            config.require_classifier()?;

            let paths = if paths.is_empty() {
                let dir = dir.unwrap_or_else(|| config.dialogs_dir.clone());
                let mut found = chat_topics::transcript::discover(&dir)?;
                if let Some(limit) = limit {
                    found.truncate(limit);
                }
                info!(dir = %dir.display(), transcripts = found.len(), "Discovered transcripts");
                found
            } else {
                paths
            };

            if paths.is_empty() {
                eprintln!(
                    "{} No transcripts to classify. Pass file paths or set CHAT_TOPICS_DIALOGS_DIR.",
                    "Warning:".yellow()
                );
                return Ok(());
            }

            let chat_classifier =
                classifier::ChatTopicClassifier::load(&config.model_path, &config.dictionary_path)?;

            let pb = ProgressBar::new(paths.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  Classifying [{bar:30}] {pos}/{len} ({eta})")
                    .expect("valid template"),
            );

            let mut out = io::stdout().lock();
            for path in &paths {
                let report = chat_classifier.classify(path, top_n)?;
                pb.suspend(|| terminal::write_chat_topics(&mut out, &report))?;
                pb.inc(1);
            }
            pb.finish_and_clear();
            out.flush()?;

            eprintln!("{}", format!("{} transcript(s) classified", paths.len()).dimmed());
        }

        Commands::Status => {
            let config = Config::load()?;
            chat_topics::status::show(&config)?;
        }
    }

    Ok(())
}
