// Topic reporter: the model's most coherent topics.
//
// Loads the trained model and the reference corpus once, asks the model to
// rank its topics by coherence over the corpus, and keeps the first
// `num_topics` of them. Fewer available topics means a shorter report.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use super::TopicBlock;
use crate::topics::corpus::MmCorpus;
use crate::topics::lda::LdaModel;
use crate::topics::traits::TopicModel;

/// Topics shown by default.
pub const DEFAULT_NUM_TOPICS: usize = 10;
/// Words per topic shown by default.
pub const DEFAULT_TOP_N: usize = 10;

pub struct TopicReporter<M = LdaModel> {
    model: M,
    corpus: MmCorpus,
}

impl TopicReporter<LdaModel> {
    /// Load the model and corpus. Either failing to load is fatal.
    pub fn load(model_path: &Path, corpus_path: &Path) -> Result<Self> {
        let model = LdaModel::load(model_path)?;
        let corpus = MmCorpus::load(corpus_path)?;
        Ok(Self::new(model, corpus))
    }
}

impl<M: TopicModel> TopicReporter<M> {
    pub fn new(model: M, corpus: MmCorpus) -> Self {
        Self { model, corpus }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn corpus(&self) -> &MmCorpus {
        &self.corpus
    }

    /// The `num_topics` most coherent topics, each with its `top_n` words.
    pub fn report(&self, num_topics: usize, top_n: usize) -> Result<Vec<TopicBlock>> {
        let ranked = self.model.rank_topics(self.corpus.documents(), top_n)?;
        let available = ranked.len();

        let blocks: Vec<TopicBlock> = ranked
            .into_iter()
            .take(num_topics)
            .enumerate()
            .map(|(i, (representation, coherence))| TopicBlock {
                rank: i + 1,
                topic_id: None,
                words: representation.words(),
                score: coherence,
            })
            .collect();

        info!(
            requested = num_topics,
            available,
            reported = blocks.len(),
            "Ranked topics by coherence"
        );
        Ok(blocks)
    }
}
