// Topic model trait: the seam between the CLI and whatever model backs it.
//
// The reporter and classifier only ever need three things from a trained
// model: rank its topics against a reference corpus, project a document into
// topic space, and show a single topic's top words. The default
// implementation is the LDA model in `lda.rs`; tests use small in-memory
// models so ranking and reporting can be checked without artifacts on disk.

use anyhow::Result;

/// Sparse bag-of-words: `(term id, count)` pairs sorted by term id.
pub type BowVector = Vec<(usize, f64)>;

/// Sparse topic distribution: `(topic id, weight)` pairs.
pub type TopicVector = Vec<(usize, f64)>;

/// A topic's most characteristic words, highest weight first.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicRepresentation {
    pub terms: Vec<(String, f64)>,
}

impl TopicRepresentation {
    pub fn new(terms: Vec<(String, f64)>) -> Self {
        Self { terms }
    }

    /// The words alone, in weight order.
    pub fn words(&self) -> Vec<String> {
        self.terms.iter().map(|(w, _)| w.clone()).collect()
    }
}

/// Trait for querying a trained topic model.
pub trait TopicModel {
    /// Number of topics the model was trained with.
    fn num_topics(&self) -> usize;

    /// Rank every topic by coherence over `corpus`, best first. Each topic is
    /// represented by its `top_n` words.
    fn rank_topics(
        &self,
        corpus: &[BowVector],
        top_n: usize,
    ) -> Result<Vec<(TopicRepresentation, f64)>>;

    /// Project a bag-of-words vector into topic space. Topics with negligible
    /// weight may be left out of the result.
    fn project(&self, bow: &[(usize, f64)]) -> Result<TopicVector>;

    /// The `top_n` most probable words of one topic.
    fn show_topic(&self, topic_id: usize, top_n: usize) -> Result<TopicRepresentation>;
}
