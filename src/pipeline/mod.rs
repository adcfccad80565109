// The two batch workflows: rank a model's topics, and classify transcripts.
//
// Both compute plain report values; rendering lives in `output`.

pub mod classifier;
pub mod reporter;

/// One ranked topic as it appears in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicBlock {
    /// 1-based position in the report.
    pub rank: usize,
    /// Model topic id.
    pub topic_id: Option<usize>,
    /// The topic's representative words, best first.
    pub words: Vec<String>,
    /// Coherence (reporter) or projected weight (classifier).
    pub score: f64,
}
