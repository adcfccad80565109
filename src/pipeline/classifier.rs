// Chat topic classifier.
//
// Per transcript: read the text column of every row, join the rows into one
// document, tokenize, map tokens to a bag-of-words through the dictionary,
// project into topic space, and keep the `top_n` heaviest topics. Each kept
// topic is described by its top words from the model.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use super::TopicBlock;
use crate::topics::dictionary::Dictionary;
use crate::topics::lda::LdaModel;
use crate::topics::tokenize::Tokenizer;
use crate::topics::traits::{BowVector, TopicModel, TopicVector};
use crate::transcript::Transcript;

/// Topics reported per transcript by default.
pub const DEFAULT_TOP_N: usize = 3;
/// Words shown for each reported topic.
pub const TOPIC_WORDS: usize = 10;

/// Classification result for one transcript.
#[derive(Debug, Clone)]
pub struct ChatTopics {
    pub path: PathBuf,
    pub topics: Vec<TopicBlock>,
}

pub struct ChatTopicClassifier<M = LdaModel> {
    model: M,
    dictionary: Dictionary,
    tokenizer: Tokenizer,
}

impl ChatTopicClassifier<LdaModel> {
    /// Load the model and dictionary. Either failing to load is fatal.
    pub fn load(model_path: &Path, dictionary_path: &Path) -> Result<Self> {
        let model = LdaModel::load(model_path)?;
        let dictionary = Dictionary::load(dictionary_path)?;
        Ok(Self::new(model, dictionary, Tokenizer::english()))
    }
}

impl<M: TopicModel> ChatTopicClassifier<M> {
    pub fn new(model: M, dictionary: Dictionary, tokenizer: Tokenizer) -> Self {
        Self {
            model,
            dictionary,
            tokenizer,
        }
    }

    /// Tokenize a document and turn it into a bag-of-words vector.
    pub fn vectorize(&self, document: &str) -> BowVector {
        let tokens = self.tokenizer.tokenize(document);
        let bow = self.dictionary.doc2bow(&tokens);
        debug!(
            tokens = tokens.len(),
            known_terms = bow.len(),
            "Vectorized document"
        );
        bow
    }

    /// Rank the topics of an already-assembled document.
    pub fn classify_document(&self, document: &str, top_n: usize) -> Result<Vec<TopicBlock>> {
        let bow = self.vectorize(document);
        let projected = self.model.project(&bow)?;

        rank_by_weight(projected)
            .into_iter()
            .take(top_n)
            .enumerate()
            .map(|(i, (topic_id, weight))| {
                let representation = self.model.show_topic(topic_id, TOPIC_WORDS)?;
                Ok(TopicBlock {
                    rank: i + 1,
                    topic_id: Some(topic_id),
                    words: representation.words(),
                    score: weight,
                })
            })
            .collect()
    }

    /// Read a transcript and rank its `top_n` most relevant topics.
    pub fn classify(&self, path: &Path, top_n: usize) -> Result<ChatTopics> {
        let transcript = Transcript::read(path)?;
        let topics = self.classify_document(&transcript.document(), top_n)?;

        info!(
            path = %path.display(),
            rows = transcript.utterances.len(),
            topics = topics.len(),
            "Classified transcript"
        );
        Ok(ChatTopics {
            path: transcript.path,
            topics,
        })
    }
}

/// Sort a topic vector by descending weight. Equal weights keep their
/// original relative order.
pub fn rank_by_weight(mut vector: TopicVector) -> TopicVector {
    vector.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    vector
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics::traits::TopicRepresentation;

    #[test]
    fn test_rank_by_weight_descending() {
        let ranked = rank_by_weight(vec![(0, 0.1), (1, 0.6), (2, 0.3)]);
        assert_eq!(ranked, vec![(1, 0.6), (2, 0.3), (0, 0.1)]);
    }

    #[test]
    fn test_rank_by_weight_is_stable_on_ties() {
        let ranked = rank_by_weight(vec![(4, 0.2), (1, 0.5), (2, 0.2), (0, 0.2)]);
        assert_eq!(ranked, vec![(1, 0.5), (4, 0.2), (2, 0.2), (0, 0.2)]);
    }

    #[test]
    fn test_rank_by_weight_empty() {
        assert!(rank_by_weight(Vec::new()).is_empty());
    }

    /// Projects to a fixed vector and names topics "t<id>w<i>".
    struct FixedProjection(TopicVector);

    impl TopicModel for FixedProjection {
        fn num_topics(&self) -> usize {
            self.0.len()
        }

        fn rank_topics(
            &self,
            _corpus: &[BowVector],
            _top_n: usize,
        ) -> Result<Vec<(TopicRepresentation, f64)>> {
            Ok(Vec::new())
        }

        fn project(&self, _bow: &[(usize, f64)]) -> Result<TopicVector> {
            Ok(self.0.clone())
        }

        fn show_topic(&self, topic_id: usize, top_n: usize) -> Result<TopicRepresentation> {
            Ok(TopicRepresentation::new(
                (0..top_n.min(2))
                    .map(|i| (format!("t{topic_id}w{i}"), 0.5))
                    .collect(),
            ))
        }
    }

    fn classifier(vector: TopicVector) -> ChatTopicClassifier<FixedProjection> {
        ChatTopicClassifier::new(
            FixedProjection(vector),
            Dictionary::from_pairs([(0, "ubuntu"), (1, "driver")]),
            Tokenizer::with_stop_words(["the"]),
        )
    }

    #[test]
    fn test_classify_document_takes_top_n() {
        let c = classifier(vec![(0, 0.2), (3, 0.5), (7, 0.3)]);
        let blocks = c.classify_document("ubuntu driver", 2).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].rank, 1);
        assert_eq!(blocks[0].topic_id, Some(3));
        assert_eq!(blocks[0].words, vec!["t3w0", "t3w1"]);
        assert_eq!(blocks[1].topic_id, Some(7));
    }

    #[test]
    fn test_classify_document_fewer_topics_than_requested() {
        let c = classifier(vec![(5, 1.0)]);
        let blocks = c.classify_document("ubuntu", 3).unwrap();
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_vectorize_drops_unknown_and_stop_words() {
        let c = classifier(Vec::new());
        let bow = c.vectorize("The Ubuntu driver, the UBUNTU kernel!");
        assert_eq!(bow, vec![(0, 2.0), (1, 1.0)]);
    }
}
