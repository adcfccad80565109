// Load-only Latent Dirichlet Allocation model.
//
// The model file is JSON holding the trained variational topic-word matrix
// (lambda, one row per topic) and the vocabulary those columns refer to.
// Nothing here trains; the model answers three queries:
//
// - `show_topic`: normalize a topic row and return its most probable words.
// - `project`: per-document variational inference (the E-step), returning
//   the normalized topic proportions above `minimum_probability`.
// - `rank_topics`: order topics by UMass coherence over a reference corpus.
//
// Inference starts every topic's gamma at 1.0 so projections are
// deterministic for a given model and document.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use statrs::function::gamma::digamma;
use tracing::{debug, info};

use super::coherence::{self, DocumentCounts};
use super::traits::{BowVector, TopicModel, TopicRepresentation, TopicVector};
use crate::error::{ArtifactKind, ArtifactLoadError, ModelQueryError};

pub const DEFAULT_MINIMUM_PROBABILITY: f64 = 0.01;
pub const DEFAULT_ITERATIONS: usize = 50;
pub const DEFAULT_GAMMA_THRESHOLD: f64 = 0.001;

/// `minimum_probability` is never allowed below this.
const MINIMUM_PROBABILITY_FLOOR: f64 = 1e-8;
/// Keeps the per-word normalizer away from zero.
const PHI_NORM_EPSILON: f64 = 1e-100;

/// Document-topic Dirichlet prior as stored in the model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prior {
    /// Same concentration for every topic.
    Symmetric(f64),
    /// One concentration per topic.
    PerTopic(Vec<f64>),
}

/// On-disk representation of a trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdaParams {
    pub num_topics: usize,
    /// Term id -> word. Column `i` of `topic_word` belongs to `vocabulary[i]`.
    pub vocabulary: Vec<String>,
    /// Variational topic-word parameters, `num_topics` rows by vocabulary columns.
    pub topic_word: Vec<Vec<f64>>,
    /// Defaults to a symmetric `1 / num_topics`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<Prior>,
    #[serde(default = "default_minimum_probability")]
    pub minimum_probability: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_gamma_threshold")]
    pub gamma_threshold: f64,
}

fn default_minimum_probability() -> f64 {
    DEFAULT_MINIMUM_PROBABILITY
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

fn default_gamma_threshold() -> f64 {
    DEFAULT_GAMMA_THRESHOLD
}

impl LdaParams {
    /// Parameters with default prior and inference settings.
    pub fn new(vocabulary: Vec<String>, topic_word: Vec<Vec<f64>>) -> Self {
        Self {
            num_topics: topic_word.len(),
            vocabulary,
            topic_word,
            alpha: None,
            minimum_probability: DEFAULT_MINIMUM_PROBABILITY,
            iterations: DEFAULT_ITERATIONS,
            gamma_threshold: DEFAULT_GAMMA_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LdaModel {
    vocabulary: Vec<String>,
    /// Row-normalized topic-word probabilities.
    topics: Vec<Vec<f64>>,
    /// exp(E[log beta]) per topic and term, precomputed for inference.
    exp_elog_beta: Vec<Vec<f64>>,
    alpha: Vec<f64>,
    minimum_probability: f64,
    iterations: usize,
    gamma_threshold: f64,
}

impl TryFrom<LdaParams> for LdaModel {
    type Error = anyhow::Error;

    fn try_from(params: LdaParams) -> Result<Self> {
        let k = params.num_topics;
        let v = params.vocabulary.len();

        if k == 0 {
            anyhow::bail!("num_topics must be at least 1");
        }
        if params.topic_word.len() != k {
            anyhow::bail!(
                "num_topics is {k} but topic_word has {} rows",
                params.topic_word.len()
            );
        }
        for (topic, row) in params.topic_word.iter().enumerate() {
            if row.len() != v {
                anyhow::bail!(
                    "topic {topic} has {} weights but the vocabulary has {v} words",
                    row.len()
                );
            }
            if let Some(bad) = row.iter().find(|x| !x.is_finite() || **x <= 0.0) {
                anyhow::bail!("topic {topic} has non-positive or non-finite weight {bad}");
            }
        }

        let alpha = match params.alpha {
            None => vec![1.0 / k as f64; k],
            Some(Prior::Symmetric(a)) => vec![a; k],
            Some(Prior::PerTopic(a)) => {
                if a.len() != k {
                    anyhow::bail!("alpha has {} entries, expected {k}", a.len());
                }
                a
            }
        };
        if alpha.iter().any(|a| !a.is_finite() || *a <= 0.0) {
            anyhow::bail!("alpha must be positive and finite");
        }
        if !(params.gamma_threshold.is_finite() && params.gamma_threshold >= 0.0) {
            anyhow::bail!("gamma_threshold must be a non-negative number");
        }

        let topics = params
            .topic_word
            .iter()
            .map(|row| {
                let total: f64 = row.iter().sum();
                row.iter().map(|x| x / total).collect()
            })
            .collect();
        let exp_elog_beta = params
            .topic_word
            .iter()
            .map(|row| dirichlet_expectation(row).into_iter().map(f64::exp).collect())
            .collect();

        Ok(Self {
            vocabulary: params.vocabulary,
            topics,
            exp_elog_beta,
            alpha,
            minimum_probability: params.minimum_probability.max(MINIMUM_PROBABILITY_FLOOR),
            iterations: params.iterations,
            gamma_threshold: params.gamma_threshold,
        })
    }
}

impl LdaModel {
    /// Load a model from its JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ArtifactLoadError::from_io(ArtifactKind::Model, path, e))?;
        let params: LdaParams = serde_json::from_str(&text)
            .map_err(|e| ArtifactLoadError::malformed(ArtifactKind::Model, path, e.to_string()))?;
        let model = LdaModel::try_from(params)
            .map_err(|e| ArtifactLoadError::malformed(ArtifactKind::Model, path, e.to_string()))?;

        info!(
            path = %path.display(),
            topics = model.num_topics(),
            terms = model.num_terms(),
            "Loaded LDA model"
        );
        Ok(model)
    }

    pub fn num_terms(&self) -> usize {
        self.vocabulary.len()
    }

    /// Normalized word distribution of one topic.
    pub fn topic_distribution(&self, topic_id: usize) -> Result<&[f64]> {
        self.topics
            .get(topic_id)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                ModelQueryError::UnknownTopic {
                    topic_id,
                    num_topics: self.num_topics(),
                }
                .into()
            })
    }

    /// Term ids of a topic's `top_n` most probable words, best first.
    /// Ties keep term id order.
    fn top_terms(&self, topic_id: usize, top_n: usize) -> Result<Vec<usize>> {
        let dist = self.topic_distribution(topic_id)?;
        let mut ids: Vec<usize> = (0..dist.len()).collect();
        ids.sort_by(|&a, &b| dist[b].partial_cmp(&dist[a]).unwrap_or(Ordering::Equal));
        ids.truncate(top_n);
        Ok(ids)
    }

    fn representation(&self, topic_id: usize, terms: &[usize]) -> TopicRepresentation {
        let dist = &self.topics[topic_id];
        TopicRepresentation::new(
            terms
                .iter()
                .map(|&t| (self.vocabulary[t].clone(), dist[t]))
                .collect(),
        )
    }

    /// Variational posterior gamma for one document.
    pub fn inference(&self, bow: &[(usize, f64)]) -> Result<Vec<f64>> {
        let num_terms = self.num_terms();
        if let Some(&(term_id, _)) = bow.iter().find(|(t, _)| *t >= num_terms) {
            return Err(ModelQueryError::TermOutOfRange {
                term_id,
                num_terms,
            }
            .into());
        }

        let k = self.num_topics();
        let mut gamma = vec![1.0; k];
        let mut exp_elog_theta = exp_dirichlet_expectation(&gamma);
        let mut phi_norm = self.phi_norm(&exp_elog_theta, bow);
        let mut converged_after = self.iterations;

        for iteration in 0..self.iterations {
            let last_gamma = gamma.clone();

            for topic in 0..k {
                let beta = &self.exp_elog_beta[topic];
                let expected: f64 = bow
                    .iter()
                    .zip(&phi_norm)
                    .map(|(&(term, count), norm)| count / norm * beta[term])
                    .sum();
                gamma[topic] = self.alpha[topic] + exp_elog_theta[topic] * expected;
            }

            exp_elog_theta = exp_dirichlet_expectation(&gamma);
            phi_norm = self.phi_norm(&exp_elog_theta, bow);

            let mean_change = gamma
                .iter()
                .zip(&last_gamma)
                .map(|(g, l)| (g - l).abs())
                .sum::<f64>()
                / k as f64;
            if mean_change < self.gamma_threshold {
                converged_after = iteration + 1;
                break;
            }
        }

        debug!(
            words = bow.len(),
            iterations = converged_after,
            "Document inference finished"
        );
        Ok(gamma)
    }

    /// Per-word normalizer: sum over topics of exp(E[log theta]) * exp(E[log beta]).
    fn phi_norm(&self, exp_elog_theta: &[f64], bow: &[(usize, f64)]) -> Vec<f64> {
        bow.iter()
            .map(|&(term, _)| {
                exp_elog_theta
                    .iter()
                    .zip(&self.exp_elog_beta)
                    .map(|(theta, beta)| theta * beta[term])
                    .sum::<f64>()
                    + PHI_NORM_EPSILON
            })
            .collect()
    }
}

impl TopicModel for LdaModel {
    fn num_topics(&self) -> usize {
        self.topics.len()
    }

    fn rank_topics(
        &self,
        corpus: &[BowVector],
        top_n: usize,
    ) -> Result<Vec<(TopicRepresentation, f64)>> {
        let top_terms: Vec<Vec<usize>> = (0..self.num_topics())
            .map(|topic| self.top_terms(topic, top_n))
            .collect::<Result<_>>()?;

        let relevant: HashSet<usize> = top_terms.iter().flatten().copied().collect();
        let counts = DocumentCounts::accumulate(corpus, &relevant);

        let mut scored = Vec::with_capacity(top_terms.len());
        for (topic, terms) in top_terms.iter().enumerate() {
            let score = coherence::umass(terms, &counts);
            debug!(topic, coherence = score, "Scored topic coherence");
            scored.push((self.representation(topic, terms), score));
        }

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        Ok(scored)
    }

    fn project(&self, bow: &[(usize, f64)]) -> Result<TopicVector> {
        let gamma = self.inference(bow)?;
        let total: f64 = gamma.iter().sum();

        Ok(gamma
            .into_iter()
            .map(|g| g / total)
            .enumerate()
            .filter(|&(_, weight)| weight >= self.minimum_probability)
            .collect())
    }

    fn show_topic(&self, topic_id: usize, top_n: usize) -> Result<TopicRepresentation> {
        let terms = self.top_terms(topic_id, top_n)?;
        Ok(self.representation(topic_id, &terms))
    }
}

/// E[log x] for x ~ Dirichlet(params): digamma(x_i) - digamma(sum x).
fn dirichlet_expectation(params: &[f64]) -> Vec<f64> {
    let total = digamma(params.iter().sum());
    params.iter().map(|&p| digamma(p) - total).collect()
}

fn exp_dirichlet_expectation(params: &[f64]) -> Vec<f64> {
    dirichlet_expectation(params)
        .into_iter()
        .map(f64::exp)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vec<String> {
        ["ubuntu", "install", "driver", "graphics", "sound", "alsa"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Topic 0 is about installing Ubuntu, topic 1 about graphics drivers,
    /// topic 2 about sound.
    fn model() -> LdaModel {
        LdaModel::try_from(LdaParams::new(
            vocab(),
            vec![
                vec![50.0, 40.0, 1.0, 1.0, 1.0, 1.0],
                vec![1.0, 2.0, 45.0, 40.0, 1.0, 1.0],
                vec![1.0, 1.0, 2.0, 1.0, 50.0, 30.0],
            ],
        ))
        .unwrap()
    }

    #[test]
    fn test_show_topic_orders_by_probability() {
        let topic = model().show_topic(1, 3).unwrap();
        assert_eq!(topic.words(), vec!["driver", "graphics", "install"]);
        let total: f64 = 1.0 + 2.0 + 45.0 + 40.0 + 1.0 + 1.0;
        assert!((topic.terms[0].1 - 45.0 / total).abs() < 1e-12);
    }

    #[test]
    fn test_show_topic_bounded_by_vocabulary() {
        let topic = model().show_topic(0, 100).unwrap();
        assert_eq!(topic.terms.len(), 6);
    }

    #[test]
    fn test_show_topic_unknown_topic() {
        let err = model().show_topic(3, 5).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModelQueryError>(),
            Some(ModelQueryError::UnknownTopic { topic_id: 3, .. })
        ));
    }

    #[test]
    fn test_project_picks_matching_topic() {
        let m = model();
        // "driver graphics driver"
        let projected = m.project(&[(2, 2.0), (3, 1.0)]).unwrap();
        let best = projected
            .iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .unwrap();
        assert_eq!(best.0, 1);
        assert!(best.1 > 0.5);
    }

    #[test]
    fn test_project_is_a_distribution() {
        let m = LdaModel::try_from(LdaParams {
            minimum_probability: 0.0,
            ..LdaParams::new(
                vocab(),
                vec![
                    vec![50.0, 40.0, 1.0, 1.0, 1.0, 1.0],
                    vec![1.0, 2.0, 45.0, 40.0, 1.0, 1.0],
                ],
            )
        })
        .unwrap();
        let projected = m.project(&[(0, 1.0), (4, 3.0)]).unwrap();
        assert_eq!(projected.len(), 2);
        let total: f64 = projected.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_project_empty_document_returns_prior() {
        let projected = model().project(&[]).unwrap();
        assert_eq!(projected.len(), 3);
        for (_, w) in &projected {
            assert!((w - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_project_is_deterministic() {
        let m = model();
        let bow = vec![(0, 1.0), (1, 2.0), (5, 1.0)];
        assert_eq!(m.project(&bow).unwrap(), m.project(&bow).unwrap());
    }

    #[test]
    fn test_project_drops_topics_below_minimum() {
        let m = LdaModel::try_from(LdaParams {
            minimum_probability: 0.4,
            ..LdaParams::new(
                vocab(),
                vec![
                    vec![50.0, 40.0, 1.0, 1.0, 1.0, 1.0],
                    vec![1.0, 2.0, 45.0, 40.0, 1.0, 1.0],
                    vec![1.0, 1.0, 2.0, 1.0, 50.0, 30.0],
                ],
            )
        })
        .unwrap();
        let projected = m.project(&[(4, 5.0), (5, 5.0)]).unwrap();
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].0, 2);
    }

    #[test]
    fn test_project_rejects_foreign_term_ids() {
        let err = model().project(&[(0, 1.0), (42, 1.0)]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ModelQueryError>(),
            Some(&ModelQueryError::TermOutOfRange {
                term_id: 42,
                num_terms: 6
            })
        );
    }

    #[test]
    fn test_rank_topics_by_coherence() {
        let m = model();
        // ubuntu/install always co-occur, driver/graphics half the time,
        // sound/alsa never do.
        let corpus: Vec<BowVector> = vec![
            vec![(0, 1.0), (1, 1.0)],
            vec![(0, 1.0), (1, 2.0), (2, 1.0)],
            vec![(2, 1.0), (3, 1.0)],
            vec![(2, 1.0)],
            vec![(4, 1.0)],
            vec![(5, 1.0)],
        ];
        let ranked = m.rank_topics(&corpus, 2).unwrap();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].0.words(), vec!["ubuntu", "install"]);
        assert_eq!(ranked[1].0.words(), vec!["driver", "graphics"]);
        assert_eq!(ranked[2].0.words(), vec!["sound", "alsa"]);
        assert!(ranked[0].1 >= ranked[1].1 && ranked[1].1 >= ranked[2].1);
    }

    #[test]
    fn test_params_validation() {
        let mismatched = LdaParams::new(vocab(), vec![vec![1.0, 2.0]]);
        assert!(LdaModel::try_from(mismatched).is_err());

        let zero = LdaParams::new(vec!["a".into()], vec![vec![0.0]]);
        assert!(LdaModel::try_from(zero).is_err());

        let empty = LdaParams::new(vocab(), vec![]);
        assert!(LdaModel::try_from(empty).is_err());

        let bad_alpha = LdaParams {
            alpha: Some(Prior::PerTopic(vec![0.1])),
            ..LdaParams::new(vec!["a".into()], vec![vec![1.0], vec![2.0]])
        };
        assert!(LdaModel::try_from(bad_alpha).is_err());
    }

    #[test]
    fn test_params_json_defaults() {
        let json = r#"{
            "num_topics": 1,
            "vocabulary": ["a", "b"],
            "topic_word": [[1.0, 3.0]],
            "alpha": 0.2
        }"#;
        let params: LdaParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.alpha, Some(Prior::Symmetric(0.2)));
        assert_eq!(params.iterations, DEFAULT_ITERATIONS);
        let m = LdaModel::try_from(params).unwrap();
        assert_eq!(m.alpha, vec![0.2]);
    }
}
