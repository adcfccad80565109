// UMass topic coherence over a reference corpus.
//
// For a topic's top words w1..wn (best first), every pair (wi, wj) with j < i
// scores log((D(wi, wj) / N + EPSILON) / (D(wj) / N)), where D counts the
// corpus documents containing the word(s) and N is the number of documents.
// The topic's coherence is the mean over all pairs. Higher (closer to zero)
// means the words co-occur more. A pair whose conditioning word wj never
// occurs in the corpus scores 0.0.

use std::collections::{HashMap, HashSet};

use super::traits::BowVector;

/// Smoothing added to the joint probability so unseen pairs stay finite.
pub const EPSILON: f64 = 1e-12;

/// Document and co-document frequencies for a fixed set of term ids.
pub struct DocumentCounts {
    num_docs: usize,
    single: HashMap<usize, usize>,
    pairs: HashMap<(usize, usize), usize>,
}

impl DocumentCounts {
    /// Count, for every term in `relevant` and every pair of them, how many
    /// documents of `corpus` contain it.
    pub fn accumulate(corpus: &[BowVector], relevant: &HashSet<usize>) -> Self {
        let mut single: HashMap<usize, usize> = HashMap::new();
        let mut pairs: HashMap<(usize, usize), usize> = HashMap::new();

        for doc in corpus {
            let mut present: Vec<usize> = doc
                .iter()
                .filter(|&&(term, count)| count > 0.0 && relevant.contains(&term))
                .map(|&(term, _)| term)
                .collect();
            present.sort_unstable();
            present.dedup();

            for (i, &a) in present.iter().enumerate() {
                *single.entry(a).or_insert(0) += 1;
                for &b in &present[i + 1..] {
                    *pairs.entry((a, b)).or_insert(0) += 1;
                }
            }
        }

        Self {
            num_docs: corpus.len(),
            single,
            pairs,
        }
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn doc_freq(&self, term: usize) -> usize {
        self.single.get(&term).copied().unwrap_or(0)
    }

    pub fn co_doc_freq(&self, a: usize, b: usize) -> usize {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.pairs.get(&key).copied().unwrap_or(0)
    }
}

/// UMass coherence of one topic given its top term ids (best first).
pub fn umass(top_terms: &[usize], counts: &DocumentCounts) -> f64 {
    if top_terms.len() < 2 {
        return 0.0;
    }

    let n = counts.num_docs() as f64;
    let mut total = 0.0;
    let mut pairs = 0usize;

    for (i, &w_prime) in top_terms.iter().enumerate().skip(1) {
        for &w_star in &top_terms[..i] {
            let star_count = counts.doc_freq(w_star);
            pairs += 1;
            if star_count == 0 {
                // Conditional probability is undefined; the pair adds nothing
                continue;
            }
            let joint = counts.co_doc_freq(w_prime, w_star) as f64 / n;
            let marginal = star_count as f64 / n;
            total += ((joint + EPSILON) / marginal).ln();
        }
    }

    total / pairs as f64
}
