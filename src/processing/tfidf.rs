//! TF-IDF vectorization and cosine similarity

use crate::error::ScoringError;
use crate::processing::text_processor::TextProcessor;
use std::collections::{BTreeMap, HashMap};

/// Term limit applied when fitting the vocabulary.
pub const DEFAULT_MAX_FEATURES: usize = 1000;

pub struct TfIdfVectorizer<'a> {
    processor: &'a TextProcessor,
    max_features: usize,
}

/// Fitted vocabulary plus one L2-normalized row per input document.
#[derive(Debug, Clone)]
pub struct TfIdfMatrix {
    pub vocabulary: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl<'a> TfIdfVectorizer<'a> {
    pub fn new(processor: &'a TextProcessor) -> Self {
        Self {
            processor,
            max_features: DEFAULT_MAX_FEATURES,
        }
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Fit on `documents` and return their vectors.
    ///
    /// Terms are ranked by total count over the corpus, ties alphabetical,
    /// and cut at `max_features`. IDF is smoothed: `ln((1 + n) / (1 + df)) + 1`.
    pub fn fit_transform(&self, documents: &[&str]) -> Result<TfIdfMatrix, ScoringError> {
        let counts: Vec<HashMap<&str, usize>> = documents
            .iter()
            .map(|doc| {
                let mut tf = HashMap::new();
                for token in self.processor.tokenize(doc) {
                    *tf.entry(token).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        // BTreeMap keeps terms alphabetical for tie-breaking below.
        let mut corpus_freq: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for tf in &counts {
            for (term, count) in tf {
                let entry = corpus_freq.entry(*term).or_insert((0, 0));
                entry.0 += count;
                entry.1 += 1;
            }
        }

        if corpus_freq.is_empty() {
            return Err(ScoringError::EmptyVocabulary);
        }

        let mut ranked: Vec<(&str, usize, usize)> = corpus_freq
            .into_iter()
            .map(|(term, (freq, df))| (term, freq, df))
            .collect();
        // Stable sort keeps alphabetical order among equal frequencies.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(self.max_features);
        ranked.sort_by(|a, b| a.0.cmp(b.0));

        let n_docs = documents.len() as f64;
        let idf: Vec<f64> = ranked
            .iter()
            .map(|(_, _, df)| ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .iter()
            .map(|tf| {
                let mut row: Vec<f64> = ranked
                    .iter()
                    .zip(&idf)
                    .map(|((term, _, _), weight)| {
                        tf.get(term).copied().unwrap_or(0) as f64 * weight
                    })
                    .collect();
                l2_normalize(&mut row);
                row
            })
            .collect();

        Ok(TfIdfMatrix {
            vocabulary: ranked.into_iter().map(|(term, _, _)| term.to_string()).collect(),
            rows,
        })
    }
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        row.iter_mut().for_each(|v| *v /= norm);
    }
}

/// Cosine similarity; zero when either vector is all zeros.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
