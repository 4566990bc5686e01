//! TF-IDF lexical signal over a fixed, precomputed vocabulary.
//!
//! The vocabulary, IDF weights and per-document vectors come from the offline
//! build. At query time the text is tokenised, weighted by raw term frequency
//! times IDF, unit-normalised, and dotted against every document vector.

use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{DimensionMismatch, ModelError};
use crate::services::similarity::{l2_normalize, similarity, SimilarityMode};

/// Documents whose norm is further than this from 1 are re-normalised at load
const NORM_TOLERANCE: f32 = 1e-3;

/// TF-IDF index as written by the offline build step
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TfidfArtifact {
    pub vocab_array: Vec<String>,
    pub idf: Vec<f32>,
    pub tfidf_vectors: Vec<Vec<f32>>,
}

#[derive(Debug, Clone)]
pub struct TfidfIndex {
    vocabulary: Vec<String>,
    term_index: HashMap<String, usize>,
    idf: Vec<f32>,
    documents: Vec<Vec<f32>>,
}

impl TfidfIndex {
    /// Builds an index, checking that IDF weights and every document vector
    /// line up with the vocabulary.
    pub fn new(
        vocabulary: Vec<String>,
        idf: Vec<f32>,
        documents: Vec<Vec<f32>>,
    ) -> Result<Self, ModelError> {
        if idf.len() != vocabulary.len() {
            return Err(ModelError::VocabularyMismatch(format!(
                "{} IDF weights for {} vocabulary terms",
                idf.len(),
                vocabulary.len()
            )));
        }

        if let Some((index, doc)) = documents
            .iter()
            .enumerate()
            .find(|(_, doc)| doc.len() != vocabulary.len())
        {
            return Err(ModelError::VocabularyMismatch(format!(
                "document {} has {} components, vocabulary has {} terms",
                index,
                doc.len(),
                vocabulary.len()
            )));
        }

        let mut term_index = HashMap::with_capacity(vocabulary.len());
        for (i, term) in vocabulary.iter().enumerate() {
            term_index.entry(term.clone()).or_insert(i);
        }

        Ok(Self {
            vocabulary,
            term_index,
            idf,
            documents,
        })
    }

    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self, ModelError> {
        Self::new(artifact.vocab_array, artifact.idf, artifact.tfidf_vectors)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn documents(&self) -> &[Vec<f32>] {
        &self.documents
    }

    /// Re-normalises any document vector that is not unit length (zero
    /// vectors excepted). Returns how many were rescaled.
    pub fn normalize_documents(&mut self) -> usize {
        let mut rescaled = 0;
        for doc in &mut self.documents {
            let mag = l2_normalize(doc);
            if mag > 0.0 && (mag - 1.0).abs() > NORM_TOLERANCE {
                rescaled += 1;
            }
        }
        rescaled
    }

    /// TF-IDF weights of `text`, positionally aligned with the vocabulary.
    /// Out-of-vocabulary tokens are ignored.
    pub fn vectorize_query(&self, text: &str) -> Vec<f32> {
        let tf = term_frequencies(&tokenize(text));
        let mut vector = vec![0.0; self.vocabulary.len()];

        for (term, count) in tf {
            if let Some(&i) = self.term_index.get(&term) {
                vector[i] = count as f32 * self.idf[i];
            }
        }

        vector
    }

    /// Similarity of `text` to every document, in corpus order
    pub fn similarities(&self, text: &str) -> Result<Vec<f32>, DimensionMismatch> {
        let mut query = self.vectorize_query(text);
        l2_normalize(&mut query);

        self.documents
            .iter()
            .map(|doc| similarity(&query, doc, SimilarityMode::Normalized))
            .collect()
    }
}

/// Lowercases `text` and returns its maximal runs of word characters
/// (letters, digits, underscore).
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

pub fn term_frequencies(tokens: &[String]) -> HashMap<String, u32> {
    let mut tf = HashMap::new();
    for token in tokens {
        *tf.entry(token.clone()).or_insert(0) += 1;
    }
    tf
}
