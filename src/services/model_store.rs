use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

use crate::{
    error::ModelError,
    models::Movie,
    services::tfidf::{TfidfArtifact, TfidfIndex},
};

/// On-disk layout of the model artifact
#[derive(Debug, Deserialize)]
struct ModelArtifact {
    movies: Vec<Movie>,
    embeddings: Vec<Vec<f32>>,
    #[serde(default)]
    tfidf: Option<TfidfArtifact>,
}

/// Read-only corpus shared by every request.
///
/// Movies, embeddings and TF-IDF document vectors are index-aligned; that
/// alignment is checked once here and relied upon everywhere else.
#[derive(Debug)]
pub struct ModelStore {
    movies: Vec<Movie>,
    embeddings: Vec<Vec<f32>>,
    tfidf: TfidfIndex,
    embedding_dim: usize,
    renormalized_documents: usize,
    loaded_at: DateTime<Utc>,
}

impl ModelStore {
    /// Loads the model artifact, taking the TF-IDF index from `tfidf_path`
    /// when given and from the artifact's own `tfidf` key otherwise.
    pub fn load(model_path: &Path, tfidf_path: Option<&Path>) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = read_json(model_path)?;

        let tfidf = match tfidf_path {
            Some(path) => read_json::<TfidfArtifact>(path)?,
            None => artifact.tfidf.ok_or(ModelError::MissingTfidf)?,
        };

        let store = Self::from_parts(
            artifact.movies,
            artifact.embeddings,
            TfidfIndex::from_artifact(tfidf)?,
        )?;

        tracing::info!(
            path = %model_path.display(),
            movies = store.len(),
            embedding_dim = store.embedding_dim,
            vocabulary = store.tfidf.vocabulary_size(),
            "Loaded model artifact"
        );

        Ok(store)
    }

    pub fn from_parts(
        movies: Vec<Movie>,
        embeddings: Vec<Vec<f32>>,
        mut tfidf: TfidfIndex,
    ) -> Result<Self, ModelError> {
        if movies.len() != embeddings.len() || movies.len() != tfidf.document_count() {
            return Err(ModelError::Misaligned {
                movies: movies.len(),
                embeddings: embeddings.len(),
                documents: tfidf.document_count(),
            });
        }

        let embedding_dim = embeddings.first().map_or(0, Vec::len);
        if let Some((index, embedding)) = embeddings
            .iter()
            .enumerate()
            .find(|(_, e)| e.len() != embedding_dim)
        {
            return Err(ModelError::InconsistentDimensions {
                index,
                expected: embedding_dim,
                actual: embedding.len(),
            });
        }

        let renormalized_documents = tfidf.normalize_documents();
        if renormalized_documents > 0 {
            tracing::warn!(
                count = renormalized_documents,
                "TF-IDF document vectors were not unit length and have been re-normalized"
            );
        }

        Ok(Self {
            movies,
            embeddings,
            tfidf,
            embedding_dim,
            renormalized_documents,
            loaded_at: Utc::now(),
        })
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    pub fn tfidf(&self) -> &TfidfIndex {
        &self.tfidf
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    pub fn renormalized_documents(&self) -> usize {
        self.renormalized_documents
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
