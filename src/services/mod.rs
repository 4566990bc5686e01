pub mod model_store;
pub mod providers;
pub mod recommender;
pub mod similarity;
pub mod tfidf;

pub use model_store::ModelStore;
pub use providers::{EmbeddingProvider, HttpEmbeddingProvider};
pub use recommender::Recommender;
