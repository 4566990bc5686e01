pub mod movie;
pub mod recommendation;

pub use movie::Movie;
pub use recommendation::{Recommendation, MISSING_OVERVIEW};
