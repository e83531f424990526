use thiserror::Error;

/// Everything that can abort a modeling run.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("{context}: row {row} sums to zero")]
    InvariantViolation { context: &'static str, row: usize },

    #[error("expectation step: document {document}, term {term} has zero weight under every topic")]
    ZeroTopicSlice { document: usize, term: usize },

    #[error("seed word '{word}' of topic '{topic}' never occurs in the corpus")]
    MissingSeedWord { topic: String, word: String },

    #[error("invalid topic priors: {0}")]
    InvalidPriors(String),

    #[error("document {document} uses term {term} but the model gives it zero probability")]
    NumericDegeneracy { document: usize, term: usize },

    #[error("corpus is empty (no documents or no recognized terms)")]
    EmptyCorpus,

    #[error("malformed songs file: {0}")]
    MalformedCorpus(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
