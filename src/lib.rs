// songtopics: seeded PLSA topic modeling for song lyrics.
//
// Documents flow through the analyzer into a vocabulary and term-document
// matrix, EM runs with seed-word injection, and the fitted model yields
// per-song topic labels and a ranked word list per topic.

pub mod analyzer;
pub mod convergence;
pub mod corpus;
pub mod error;
pub mod labeling;
pub mod persistence;
pub mod priors;
pub mod report;
pub mod term_doc;
pub mod topic_modeling;
pub mod vocabulary;

pub use error::{ModelError, Result};
pub use topic_modeling::{FitReport, PlsaConfig, PlsaModel, PriorPlsa};
