use crate::analyzer::BagOfWords;
use crate::error::{ModelError, Result};
use crate::vocabulary::Vocabulary;

/// Dense documents x vocabulary count matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct TermDocMatrix {
    rows: Vec<Vec<f64>>,
    vocab_size: usize,
}

impl TermDocMatrix {
    /// Fails if any document has no recognized terms.
    pub fn build(documents: &[BagOfWords], vocabulary: &Vocabulary) -> Result<Self> {
        let vocab_size = vocabulary.len();
        let mut rows = vec![vec![0.0; vocab_size]; documents.len()];

        for (doc_id, doc) in documents.iter().enumerate() {
            for (term, count) in doc.terms() {
                if let Some(word_id) = vocabulary.index_of(term) {
                    rows[doc_id][word_id] = count as f64;
                }
            }
            if rows[doc_id].iter().sum::<f64>() <= 0.0 {
                return Err(ModelError::InvariantViolation {
                    context: "term-document matrix",
                    row: doc_id,
                });
            }
        }

        Ok(TermDocMatrix { rows, vocab_size })
    }

    pub fn num_documents(&self) -> usize {
        self.rows.len()
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    pub fn get(&self, doc_id: usize, word_id: usize) -> f64 {
        self.rows[doc_id][word_id]
    }

    pub fn row(&self, doc_id: usize) -> &[f64] {
        &self.rows[doc_id]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_hold_per_document_counts() {
        let docs = vec![
            BagOfWords::from_tokens(["na", "na", "hey"]),
            BagOfWords::from_tokens(["hey", "goodbye"]),
        ];
        let vocab = Vocabulary::build(&docs);
        let matrix = TermDocMatrix::build(&docs, &vocab).unwrap();

        assert_eq!(matrix.num_documents(), 2);
        assert_eq!(matrix.vocab_size(), 3);
        assert_eq!(matrix.row(0), &[2.0, 1.0, 0.0]);
        assert_eq!(matrix.row(1), &[0.0, 1.0, 1.0]);
    }

    #[test]
    fn empty_document_is_an_invariant_violation() {
        let docs = vec![BagOfWords::from_tokens(["solo"]), BagOfWords::default()];
        let vocab = Vocabulary::build(&docs);
        let err = TermDocMatrix::build(&docs, &vocab).unwrap_err();
        assert!(matches!(err, ModelError::InvariantViolation { row: 1, .. }));
    }
}
