use std::collections::HashMap;

use crate::analyzer::BagOfWords;

/// Bijection between terms and dense column indices, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn build(documents: &[BagOfWords]) -> Self {
        let mut vocabulary = Vocabulary::default();

        for doc in documents {
            for (term, _) in doc.terms() {
                if !vocabulary.index.contains_key(term) {
                    vocabulary.index.insert(term.to_string(), vocabulary.terms.len());
                    vocabulary.terms.push(term.to_string());
                }
            }
        }

        vocabulary
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_insertion_order_across_documents() {
        let docs = vec![
            BagOfWords::from_tokens(["zebra", "apple"]),
            BagOfWords::from_tokens(["apple", "mango", "zebra"]),
        ];
        let vocab = Vocabulary::build(&docs);
        assert_eq!(vocab.terms(), &["zebra", "apple", "mango"]);
        assert_eq!(vocab.index_of("mango"), Some(2));
        assert_eq!(vocab.term(1), Some("apple"));
        assert_eq!(vocab.index_of("kiwi"), None);
    }

    #[test]
    fn empty_corpus_gives_empty_vocabulary() {
        let vocab = Vocabulary::build(&[]);
        assert!(vocab.is_empty());
        assert_eq!(vocab.len(), 0);
    }
}
