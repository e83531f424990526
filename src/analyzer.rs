use std::collections::HashSet;

use counter::Counter;
use regex::Regex;

/// Term counts for one document, in the order each term first appeared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BagOfWords {
    terms: Vec<(String, usize)>,
}

impl BagOfWords {
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order: Vec<String> = Vec::new();
        let mut counts: Counter<String> = Counter::new();

        for token in tokens {
            let token = token.into();
            if counts[&token] == 0 {
                order.push(token.clone());
            }
            counts[&token] += 1;
        }

        let terms = order
            .into_iter()
            .map(|term| {
                let count = counts[&term];
                (term, count)
            })
            .collect();

        BagOfWords { terms }
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, usize)> {
        self.terms.iter().map(|(term, count)| (term.as_str(), *count))
    }

    pub fn count(&self, term: &str) -> usize {
        self.terms
            .iter()
            .find(|(t, _)| t == term)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.terms.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Turns raw document text into a bag of words.
///
/// The modeling engine only sees the output, so any tokenizer works as long
/// as it is deterministic.
pub trait Analyzer {
    fn analyze(&self, text: &str) -> BagOfWords;
}

pub struct RegexAnalyzer {
    word_re: Regex,
    stop_words: HashSet<&'static str>,
}

impl RegexAnalyzer {
    /// Analyzer that keeps every token.
    pub fn plain() -> Self {
        RegexAnalyzer {
            word_re: Regex::new(r"[a-z']+").expect("static regex"),
            stop_words: HashSet::new(),
        }
    }

    /// Analyzer that drops filler words common in lyrics.
    pub fn with_stop_words() -> Self {
        let stop_words: HashSet<&'static str> = [
            // Articles, pronouns, auxiliaries
            "a", "an", "the", "i", "im", "i'm", "me", "my", "you", "your", "you're", "we",
            "us", "our", "he", "she", "him", "her", "it", "it's", "they", "them", "is", "am",
            "are", "was", "were", "be", "been", "do", "don't", "did", "have", "got", "get",
            "can", "can't", "will", "gonna", "wanna", "gotta",
            // Conjunctions and prepositions
            "and", "or", "but", "so", "if", "to", "of", "in", "on", "at", "for", "with",
            "up", "out", "down", "from", "that", "this", "what", "when", "like", "just",
            "all", "no", "not",
            // Vocables
            "oh", "ooh", "yeah", "ya", "la", "na", "hey", "uh", "ay", "woah", "whoa",
        ]
        .iter()
        .cloned()
        .collect();

        RegexAnalyzer {
            word_re: Regex::new(r"[a-z']+").expect("static regex"),
            stop_words,
        }
    }
}

impl Default for RegexAnalyzer {
    fn default() -> Self {
        Self::with_stop_words()
    }
}

impl Analyzer for RegexAnalyzer {
    fn analyze(&self, text: &str) -> BagOfWords {
        let lowered = text.to_lowercase();
        let tokens = self
            .word_re
            .find_iter(&lowered)
            .map(|m| m.as_str().trim_matches('\''))
            .filter(|word| !word.is_empty() && !self.stop_words.contains(word))
            .map(|word| word.to_string())
            .collect::<Vec<_>>();

        BagOfWords::from_tokens(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_occurrence_order() {
        let bag = BagOfWords::from_tokens(["b", "a", "b", "c", "a", "b"]);
        let terms: Vec<(&str, usize)> = bag.terms().collect();
        assert_eq!(terms, vec![("b", 3), ("a", 2), ("c", 1)]);
        assert_eq!(bag.total(), 6);
    }

    #[test]
    fn plain_analyzer_lowercases_and_strips_punctuation() {
        let bag = RegexAnalyzer::plain().analyze("I love you, LOVE!");
        let terms: Vec<(&str, usize)> = bag.terms().collect();
        assert_eq!(terms, vec![("i", 1), ("love", 2), ("you", 1)]);
    }

    #[test]
    fn stop_words_are_dropped() {
        let bag = RegexAnalyzer::with_stop_words().analyze("Oh yeah, I'm in love with the money");
        assert_eq!(bag.count("love"), 1);
        assert_eq!(bag.count("money"), 1);
        assert_eq!(bag.count("yeah"), 0);
        assert_eq!(bag.count("i'm"), 0);
    }

    #[test]
    fn quoted_words_lose_their_apostrophes() {
        let bag = RegexAnalyzer::plain().analyze("'cause 'round");
        assert_eq!(bag.count("cause"), 1);
        assert_eq!(bag.count("round"), 1);
    }

    #[test]
    fn empty_text_gives_empty_bag() {
        let bag = RegexAnalyzer::plain().analyze("  ... !!");
        assert!(bag.is_empty());
        assert_eq!(bag.total(), 0);
    }
}
