/// A topic is assigned when its share of a document exceeds this.
pub const LABEL_THRESHOLD: f64 = 0.2;

/// Label for a document with no topic above the threshold.
pub const NO_TOPIC: &str = "n/a";

pub const LABEL_DELIMITER: &str = "/";

/// Joins the names of every topic above the threshold, in topic order.
pub fn label_document<S: AsRef<str>>(distribution: &[f64], names: &[S]) -> String {
    debug_assert_eq!(distribution.len(), names.len(), "one name per topic");

    let topics: Vec<&str> = distribution
        .iter()
        .zip(names.iter())
        .filter(|(p, _)| **p > LABEL_THRESHOLD)
        .map(|(_, name)| name.as_ref())
        .collect();

    if topics.is_empty() {
        NO_TOPIC.to_string()
    } else {
        topics.join(LABEL_DELIMITER)
    }
}

pub fn label_documents<S: AsRef<str>>(document_topic: &[Vec<f64>], names: &[S]) -> Vec<String> {
    document_topic
        .iter()
        .map(|row| label_document(row, names))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_topic_order_not_rank() {
        let label = label_document(&[0.5, 0.15, 0.35], &["Love", "Sex", "Fun"]);
        assert_eq!(label, "Love/Fun");
    }

    #[test]
    fn threshold_is_strict() {
        let label = label_document(&[0.2, 0.2, 0.6], &["Love", "Sex", "Fun"]);
        assert_eq!(label, "Fun");
    }

    #[test]
    fn no_topic_above_threshold_gives_sentinel() {
        let names = ["A", "B", "C", "D", "E", "F"];
        let label = label_document(&[0.17, 0.17, 0.17, 0.17, 0.16, 0.16], &names);
        assert_eq!(label, NO_TOPIC);
    }

    #[test]
    #[should_panic(expected = "one name per topic")]
    #[cfg(debug_assertions)]
    fn mismatched_topic_names_are_caught() {
        label_document(&[0.5, 0.5], &["Love"]);
    }

    #[test]
    fn labels_every_document() {
        let matrix = vec![vec![0.9, 0.1], vec![0.1, 0.9], vec![0.5, 0.5]];
        let labels = label_documents(&matrix, &["Christmas".to_string(), "Wealth".to_string()]);
        assert_eq!(labels, vec!["Christmas", "Wealth", "Christmas/Wealth"]);
    }
}
