use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::topic_modeling::PlsaModel;

/// One paragraph per topic of `term:weight` pairs, heaviest first.
///
/// Write-only: nothing reads this format back into a model.
pub fn render_model(model: &PlsaModel) -> String {
    (0..model.num_topics())
        .map(|topic| {
            model
                .ranked_words(topic)
                .iter()
                .map(|(term, weight)| format!("{}:{}", term, weight))
                .collect::<Vec<_>>()
                .join("; ")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn save_model(model: &PlsaModel, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(render_model(model).as_bytes())?;
    writer.flush()?;

    info!(path = %path.display(), topics = model.num_topics(), "Saved topic model");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::BagOfWords;
    use crate::priors::{MissingSeedPolicy, TopicPrior, TopicPriors};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn model() -> PlsaModel {
        let corpus = vec![
            BagOfWords::from_tokens(["money", "money", "rich"]),
            BagOfWords::from_tokens(["santa", "money"]),
        ];
        let priors = TopicPriors::new(vec![
            TopicPrior::new("Wealth", &[("money", 0.3)]),
            TopicPrior::new("Christmas", &[("santa", 0.3)]),
        ])
        .unwrap();
        PlsaModel::new(&corpus, &priors, MissingSeedPolicy::Reject, &mut StdRng::seed_from_u64(9)).unwrap()
    }

    #[test]
    fn one_paragraph_per_topic_in_topic_order() {
        let rendered = render_model(&model());
        let paragraphs: Vec<&str> = rendered.split("\n\n").collect();
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].starts_with("money:"));
        assert!(paragraphs[1].starts_with("santa:"));
        assert_eq!(paragraphs[0].split("; ").count(), 3);
    }

    #[test]
    fn saved_file_matches_rendering() {
        let model = model();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topic_models.txt");
        save_model(&model, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), render_model(&model));
    }
}
