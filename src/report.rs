use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::convergence::StopReason;
use crate::corpus::Song;
use crate::error::Result;
use crate::topic_modeling::{FitReport, PlsaModel};

#[derive(Debug, Clone, Serialize)]
pub struct SongLabel {
    pub title: String,
    pub artist: String,
    pub topics: String,             // "Love/Fun", or "n/a"
    pub distribution: Vec<f64>,     // P(z | song) in topic order
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelReport {
    pub generated_at: DateTime<Utc>,
    pub topic_names: Vec<String>,
    pub iterations: usize,
    pub stop_reason: StopReason,
    pub log_likelihood: Option<f64>,
    pub songs: Vec<SongLabel>,
}

impl LabelReport {
    /// `songs` must be the songs the model was fitted on, in the same order.
    pub fn new(songs: &[Song], model: &PlsaModel, fit: &FitReport) -> Self {
        let songs = songs
            .iter()
            .zip(model.labels())
            .zip(model.document_topic().iter())
            .map(|((song, topics), distribution)| SongLabel {
                title: song.title.clone(),
                artist: song.artist.clone(),
                topics,
                distribution: distribution.clone(),
            })
            .collect();

        LabelReport {
            generated_at: Utc::now(),
            topic_names: model.topic_names().to_vec(),
            iterations: fit.iterations,
            stop_reason: fit.stop_reason,
            log_likelihood: fit.log_likelihood,
            songs,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::RegexAnalyzer;
    use crate::priors::{TopicPrior, TopicPriors};
    use crate::topic_modeling::{PlsaConfig, PriorPlsa};

    #[test]
    fn report_pairs_songs_with_labels() {
        let songs = vec![
            Song {
                title: "Hello".to_string(),
                artist: "Someone".to_string(),
                length_secs: 200.0,
                featuring: String::new(),
                lyrics: "love love heart".to_string(),
            },
            Song {
                title: "Cash".to_string(),
                artist: "Someone Else".to_string(),
                length_secs: 180.0,
                featuring: String::new(),
                lyrics: "money money rich".to_string(),
            },
        ];
        let priors = TopicPriors::new(vec![
            TopicPrior::new("Love", &[("love", 0.2)]),
            TopicPrior::new("Wealth", &[("money", 0.2)]),
        ])
        .unwrap();
        let plsa = PriorPlsa::new(PlsaConfig::default().max_iterations(3).seed(4), priors);
        let texts: Vec<String> = songs.iter().map(|s| s.lyrics.clone()).collect();
        let (model, fit) = plsa.fit(&texts, &RegexAnalyzer::plain()).unwrap();

        let report = LabelReport::new(&songs, &model, &fit);
        assert_eq!(report.songs.len(), 2);
        assert_eq!(report.songs[1].title, "Cash");
        assert_eq!(report.topic_names, vec!["Love", "Wealth"]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        report.write_json(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["songs"][0]["title"], "Hello");
        assert!(parsed["generated_at"].is_string());
    }
}
